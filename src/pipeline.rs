//! In-place RGBA transforms over caller-owned memory.
//!
//! The caller's region is used as both input and output: the original pixels
//! are overwritten with the result. Callers that need the source image must
//! copy it first. All validation happens before the first byte is written, so
//! a failed call leaves the region untouched.

use log::{debug, warn};

use crate::buffer::{BufferView, PixelFormat};
use crate::error::{FilterError, Result};
use crate::filters::blur::{gaussian_blur_rgba_u8, RGBA_BLUR_SIZE};
use crate::filters::canny::{canny, CannyParams};
use crate::filters::grayscale::{gray_to_rgba, grayscale_luma_u8, threshold_luma};
use crate::filters::sharpen::sharpen_rgba_u8;

/// What to write back into the caller's buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Canny edge map: white edges on black, opaque.
    Canny(CannyParams),
    /// Luminance replicated into RGB, opaque.
    Grayscale,
    /// Luminance above the level becomes white, the rest black.
    Threshold(u8),
    /// 15x15 Gaussian blur of every channel, alpha included.
    Blur,
    /// 3x3 sharpen of every channel, alpha included.
    Sharpen,
}

impl Operation {
    fn validate(&self) -> Result<()> {
        match self {
            Operation::Canny(params) => params.validate(),
            Operation::Grayscale
            | Operation::Threshold(_)
            | Operation::Blur
            | Operation::Sharpen => Ok(()),
        }
    }
}

/// Apply `op` to an RGBA slice of `width * height * 4` bytes in place.
pub fn process_rgba_in_place(
    data: &mut [u8],
    width: usize,
    height: usize,
    op: Operation,
) -> Result<()> {
    op.validate()?;
    let mut view = BufferView::new(data, width, height, PixelFormat::Rgba)?;
    apply(&mut view, op)
}

/// Replace an RGBA slice with its Canny edge map.
pub fn detect_edges_in_place(
    data: &mut [u8],
    width: usize,
    height: usize,
    params: CannyParams,
) -> Result<()> {
    process_rgba_in_place(data, width, height, Operation::Canny(params))
}

/// Apply `op` to an RGBA region handed over by address.
///
/// Dimensions arrive as signed host integers and are checked before the
/// address is dereferenced.
///
/// # Safety
/// When `width` and `height` are positive and `ptr` is non-null, `ptr` must be
/// valid for reads and writes of `width * height * 4` bytes, and no other
/// code may touch the region until this call returns.
pub unsafe fn process_raw(ptr: *mut u8, width: i32, height: i32, op: Operation) -> Result<()> {
    if width <= 0 || height <= 0 {
        return Err(FilterError::InvalidDimensions {
            width: width as i64,
            height: height as i64,
        });
    }
    op.validate()?;
    let (width, height) = (width as usize, height as usize);
    let mut view = BufferView::from_raw_parts(ptr, width, height, PixelFormat::Rgba)?;
    apply(&mut view, op)
}

/// Host entry point: Canny with the fixed thresholds 100/200.
///
/// Returns `false` and leaves the region untouched on invalid input.
///
/// # Safety
/// Same contract as [`process_raw`].
pub unsafe fn process_image(ptr: *mut u8, width: i32, height: i32) -> bool {
    run_reporting(ptr, width, height, Operation::Canny(CannyParams::default()))
}

/// Run `op` over a raw region and flatten the outcome to a success flag.
///
/// # Safety
/// Same contract as [`process_raw`].
pub unsafe fn run_reporting(ptr: *mut u8, width: i32, height: i32, op: Operation) -> bool {
    match process_raw(ptr, width, height, op) {
        Ok(()) => true,
        Err(err) => {
            warn!("rejected {:?} on {}x{} buffer: {}", op, width, height, err);
            false
        }
    }
}

fn apply(view: &mut BufferView<'_>, op: Operation) -> Result<()> {
    debug!("{:?} on {}x{} RGBA buffer", op, view.width(), view.height());
    let rgba = match op {
        Operation::Canny(params) => {
            let gray = grayscale_luma_u8(view.as_array()?)?;
            canny(gray.view(), &params)?.to_rgba()?
        }
        Operation::Grayscale => gray_to_rgba(grayscale_luma_u8(view.as_array()?)?.view())?,
        Operation::Threshold(level) => {
            let gray = grayscale_luma_u8(view.as_array()?)?;
            gray_to_rgba(threshold_luma(gray.view(), level)?.view())?
        }
        Operation::Blur => gaussian_blur_rgba_u8(view.as_array()?, RGBA_BLUR_SIZE)?,
        Operation::Sharpen => sharpen_rgba_u8(view.as_array()?)?,
    };
    view.copy_from(rgba.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{allocate, release};

    fn rgba_image(width: usize, height: usize, f: impl Fn(usize, usize) -> [u8; 4]) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        data
    }

    fn vertical_step(width: usize, height: usize) -> Vec<u8> {
        rgba_image(width, height, |x, _| {
            if x < width / 2 {
                [0, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            }
        })
    }

    fn assert_binary_opaque(data: &[u8]) {
        for px in data.chunks_exact(4) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 255);
            assert!(px[0] == 0 || px[0] == 255);
        }
    }

    #[test]
    fn test_output_is_binary_rgba() {
        let (w, h) = (16, 11);
        let mut data = rgba_image(w, h, |x, y| {
            [(x * 13) as u8, (y * 29) as u8, ((x + y) * 7) as u8, 40]
        });
        detect_edges_in_place(&mut data, w, h, CannyParams::default()).unwrap();
        assert_eq!(data.len(), w * h * 4);
        assert_binary_opaque(&data);
    }

    #[test]
    fn test_uniform_is_all_black() {
        let (w, h) = (10, 10);
        let data = rgba_image(w, h, |_, _| [90, 140, 200, 255]);
        for params in [CannyParams::new(0.0, 0.0).unwrap(), CannyParams::default()] {
            let mut copy = data.clone();
            detect_edges_in_place(&mut copy, w, h, params).unwrap();
            assert!(copy.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
        }
    }

    #[test]
    fn test_vertical_edge_column() {
        let (w, h) = (20, 14);
        let mut data = vertical_step(w, h);
        detect_edges_in_place(&mut data, w, h, CannyParams::default()).unwrap();

        let boundary = w / 2;
        for y in 0..h {
            for x in 0..w {
                let white = data[(y * w + x) * 4] == 255;
                if white {
                    assert!(x + 2 >= boundary && x <= boundary + 1, "stray edge at ({}, {})", x, y);
                }
            }
        }
        let column_hits = (1..h - 1)
            .filter(|&y| data[(y * w + boundary) * 4] == 255)
            .count();
        assert_eq!(column_hits, h - 2);
    }

    #[test]
    fn test_inverted_thresholds_leave_buffer_untouched() {
        let (w, h) = (12, 12);
        let mut data = vertical_step(w, h);
        let snapshot = data.clone();
        let bad = CannyParams { low: 200.0, high: 100.0 };

        let err = detect_edges_in_place(&mut data, w, h, bad).unwrap_err();
        assert_eq!(err, FilterError::InvalidThresholds { low: 200.0, high: 100.0 });
        assert_eq!(data, snapshot);
    }

    #[test]
    fn test_size_mismatch_leaves_buffer_untouched() {
        let mut data = vertical_step(4, 4);
        let snapshot = data.clone();
        let err = detect_edges_in_place(&mut data, 5, 4, CannyParams::default()).unwrap_err();
        assert!(matches!(err, FilterError::SizeMismatch { .. }));
        assert_eq!(data, snapshot);
    }

    #[test]
    fn test_grayscale_operation() {
        let mut data = rgba_image(2, 1, |x, _| if x == 0 { [255, 0, 0, 10] } else { [9, 9, 9, 0] });
        process_rgba_in_place(&mut data, 2, 1, Operation::Grayscale).unwrap();
        assert_eq!(data, vec![76, 76, 76, 255, 9, 9, 9, 255]);
    }

    #[test]
    fn test_threshold_operation() {
        let mut data = rgba_image(2, 1, |x, _| {
            if x == 0 {
                [100, 100, 100, 255]
            } else {
                [200, 200, 200, 255]
            }
        });
        process_rgba_in_place(&mut data, 2, 1, Operation::Threshold(128)).unwrap();
        assert_eq!(data, vec![0, 0, 0, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_raw_rejects_bad_dimensions() {
        let raw = |w: i32, h: i32| unsafe {
            process_raw(std::ptr::null_mut(), w, h, Operation::Grayscale).unwrap_err()
        };
        assert_eq!(raw(0, 5), FilterError::InvalidDimensions { width: 0, height: 5 });
        assert_eq!(raw(3, -2), FilterError::InvalidDimensions { width: 3, height: -2 });
        assert_eq!(raw(3, 2), FilterError::NullPointer);
    }

    #[test]
    fn test_blur_operation_smooths_step() {
        let (w, h) = (20, 6);
        let mut data = vertical_step(w, h);
        process_rgba_in_place(&mut data, w, h, Operation::Blur).unwrap();

        let red = |x: usize| data[(2 * w + x) * 4];
        assert_eq!(red(0), 0);
        assert_eq!(red(w - 1), 255);
        assert!(red(w / 2 - 1) > 0 && red(w / 2 - 1) < 128);
        assert!(red(w / 2) > 128 && red(w / 2) < 255);
        assert!(data.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_sharpen_operation_keeps_alpha() {
        let (w, h) = (5, 5);
        let mut data = rgba_image(w, h, |x, y| {
            if (x, y) == (2, 2) {
                [110, 110, 110, 200]
            } else {
                [100, 100, 100, 200]
            }
        });
        process_rgba_in_place(&mut data, w, h, Operation::Sharpen).unwrap();

        assert_eq!(&data[(2 * w + 2) * 4..(2 * w + 2) * 4 + 4], &[190, 190, 190, 200]);
        assert_eq!(data[(2 * w + 1) * 4], 90);
        assert_eq!(data[0], 100);
        assert!(data.chunks_exact(4).all(|px| px[3] == 200));
    }

    #[test]
    fn test_diagonal_step_edges_stay_on_boundary() {
        let n = 16usize;
        let mut data = rgba_image(n, n, |x, y| {
            if x > y {
                [255, 255, 255, 255]
            } else {
                [0, 0, 0, 255]
            }
        });
        detect_edges_in_place(&mut data, n, n, CannyParams::default()).unwrap();
        assert_binary_opaque(&data);

        for y in 0..n {
            let row: Vec<usize> = (0..n).filter(|&x| data[(y * n + x) * 4] == 255).collect();
            assert!(row.len() <= 2, "row {} has edges at {:?}", y, row);
            for &x in &row {
                let offset = x as isize - y as isize;
                assert!((-2..=3).contains(&offset), "stray edge at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_reporting_rejects_inverted_thresholds_in_arena() {
        let (w, h) = (12usize, 10usize);
        let source = vertical_step(w, h);

        let ptr = allocate(w * h * 4);
        assert!(!ptr.is_null());
        unsafe {
            std::ptr::copy_nonoverlapping(source.as_ptr(), ptr, source.len());
            let snapshot = std::slice::from_raw_parts(ptr, w * h * 4).to_vec();

            let inverted = Operation::Canny(CannyParams { low: 200.0, high: 100.0 });
            assert!(!run_reporting(ptr, w as i32, h as i32, inverted));
            assert_eq!(std::slice::from_raw_parts(ptr, w * h * 4), &snapshot[..]);
            release(ptr);
        }
    }

    #[test]
    fn test_process_image_round_trip_through_arena() {
        let (w, h) = (16usize, 12usize);
        let source = vertical_step(w, h);

        let ptr = allocate(w * h * 4);
        assert!(!ptr.is_null());
        unsafe {
            std::ptr::copy_nonoverlapping(source.as_ptr(), ptr, source.len());
            assert!(process_image(ptr, w as i32, h as i32));
            let result = std::slice::from_raw_parts(ptr, w * h * 4).to_vec();
            assert_binary_opaque(&result);
            assert!(result.chunks_exact(4).any(|px| px[0] == 255));

            assert!(!process_image(ptr, -1, h as i32));
            assert_eq!(std::slice::from_raw_parts(ptr, w * h * 4), &result[..]);
            release(ptr);
        }
    }
}
