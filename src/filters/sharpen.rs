//! Sharpen filter.
//!
//! Convolves every RGBA channel with the 3x3 kernel
//!
//! ```text
//! -1 -1 -1
//! -1  9 -1
//! -1 -1 -1
//! ```
//!
//! which adds the Laplacian to the original. The kernel sums to 1, so flat
//! regions (including a constant alpha channel) pass through unchanged.
//! Borders are clamp-to-edge; integer results are clamped to 0-255.

use ndarray::{Array3, ArrayView3};

use crate::error::Result;
use crate::memory::try_array3;

const SHARPEN_3X3: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 9, -1], [-1, -1, -1]];

#[inline]
fn clamp_index(i: usize, k: usize, len: usize) -> usize {
    (i as isize + k as isize - 1).clamp(0, len as isize - 1) as usize
}

/// Sharpen an RGBA u8 image.
///
/// # Arguments
/// * `input` - RGBA image (height, width, 4) as u8
///
/// # Returns
/// Sharpened image with same dimensions
pub fn sharpen_rgba_u8(input: ArrayView3<u8>) -> Result<Array3<u8>> {
    let (height, width, channels) = input.dim();
    let mut output = try_array3((height, width, channels), 0u8)?;

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0i32;
                for (ky, row) in SHARPEN_3X3.iter().enumerate() {
                    let sy = clamp_index(y, ky, height);
                    for (kx, &kv) in row.iter().enumerate() {
                        sum += input[[sy, clamp_index(x, kx, width), c]] as i32 * kv;
                    }
                }
                output[[y, x, c]] = sum.clamp(0, 255) as u8;
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sharpen_flat_is_identity() {
        let img = Array3::<u8>::from_elem((5, 5, 4), 120);
        let out = sharpen_rgba_u8(img.view()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_sharpen_boosts_bright_pixel() {
        let mut img = Array3::<u8>::from_elem((5, 5, 4), 100);
        img[[2, 2, 0]] = 110;
        let out = sharpen_rgba_u8(img.view()).unwrap();
        // 9 * 110 - 8 * 100 = 190
        assert_eq!(out[[2, 2, 0]], 190);
        // neighbor: 9 * 100 - 7 * 100 - 110 = 90
        assert_eq!(out[[2, 1, 0]], 90);
        assert_eq!(out[[2, 2, 1]], 100);
    }

    #[test]
    fn test_sharpen_clamps() {
        let mut img = Array3::<u8>::zeros((3, 3, 4));
        img[[1, 1, 0]] = 200;
        let out = sharpen_rgba_u8(img.view()).unwrap();
        assert_eq!(out[[1, 1, 0]], 255);
        assert_eq!(out[[0, 0, 0]], 0);
    }
}
