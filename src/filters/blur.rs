//! Gaussian smoothing.
//!
//! Two flavours share the same separable two-pass layout:
//!
//! - a fixed 5x5 binomial kernel `[1, 4, 6, 4, 1] / 16` on luminance, used as
//!   the noise-suppression stage of edge detection (f32 output, not rounded)
//! - a sized Gaussian on RGBA images, used by the blur filter (u8 output)
//!
//! Pixels outside the image are replaced by the nearest edge pixel
//! (clamp-to-edge).

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

use crate::error::{FilterError, Result};
use crate::memory::{try_array2, try_array3};

/// Normalized 1D binomial kernel (sigma close to 1.0).
pub const GAUSSIAN_5: [f32; 5] = [
    1.0 / 16.0,
    4.0 / 16.0,
    6.0 / 16.0,
    4.0 / 16.0,
    1.0 / 16.0,
];

/// Kernel size of the RGBA blur filter.
pub const RGBA_BLUR_SIZE: usize = 15;

/// Generate a normalized 1D Gaussian kernel of odd `size`.
///
/// Sigma is derived from the size as `0.3 * ((size - 1) / 2 - 1) + 0.8`,
/// the usual convention when only an aperture is given.
pub fn gaussian_kernel_1d(size: usize) -> Result<Vec<f32>> {
    if size == 0 || size % 2 == 0 {
        return Err(FilterError::InvalidDimensions {
            width: size as i64,
            height: size as i64,
        });
    }
    let half = size / 2;
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    // Normalize
    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    Ok(kernel)
}

#[inline]
fn clamp_index(i: usize, k: usize, half: usize, len: usize) -> usize {
    (i as isize + k as isize - half as isize).clamp(0, len as isize - 1) as usize
}

// ============================================================================
// Luminance (edge detection)
// ============================================================================

/// Smooth a luminance image with the 5x5 Gaussian.
///
/// Uses two 1D passes in f32. The result is not rounded so that gradients
/// are computed on the unquantized signal.
pub fn gaussian_blur_5x5(input: ArrayView2<u8>) -> Result<Array2<f32>> {
    let (height, width) = input.dim();
    let half = GAUSSIAN_5.len() / 2;

    let mut temp = try_array2((height, width), 0.0f32)?;
    let mut result = try_array2((height, width), 0.0f32)?;

    // Horizontal pass
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for (ki, &kv) in GAUSSIAN_5.iter().enumerate() {
                sum += input[[y, clamp_index(x, ki, half, width)]] as f32 * kv;
            }
            temp[[y, x]] = sum;
        }
    }

    // Vertical pass
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for (ki, &kv) in GAUSSIAN_5.iter().enumerate() {
                sum += temp[[clamp_index(y, ki, half, height), x]] * kv;
            }
            result[[y, x]] = sum;
        }
    }

    Ok(result)
}

// ============================================================================
// RGBA (blur filter)
// ============================================================================

/// Apply a `size` x `size` Gaussian blur to every channel of an RGBA image.
///
/// # Arguments
/// * `input` - RGBA image (height, width, 4) as u8
/// * `size` - Odd kernel size in pixels
///
/// # Returns
/// Blurred RGBA image with same dimensions, rounded and clamped to 0-255
pub fn gaussian_blur_rgba_u8(input: ArrayView3<u8>, size: usize) -> Result<Array3<u8>> {
    let kernel = gaussian_kernel_1d(size)?;
    let half = kernel.len() / 2;
    let (height, width, channels) = input.dim();

    let mut temp = try_array3((height, width, channels), 0.0f32)?;
    let mut result = try_array3((height, width, channels), 0u8)?;

    // Horizontal pass
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    sum += input[[y, clamp_index(x, ki, half, width), c]] as f32 * kv;
                }
                temp[[y, x, c]] = sum;
            }
        }
    }

    // Vertical pass
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    sum += temp[[clamp_index(y, ki, half, height), x, c]] * kv;
                }
                result[[y, x, c]] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(result)
}
