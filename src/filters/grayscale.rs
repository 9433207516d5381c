//! Grayscale reduction and expansion.
//!
//! RGBA is reduced to a single luminance channel with ITU-R BT.601 weights,
//! and single-channel results are expanded back to opaque RGBA for display.
//!
//! ## Formats
//!
//! - **RGBA input**: (height, width, 4) u8, alpha is ignored
//! - **Luminance**: (height, width) u8
//! - **RGBA output**: (height, width, 4) u8 with R=G=B and A=255

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Zip};

use crate::error::Result;
use crate::memory::{try_array2, try_array3};

/// ITU-R BT.601 luma coefficients
pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

/// Luminance cut used by the binary threshold filter.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Weighted luminance of one pixel, rounded and clamped to 0-255.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    y.round().clamp(0.0, 255.0) as u8
}

// ============================================================================
// RGBA -> Luminance
// ============================================================================

/// Reduce an RGBA image to a single luminance channel.
///
/// # Arguments
/// * `input` - 3D array view of shape (height, width, 4)
///
/// # Returns
/// New (height, width) array of luminance values
pub fn grayscale_luma_u8(input: ArrayView3<u8>) -> Result<Array2<u8>> {
    let (height, width, _) = input.dim();
    let mut output = try_array2((height, width), 0u8)?;

    for y in 0..height {
        for x in 0..width {
            output[[y, x]] = luma(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]);
        }
    }

    Ok(output)
}

// ============================================================================
// Luminance -> RGBA
// ============================================================================

/// Expand a luminance image to opaque RGBA (R=G=B=value, A=255).
pub fn gray_to_rgba(input: ArrayView2<u8>) -> Result<Array3<u8>> {
    let (height, width) = input.dim();
    let mut output = try_array3((height, width, 4), 0u8)?;

    for y in 0..height {
        for x in 0..width {
            let v = input[[y, x]];
            output[[y, x, 0]] = v;
            output[[y, x, 1]] = v;
            output[[y, x, 2]] = v;
            output[[y, x, 3]] = 255;
        }
    }

    Ok(output)
}

/// Convert RGBA to grayscale RGBA (luma in RGB, opaque alpha).
pub fn grayscale_rgba_u8(input: ArrayView3<u8>) -> Result<Array3<u8>> {
    gray_to_rgba(grayscale_luma_u8(input)?.view())
}

// ============================================================================
// Binary threshold
// ============================================================================

/// Binary threshold: values strictly above `level` become 255, others 0.
pub fn threshold_luma(input: ArrayView2<u8>, level: u8) -> Result<Array2<u8>> {
    let mut output = try_array2(input.dim(), 0u8)?;
    Zip::from(&mut output)
        .and(&input)
        .for_each(|o, &v| *o = if v > level { 255 } else { 0 });
    Ok(output)
}
