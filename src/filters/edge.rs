//! Sobel gradients with quantized directions.
//!
//! Gradients are computed with the unnormalized 3x3 Sobel kernels over a
//! smoothed luminance image in the 0-255 range, so the L2 magnitude lies in
//! `[0, MAX_GRADIENT_MAGNITUDE]`. Canny thresholds are expressed on this scale.
//! Border pixels have no full 3x3 neighborhood and are left at magnitude 0.

use std::f32::consts::SQRT_2;

use ndarray::{Array2, ArrayView2};

use crate::error::Result;
use crate::memory::try_array2;

/// Largest magnitude a 0-255 image can produce: `4 * 255 * sqrt(2)`.
pub const MAX_GRADIENT_MAGNITUDE: f32 = 4.0 * 255.0 * SQRT_2;

const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Gradient direction rounded to one of four canonical angles.
///
/// Angles are taken modulo 180 degrees in image coordinates (y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// 0 degrees: gradient along x.
    Horizontal,
    /// 45 degrees: gradient along +x +y.
    Diagonal,
    /// 90 degrees: gradient along y.
    Vertical,
    /// 135 degrees: gradient along -x +y.
    AntiDiagonal,
}

impl Direction {
    /// Quantize the angle of `(gx, gy)` to the nearest canonical direction.
    pub fn from_gradient(gx: f32, gy: f32) -> Self {
        let mut angle = gy.atan2(gx).to_degrees();
        if angle < 0.0 {
            angle += 180.0;
        }
        if !(22.5..157.5).contains(&angle) {
            Direction::Horizontal
        } else if angle < 67.5 {
            Direction::Diagonal
        } else if angle < 112.5 {
            Direction::Vertical
        } else {
            Direction::AntiDiagonal
        }
    }

    /// `(dx, dy)` of the two neighbors lying along the gradient.
    pub fn neighbor_offsets(self) -> [(isize, isize); 2] {
        match self {
            Direction::Horizontal => [(-1, 0), (1, 0)],
            Direction::Diagonal => [(1, 1), (-1, -1)],
            Direction::Vertical => [(0, -1), (0, 1)],
            Direction::AntiDiagonal => [(-1, 1), (1, -1)],
        }
    }
}

/// Per-pixel gradient magnitude and quantized direction.
#[derive(Debug, Clone)]
pub struct GradientField {
    pub magnitude: Array2<f32>,
    pub direction: Array2<Direction>,
}

impl GradientField {
    pub fn dim(&self) -> (usize, usize) {
        self.magnitude.dim()
    }
}

/// Apply both Sobel kernels to every interior pixel.
///
/// # Arguments
/// * `input` - Smoothed luminance (height, width), values 0.0-255.0
///
/// # Returns
/// Gradient field of the same shape; border entries are zero.
pub fn sobel_gradient(input: ArrayView2<f32>) -> Result<GradientField> {
    let (height, width) = input.dim();
    let mut magnitude = try_array2((height, width), 0.0f32)?;
    let mut direction = try_array2((height, width), Direction::Horizontal)?;

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let mut gx = 0.0f32;
            let mut gy = 0.0f32;

            for ky in 0..3 {
                for kx in 0..3 {
                    let v = input[[y + ky - 1, x + kx - 1]];
                    gx += v * SOBEL_X[ky][kx];
                    gy += v * SOBEL_Y[ky][kx];
                }
            }

            magnitude[[y, x]] = gx.hypot(gy);
            direction[[y, x]] = Direction::from_gradient(gx, gy);
        }
    }

    Ok(GradientField {
        magnitude,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_buckets() {
        assert_eq!(Direction::from_gradient(1.0, 0.0), Direction::Horizontal);
        assert_eq!(Direction::from_gradient(-1.0, 0.0), Direction::Horizontal);
        assert_eq!(Direction::from_gradient(1.0, 1.0), Direction::Diagonal);
        assert_eq!(Direction::from_gradient(0.0, 1.0), Direction::Vertical);
        assert_eq!(Direction::from_gradient(0.0, -1.0), Direction::Vertical);
        assert_eq!(Direction::from_gradient(-1.0, 1.0), Direction::AntiDiagonal);
        assert_eq!(Direction::from_gradient(1.0, -1.0), Direction::AntiDiagonal);
        // 20 degrees rounds down to horizontal, 25 up to diagonal
        let a = 20f32.to_radians();
        assert_eq!(Direction::from_gradient(a.cos(), a.sin()), Direction::Horizontal);
        let b = 25f32.to_radians();
        assert_eq!(Direction::from_gradient(b.cos(), b.sin()), Direction::Diagonal);
    }

    #[test]
    fn test_flat_has_no_gradient() {
        let img = Array2::<f32>::from_elem((5, 5), 128.0);
        let field = sobel_gradient(img.view()).unwrap();
        assert!(field.magnitude.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_vertical_step_is_horizontal_gradient() {
        let img = Array2::from_shape_fn((5, 6), |(_, x)| if x < 3 { 0.0f32 } else { 255.0 });
        let field = sobel_gradient(img.view()).unwrap();
        assert!((field.magnitude[[2, 2]] - 1020.0).abs() < 1e-3);
        assert!((field.magnitude[[2, 3]] - 1020.0).abs() < 1e-3);
        assert_eq!(field.magnitude[[2, 1]], 0.0);
        assert_eq!(field.direction[[2, 2]], Direction::Horizontal);
    }

    #[test]
    fn test_borders_are_zero() {
        let img = Array2::from_shape_fn((4, 4), |(y, x)| (x * 60 + y * 10) as f32);
        let field = sobel_gradient(img.view()).unwrap();
        for x in 0..4 {
            assert_eq!(field.magnitude[[0, x]], 0.0);
            assert_eq!(field.magnitude[[3, x]], 0.0);
        }
        assert!(field.magnitude[[1, 1]] > 0.0);
    }

    #[test]
    fn test_tiny_image_does_not_panic() {
        let img = Array2::<f32>::zeros((1, 2));
        let field = sobel_gradient(img.view()).unwrap();
        assert_eq!(field.dim(), (1, 2));
    }

    #[test]
    fn test_max_magnitude_reachable() {
        // Bright top-left triangle gives a diagonal step at the center pixel.
        let img = Array2::from_shape_fn((3, 3), |(y, x)| if x + y < 2 { 255.0f32 } else { 0.0 });
        let field = sobel_gradient(img.view()).unwrap();
        assert!(field.magnitude[[1, 1]] <= MAX_GRADIENT_MAGNITUDE + 1e-3);
    }
}
