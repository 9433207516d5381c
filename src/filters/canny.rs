//! Canny edge detection.
//!
//! Stages run one after another over whole images:
//!
//! 1. 5x5 Gaussian smoothing ([`gaussian_blur_5x5`])
//! 2. Sobel gradient magnitude and quantized direction ([`sobel_gradient`])
//! 3. Non-maximum suppression along the gradient
//! 4. Double threshold with hysteresis (8-connected flood fill from strong pixels)
//!
//! ## Threshold scale
//!
//! `low` and `high` are compared against the real-valued L2 Sobel magnitude of
//! the smoothed 0-255 luminance, not against pixel values. That scale runs from
//! 0 to [`MAX_GRADIENT_MAGNITUDE`] (about 1442.5). A clean black/white step
//! yields a peak of roughly 640 after smoothing.

use std::collections::VecDeque;

use log::debug;
use ndarray::{Array2, Array3, ArrayView2, Zip};

use super::blur::gaussian_blur_5x5;
use super::edge::{sobel_gradient, GradientField, MAX_GRADIENT_MAGNITUDE};
use super::grayscale::gray_to_rgba;
use crate::error::{FilterError, Result};
use crate::memory::{try_array2, try_push_back};

const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Hysteresis thresholds on the gradient-magnitude scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannyParams {
    pub low: f32,
    pub high: f32,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low: 100.0,
            high: 200.0,
        }
    }
}

impl CannyParams {
    pub fn new(low: f32, high: f32) -> Result<Self> {
        let params = Self { low, high };
        params.validate()?;
        Ok(params)
    }

    /// Both thresholds must be finite, non-negative, and `low <= high`.
    pub fn validate(&self) -> Result<()> {
        let ok = self.low.is_finite()
            && self.high.is_finite()
            && self.low >= 0.0
            && self.low <= self.high;
        if ok {
            Ok(())
        } else {
            Err(FilterError::InvalidThresholds {
                low: self.low,
                high: self.high,
            })
        }
    }
}

/// Double-threshold class of a single magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeClass {
    Suppressed,
    Weak,
    Strong,
}

/// Classify a thinned magnitude.
///
/// Zero magnitudes are always suppressed so flat regions never turn into
/// edges, even with a zero threshold.
pub fn classify(magnitude: f32, params: &CannyParams) -> EdgeClass {
    if magnitude <= 0.0 {
        EdgeClass::Suppressed
    } else if magnitude >= params.high {
        EdgeClass::Strong
    } else if magnitude >= params.low {
        EdgeClass::Weak
    } else {
        EdgeClass::Suppressed
    }
}

/// Binary edge map with the same shape as the luminance input.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMask {
    edges: Array2<bool>,
}

impl EdgeMask {
    pub fn dim(&self) -> (usize, usize) {
        self.edges.dim()
    }

    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.edges.get([y, x]).copied().unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.edges.iter().filter(|&&e| e).count()
    }

    /// Edge pixels become 255, others 0.
    pub fn to_gray(&self) -> Result<Array2<u8>> {
        let mut gray = try_array2(self.dim(), 0u8)?;
        Zip::from(&mut gray)
            .and(&self.edges)
            .for_each(|g, &e| *g = if e { 255 } else { 0 });
        Ok(gray)
    }

    /// Edge pixels become opaque white, others opaque black.
    pub fn to_rgba(&self) -> Result<Array3<u8>> {
        gray_to_rgba(self.to_gray()?.view())
    }
}

// ============================================================================
// Non-maximum suppression
// ============================================================================

/// Keep only magnitudes that are local maxima along their gradient direction.
///
/// Ties with a neighbor keep the center pixel. Border pixels stay zero.
pub fn non_maximum_suppression(field: &GradientField) -> Result<Array2<f32>> {
    let (height, width) = field.dim();
    let mut output = try_array2((height, width), 0.0f32)?;

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let m = field.magnitude[[y, x]];
            if m <= 0.0 {
                continue;
            }

            let is_max = field.direction[[y, x]]
                .neighbor_offsets()
                .iter()
                .all(|&(dx, dy)| {
                    let nx = (x as isize + dx) as usize;
                    let ny = (y as isize + dy) as usize;
                    m >= field.magnitude[[ny, nx]]
                });

            if is_max {
                output[[y, x]] = m;
            }
        }
    }

    Ok(output)
}

// ============================================================================
// Hysteresis
// ============================================================================

/// Double threshold with hysteresis over a thinned magnitude field.
///
/// Strong pixels seed a worklist; weak pixels reachable from a seed through
/// 8-connected chains of weak pixels are promoted. Everything else is dropped.
pub fn hysteresis(magnitude: ArrayView2<f32>, params: &CannyParams) -> Result<EdgeMask> {
    let (height, width) = magnitude.dim();
    let mut classes = try_array2((height, width), EdgeClass::Suppressed)?;
    Zip::from(&mut classes)
        .and(&magnitude)
        .for_each(|c, &m| *c = classify(m, params));
    let mut edges = try_array2((height, width), false)?;
    let mut queue = VecDeque::new();

    for ((y, x), class) in classes.indexed_iter() {
        if *class == EdgeClass::Strong {
            edges[[y, x]] = true;
            try_push_back(&mut queue, (x, y))?;
        }
    }
    let strong = queue.len();

    while let Some((x, y)) = queue.pop_front() {
        for &(dx, dy) in &NEIGHBORS_8 {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if !edges[[ny, nx]] && classes[[ny, nx]] == EdgeClass::Weak {
                edges[[ny, nx]] = true;
                try_push_back(&mut queue, (nx, ny))?;
            }
        }
    }

    let mask = EdgeMask { edges };
    debug!(
        "hysteresis: {} strong seeds, {} edge pixels after promotion",
        strong,
        mask.count()
    );
    Ok(mask)
}

// ============================================================================
// Full pipeline
// ============================================================================

/// Run Canny edge detection on a luminance image.
///
/// # Arguments
/// * `input` - Luminance (height, width), values 0-255
/// * `params` - Hysteresis thresholds on the gradient-magnitude scale
///
/// # Returns
/// Edge mask with the input's shape, or an error for empty input or
/// invalid thresholds
pub fn canny(input: ArrayView2<u8>, params: &CannyParams) -> Result<EdgeMask> {
    params.validate()?;
    let (height, width) = input.dim();
    if width == 0 || height == 0 {
        return Err(FilterError::InvalidDimensions {
            width: width as i64,
            height: height as i64,
        });
    }
    debug!(
        "canny {}x{} low={} high={} (max magnitude {:.1})",
        width, height, params.low, params.high, MAX_GRADIENT_MAGNITUDE
    );

    let smoothed = gaussian_blur_5x5(input)?;
    let field = sobel_gradient(smoothed.view())?;
    let thinned = non_maximum_suppression(&field)?;
    hysteresis(thinned.view(), params)
}

/// Canny edge detection returning an opaque black/white RGBA image.
pub fn canny_rgba(input: ArrayView2<u8>, params: &CannyParams) -> Result<Array3<u8>> {
    canny(input, params)?.to_rgba()
}
