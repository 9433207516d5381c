//! Canny edge maps for RGBA pixel buffers.
//!
//! Converts an RGBA image to BT.601 luminance, runs Canny edge detection, and
//! writes the result back as opaque black/white RGBA. Hosts hand over raw
//! memory (WASM linear memory via wasm-bindgen) or numpy arrays (PyO3).
//!
//! ## Image Format
//! - **RGBA**: (height, width, 4) u8, row-major, no padding between rows
//! - **Luminance**: (height, width) u8
//!
//! ## Pipeline
//! 1. Grayscale reduction ([`filters::grayscale`])
//! 2. 5x5 Gaussian smoothing ([`filters::blur`])
//! 3. Sobel gradients with quantized directions ([`filters::edge`])
//! 4. Non-maximum suppression and hysteresis ([`filters::canny`])
//! 5. Expansion to RGBA, written into the caller's buffer ([`pipeline`])
//!
//! Every call is synchronous and stateless; intermediates are dropped before
//! returning and no reference to the caller's memory is kept.

pub mod buffer;
pub mod error;
pub mod filters;
pub mod memory;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::{BufferView, PixelFormat};
pub use error::{FilterError, Result};
pub use filters::canny::{canny, CannyParams, EdgeMask};
pub use filters::edge::MAX_GRADIENT_MAGNITUDE;
pub use pipeline::{detect_edges_in_place, process_rgba_in_place, Operation};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray3};
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::canny::{canny_rgba as canny_rgba_impl, CannyParams};
    use crate::filters::grayscale::{grayscale_luma_u8, grayscale_rgba_u8};

    fn require_rgba(shape: &[usize]) -> Result<(), FilterError> {
        let (height, width, channels) = (shape[0], shape[1], shape[2]);
        if height == 0 || width == 0 {
            return Err(FilterError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        if channels != 4 {
            return Err(FilterError::SizeMismatch {
                expected: height * width * 4,
                actual: height * width * channels,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Edge Detection
    // ========================================================================

    /// Canny edge map of an RGBA u8 image.
    ///
    /// Thresholds are on the Sobel gradient-magnitude scale (0 to ~1442).
    /// Output is RGBA with white edges on black, alpha 255.
    #[pyfunction]
    #[pyo3(signature = (image, low=100.0, high=200.0))]
    pub fn canny_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        low: f32,
        high: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let params = CannyParams::new(low, high)?;
        let input = image.as_array();
        require_rgba(input.shape())?;
        let gray = grayscale_luma_u8(input)?;
        let result = canny_rgba_impl(gray.view(), &params)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Grayscale
    // ========================================================================

    /// BT.601 luminance of an RGBA u8 image as a (height, width) array.
    #[pyfunction]
    pub fn grayscale_luma<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let input = image.as_array();
        require_rgba(input.shape())?;
        Ok(grayscale_luma_u8(input)?.into_pyarray(py))
    }

    /// RGBA u8 image converted to opaque grayscale RGBA.
    #[pyfunction]
    pub fn grayscale_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        require_rgba(input.shape())?;
        Ok(grayscale_rgba_u8(input)?.into_pyarray(py))
    }

    /// Canny edge Rust extension module
    #[pymodule]
    pub fn canny_edge(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(canny_rgba, m)?)?;
        m.add_function(wrap_pyfunction!(grayscale_luma, m)?)?;
        m.add_function(wrap_pyfunction!(grayscale_rgba, m)?)?;
        Ok(())
    }
}
