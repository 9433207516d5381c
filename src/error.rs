//! Error types shared by all filters.

use thiserror::Error;

/// Errors raised by the edge pipeline.
///
/// Every variant is detected before the caller's buffer is written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Width or height is zero or negative.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    /// Thresholds are negative, non-finite, or `low > high`.
    #[error("invalid thresholds: low={low}, high={high}")]
    InvalidThresholds { low: f32, high: f32 },

    /// Pixel addressed outside `[0, width) x [0, height)`.
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} buffer")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Backing slice does not hold exactly `width * height * channels` bytes.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Host passed a null address.
    #[error("null buffer address")]
    NullPointer,

    /// Intermediate or host allocation could not be satisfied.
    #[error("failed to allocate {bytes} bytes")]
    AllocationFailed { bytes: usize },
}

pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(feature = "python")]
impl From<FilterError> for pyo3::PyErr {
    fn from(err: FilterError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
