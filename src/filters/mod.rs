//! Filter modules for the edge pipeline and the RGBA filters.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Luminance | (H, W) | u8 | Single channel, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | Red, green, blue, alpha, 0-255 |
//!
//! Intermediate stages (smoothing, gradients) work in f32 and never round
//! back to 8 bits before thresholding.
//!
//! ## Filter Categories
//!
//! - **Grayscale**: RGBA to luminance, luminance to opaque RGBA, binary threshold
//! - **Blur**: fixed 5x5 Gaussian on luminance, sized Gaussian on RGBA
//! - **Sharpen**: 3x3 Laplacian boost on RGBA
//! - **Edge**: Sobel gradient magnitude and quantized direction
//! - **Canny**: non-maximum suppression, hysteresis, full detector

pub mod blur;
pub mod canny;
pub mod edge;
pub mod grayscale;
pub mod sharpen;
