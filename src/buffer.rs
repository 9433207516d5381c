//! Non-owning pixel views over caller memory.
//!
//! A [`BufferView`] borrows a byte region it does not own and describes it as
//! `height` rows of `width` pixels with 1 (luminance) or 4 (RGBA) channels.
//! Shape metadata is validated once at construction; after that the region is
//! only reinterpreted, never resized.

use ndarray::{ArrayView3, ArrayViewMut3};

use crate::error::{FilterError, Result};

/// Pixel layouts understood by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Single 8-bit luminance channel.
    Gray,
    /// 8-bit red, green, blue, alpha.
    Rgba,
}

impl PixelFormat {
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Number of bytes a `width x height` image of `format` occupies.
///
/// Rejects zero sizes and sizes that overflow `usize`.
pub fn byte_len(width: usize, height: usize, format: PixelFormat) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(FilterError::InvalidDimensions {
            width: width as i64,
            height: height as i64,
        });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(format.channels()))
        .ok_or(FilterError::InvalidDimensions {
            width: width as i64,
            height: height as i64,
        })
}

/// Borrowed read/write view over `width * height * channels` bytes.
#[derive(Debug)]
pub struct BufferView<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    format: PixelFormat,
}

impl<'a> BufferView<'a> {
    /// Wrap a slice, checking that its length matches the described shape.
    pub fn new(
        data: &'a mut [u8],
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        let expected = byte_len(width, height, format)?;
        if data.len() != expected {
            return Err(FilterError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    /// Wrap a region handed over by address.
    ///
    /// # Safety
    /// `ptr` must be valid for reads and writes of
    /// `width * height * format.channels()` bytes for `'a`, and nothing else
    /// may access that region while the view is alive.
    pub unsafe fn from_raw_parts(
        ptr: *mut u8,
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        if ptr.is_null() {
            return Err(FilterError::NullPointer);
        }
        let len = byte_len(width, height, format)?;
        let data = std::slice::from_raw_parts_mut(ptr, len);
        Self::new(data, width, height, format)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Linear byte offset of pixel `(x, y)`.
    pub fn offset(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(FilterError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let channels = self.channels();
        Ok(y * self.width * channels + x * channels)
    }

    /// Channel bytes of pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Result<&[u8]> {
        let start = self.offset(x, y)?;
        Ok(&self.data[start..start + self.channels()])
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> Result<&mut [u8]> {
        let start = self.offset(x, y)?;
        let end = start + self.channels();
        Ok(&mut self.data[start..end])
    }

    /// Shape `(height, width, channels)` view for whole-image filters.
    pub fn as_array(&self) -> Result<ArrayView3<'_, u8>> {
        let shape = (self.height, self.width, self.channels());
        ArrayView3::from_shape(shape, &*self.data).map_err(|_| self.size_mismatch())
    }

    pub fn as_array_mut(&mut self) -> Result<ArrayViewMut3<'_, u8>> {
        let shape = (self.height, self.width, self.channels());
        let err = self.size_mismatch();
        ArrayViewMut3::from_shape(shape, &mut *self.data).map_err(|_| err)
    }

    /// Overwrite the whole region with `src`, which must have the same shape.
    pub fn copy_from(&mut self, src: ArrayView3<'_, u8>) -> Result<()> {
        let expected = (self.height, self.width, self.channels());
        if src.dim() != expected {
            return Err(FilterError::SizeMismatch {
                expected: self.data.len(),
                actual: src.len(),
            });
        }
        self.as_array_mut()?.assign(&src);
        Ok(())
    }

    fn size_mismatch(&self) -> FilterError {
        FilterError::SizeMismatch {
            expected: self.width * self.height * self.channels(),
            actual: self.data.len(),
        }
    }
}
