//! Byte regions handed across the host boundary.
//!
//! The host asks for a region, fills it with RGBA pixels, passes the address
//! back for processing, and frees it once it has read the result. Each region
//! carries a hidden length header so [`release`] needs only the address.
//!
//! Intermediate images are reserved through [`try_array2`] / [`try_array3`]
//! so an oversized frame fails with [`FilterError::AllocationFailed`] instead
//! of aborting the host.

use std::alloc::{self, Layout};
use std::collections::VecDeque;
use std::mem::size_of;

use ndarray::{Array2, Array3};

use crate::error::{FilterError, Result};

const ALIGN: usize = 8;
// Header spans a full alignment unit so the returned address keeps ALIGN.
const HEADER: usize = ALIGN;

fn layout_for(byte_count: usize) -> Option<Layout> {
    let total = byte_count.checked_add(HEADER)?;
    Layout::from_size_align(total, ALIGN).ok()
}

/// Allocate a zero-initialized region of `byte_count` bytes.
///
/// Ownership passes to the caller until [`release`] is called with the
/// returned address.
pub fn try_allocate(byte_count: usize) -> Result<*mut u8> {
    let failed = FilterError::AllocationFailed { bytes: byte_count };
    if byte_count == 0 {
        return Err(failed);
    }
    let layout = layout_for(byte_count).ok_or_else(|| failed.clone())?;
    // SAFETY: layout has non-zero size.
    unsafe {
        let base = alloc::alloc_zeroed(layout);
        if base.is_null() {
            return Err(failed);
        }
        (base as *mut usize).write(byte_count);
        Ok(base.add(HEADER))
    }
}

/// Like [`try_allocate`] but returns null on failure, for host bindings.
pub fn allocate(byte_count: usize) -> *mut u8 {
    match try_allocate(byte_count) {
        Ok(ptr) => ptr,
        Err(err) => {
            log::warn!("{}", err);
            std::ptr::null_mut()
        }
    }
}

/// Free a region returned by [`allocate`]. Null is ignored.
///
/// # Safety
/// `ptr` must come from [`allocate`] and must not have been released already.
pub unsafe fn release(ptr: *mut u8) {
    if ptr.is_null() {
        return;
    }
    let base = ptr.sub(HEADER);
    let byte_count = (base as *const usize).read();
    if let Some(layout) = layout_for(byte_count) {
        alloc::dealloc(base, layout);
    }
}

// ============================================================================
// Fallible intermediates
// ============================================================================

fn try_filled_vec<A: Clone>(len: Option<usize>, fill: A) -> Result<Vec<A>> {
    let Some(len) = len else {
        return Err(FilterError::AllocationFailed { bytes: usize::MAX });
    };
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| FilterError::AllocationFailed {
            bytes: len.saturating_mul(size_of::<A>()),
        })?;
    data.resize(len, fill);
    Ok(data)
}

/// `(height, width)` array filled with `fill`, or `AllocationFailed`.
pub fn try_array2<A: Clone>(shape: (usize, usize), fill: A) -> Result<Array2<A>> {
    let data = try_filled_vec(shape.0.checked_mul(shape.1), fill)?;
    let len = data.len();
    Array2::from_shape_vec(shape, data).map_err(|_| FilterError::SizeMismatch {
        expected: len,
        actual: len,
    })
}

/// `(height, width, channels)` array filled with `fill`, or `AllocationFailed`.
pub fn try_array3<A: Clone>(shape: (usize, usize, usize), fill: A) -> Result<Array3<A>> {
    let len = shape.0.checked_mul(shape.1).and_then(|n| n.checked_mul(shape.2));
    let data = try_filled_vec(len, fill)?;
    let len = data.len();
    Array3::from_shape_vec(shape, data).map_err(|_| FilterError::SizeMismatch {
        expected: len,
        actual: len,
    })
}

/// Append to a worklist without aborting when it has to grow.
pub fn try_push_back<T>(queue: &mut VecDeque<T>, item: T) -> Result<()> {
    queue.try_reserve(1).map_err(|_| FilterError::AllocationFailed {
        bytes: queue.len().saturating_add(1).saturating_mul(size_of::<T>()),
    })?;
    queue.push_back(item);
    Ok(())
}
