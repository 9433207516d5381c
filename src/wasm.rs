//! WebAssembly exports for the edge pipeline.
//!
//! JavaScript drives these through linear memory:
//!
//! 1. `memory_alloc(width * height * 4)` returns an address
//! 2. copy canvas `ImageData` bytes into `memory.buffer` at that address
//! 3. `process_image(address, width, height)` rewrites the region in place
//! 4. read the result back, then `memory_free(address)`
//!
//! Processing is destructive: the source pixels are replaced by the result.

use wasm_bindgen::prelude::*;

use crate::filters::canny::CannyParams;
use crate::filters::grayscale::DEFAULT_THRESHOLD;
use crate::memory;
use crate::pipeline::{self, Operation};

// ============================================================================
// Memory
// ============================================================================

/// Allocate `byte_count` zeroed bytes. Returns 0 on failure.
#[wasm_bindgen]
pub fn memory_alloc(byte_count: usize) -> *mut u8 {
    memory::allocate(byte_count)
}

/// Free a region returned by `memory_alloc`. It must not be freed twice.
#[wasm_bindgen]
pub fn memory_free(ptr: *mut u8) {
    // SAFETY: the host only passes addresses it got from memory_alloc.
    unsafe { memory::release(ptr) }
}

// ============================================================================
// Filters
// ============================================================================

// SAFETY (all filters below): the host passes an address from memory_alloc
// covering `width * height * 4` bytes and does not touch it during the call.

/// Replace RGBA pixels with their Canny edge map (thresholds 100/200).
#[wasm_bindgen]
pub fn process_image(ptr: *mut u8, width: i32, height: i32) -> bool {
    unsafe { pipeline::process_image(ptr, width, height) }
}

/// Canny edge map with caller-chosen thresholds on the gradient scale.
#[wasm_bindgen]
pub fn process_image_with_thresholds(
    ptr: *mut u8,
    width: i32,
    height: i32,
    low: f32,
    high: f32,
) -> bool {
    let params = CannyParams { low, high };
    unsafe { pipeline::run_reporting(ptr, width, height, Operation::Canny(params)) }
}

/// Replace RGBA pixels with opaque BT.601 grayscale.
#[wasm_bindgen]
pub fn grayscale_image(ptr: *mut u8, width: i32, height: i32) -> bool {
    unsafe { pipeline::run_reporting(ptr, width, height, Operation::Grayscale) }
}

/// Replace RGBA pixels with a black/white luminance threshold at 128.
#[wasm_bindgen]
pub fn threshold_image(ptr: *mut u8, width: i32, height: i32) -> bool {
    unsafe { pipeline::run_reporting(ptr, width, height, Operation::Threshold(DEFAULT_THRESHOLD)) }
}

/// Replace RGBA pixels with a 15x15 Gaussian blur of every channel.
#[wasm_bindgen]
pub fn blur_image(ptr: *mut u8, width: i32, height: i32) -> bool {
    unsafe { pipeline::run_reporting(ptr, width, height, Operation::Blur) }
}

/// Replace RGBA pixels with a 3x3 sharpen of every channel.
#[wasm_bindgen]
pub fn sharpen_image(ptr: *mut u8, width: i32, height: i32) -> bool {
    unsafe { pipeline::run_reporting(ptr, width, height, Operation::Sharpen) }
}
