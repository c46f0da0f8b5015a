//! GPU-addressable memory.
//!
//! The GPU can only fetch vertices from the linear heap, a physically
//! contiguous region with a known base address. [`LinearHeap`] hands out
//! ranges of it as [`DeviceBuffer`]s; draw calls take a [`DeviceSlice`],
//! which carries the physical address the GPU will read from.
//!
//! A slice built from ordinary host memory has no physical address and is
//! rejected at draw time.

mod buffer;
mod error;
mod heap;

pub use buffer::{DeviceBuffer, DeviceSlice};
pub use error::AllocError;
pub use heap::{HeapInit, LinearHeap};
