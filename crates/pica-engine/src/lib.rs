//! Pica engine crate.
//!
//! This crate owns the render-state cache and draw submission for a
//! fixed-function GPU, plus the memory, resource and scene pieces they need.

pub mod device;
pub mod memory;
pub mod resource;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod transform;
pub mod render;
pub mod scene;
