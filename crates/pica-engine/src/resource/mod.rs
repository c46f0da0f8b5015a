//! GPU resources referenced by render states.
//!
//! Hardware handles are recycled once a resource is destroyed, so caches
//! compare the process-unique id each instance carries instead.

mod id;
mod shader;
mod texture;

pub use shader::Shader;
pub use texture::{CoordinateType, Texture};
