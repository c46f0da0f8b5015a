//! Draw submission.
//!
//! A [`RenderTarget`] turns batches of [`Vertex`] plus [`RenderStates`] into
//! device commands, skipping state the device already has.
//!
//! Convention:
//! - World coordinates are mapped to the target through a [`View`].
//! - Pixel coordinates use a top-left origin, +Y down.
//! - Vertex data handed to the device must live in the linear heap.

mod blend;
mod cache;
mod drawable;
mod primitive;
mod states;
mod target;
mod vertex;
mod view;

pub use blend::{BlendEquation, BlendFactor, BlendMode, BLEND_ADD, BLEND_ALPHA, BLEND_MULTIPLY, BLEND_NONE};
pub use cache::VERTEX_CACHE_CAPACITY;
pub use drawable::Drawable;
pub use primitive::PrimitiveType;
pub use states::RenderStates;
pub use target::{RenderTarget, TargetInit};
pub use vertex::Vertex;
pub use view::View;
