//! Scene drawables.
//!
//! Responsibilities:
//! - keep drawable geometry in the linear heap so it can be drawn directly
//! - combine each drawable's own transform and texture into the caller's states
//! - keep geometry kinds in one closed set under [`Geometry`]

mod geometry;
mod shape;
mod vertex_array;

pub use geometry::{Geometry, DEFAULT_CIRCLE_POINTS};
pub use shape::Shape;
pub use vertex_array::VertexArray;
