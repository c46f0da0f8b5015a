//! Coordinate and geometry types shared by the render and scene modules.
//!
//! World space is whatever the current `View` maps; pixel space has its
//! origin at the top-left of the target with +Y down.

mod rect;
mod vec2;
mod vec3;

pub use rect::{FloatRect, IntRect};
pub use vec2::{Vec2, Vec2i};
pub use vec3::Vec3;
