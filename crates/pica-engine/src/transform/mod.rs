//! Affine transforms and the position/rotation/scale/origin helper used by
//! scene drawables.

mod matrix;
mod transformable;

pub use matrix::Transform;
pub use transformable::Transformable;
