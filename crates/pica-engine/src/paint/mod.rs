//! Color model shared between scene drawables and the render target.

mod color;

pub use color::Color;
