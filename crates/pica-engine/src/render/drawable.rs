use super::{RenderStates, RenderTarget};

/// Anything that can draw itself onto a render target.
///
/// Implementors combine their own transform/texture into `states` and end up
/// calling `RenderTarget::draw_vertices`.
pub trait Drawable {
    fn draw(&self, target: &mut RenderTarget, states: &RenderStates<'_>);
}
