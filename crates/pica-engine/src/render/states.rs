use crate::resource::{Shader, Texture};
use crate::transform::Transform;

use super::{BlendMode, BLEND_ALPHA};

/// Everything that decides how one batch of vertices is drawn.
#[derive(Debug, Copy, Clone)]
pub struct RenderStates<'a> {
    pub blend_mode: BlendMode,
    pub transform: Transform,
    pub texture: Option<&'a Texture>,
    pub shader: Option<&'a Shader>,
}

impl<'a> RenderStates<'a> {
    pub const DEFAULT: RenderStates<'static> = RenderStates {
        blend_mode: BLEND_ALPHA,
        transform: Transform::IDENTITY,
        texture: None,
        shader: None,
    };

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_texture(mut self, texture: &'a Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_shader(mut self, shader: &'a Shader) -> Self {
        self.shader = Some(shader);
        self
    }
}

impl Default for RenderStates<'_> {
    fn default() -> Self {
        RenderStates::DEFAULT
    }
}
