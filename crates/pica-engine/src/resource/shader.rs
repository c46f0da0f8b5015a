use crate::device::{Gpu, ProgramHandle};

use super::id::next_cache_id;

/// Linked shader program.
///
/// Shader uniforms are not tracked here, which is why render targets rebind
/// a shader on every draw that uses one.
#[derive(Debug)]
pub struct Shader {
    program: ProgramHandle,
    cache_id: u64,
}

impl Shader {
    pub fn new(program: ProgramHandle) -> Self {
        Self {
            program,
            cache_id: next_cache_id(),
        }
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Process-unique id of this instance.
    ///
    /// Render targets never compare it, because uniforms can change without
    /// the id changing. It is exposed for callers that key their own tables
    /// by shader instance.
    pub fn cache_id(&self) -> u64 {
        self.cache_id
    }

    /// Whether the device can run shaders at all.
    pub fn is_available(gpu: &dyn Gpu) -> bool {
        gpu.shaders_supported()
    }

    /// Binds `shader`, or restores the fixed-function path with `None`.
    pub fn bind(gpu: &mut dyn Gpu, shader: Option<&Shader>) {
        gpu.bind_shader(shader.map(|s| s.program));
    }
}
