use crate::device::{Gpu, TextureBinding};
use crate::transform::Transform;

use super::id::next_cache_id;

/// How texture coordinates in vertices are interpreted when binding.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CoordinateType {
    /// Coordinates in [0, 1].
    Normalized,
    /// Coordinates in texels, `[0, width] x [0, height]`.
    Pixels,
}

/// Texture living on the device.
///
/// The hardware `handle` is owned by whoever uploaded the pixels; this type
/// only describes it. `cache_id` identifies this particular texture
/// instance for render-state caching.
#[derive(Debug)]
pub struct Texture {
    handle: u32,
    size: (u32, u32),
    cache_id: u64,
    smooth: bool,
    repeated: bool,
}

impl Texture {
    pub fn new(handle: u32, width: u32, height: u32) -> Self {
        Self {
            handle,
            size: (width, height),
            cache_id: next_cache_id(),
            smooth: false,
            repeated: false,
        }
    }

    /// Points this texture at new storage. Caches will treat it as a
    /// different texture.
    pub fn recreate(&mut self, handle: u32, width: u32, height: u32) {
        self.handle = handle;
        self.size = (width, height);
        self.cache_id = next_cache_id();
    }

    pub fn handle(&self) -> u32 {
        self.handle
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn cache_id(&self) -> u64 {
        self.cache_id
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    /// Changing the filter counts as a new texture for render-state caches,
    /// since the sampler flags travel with the binding.
    pub fn set_smooth(&mut self, smooth: bool) {
        if self.smooth != smooth {
            self.smooth = smooth;
            self.cache_id = next_cache_id();
        }
    }

    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    /// Like [`set_smooth`](Self::set_smooth), a change gives a new cache id.
    pub fn set_repeated(&mut self, repeated: bool) {
        if self.repeated != repeated {
            self.repeated = repeated;
            self.cache_id = next_cache_id();
        }
    }

    /// Binds `texture` to unit 0, or unbinds with `None`.
    ///
    /// With [`CoordinateType::Pixels`] the texture matrix is loaded with a
    /// `1/size` scale so vertices can carry texel coordinates.
    pub fn bind(gpu: &mut dyn Gpu, texture: Option<&Texture>, coords: CoordinateType) {
        let Some(tex) = texture else {
            gpu.bind_texture(None);
            return;
        };

        gpu.bind_texture(Some(TextureBinding {
            handle: tex.handle,
            smooth: tex.smooth,
            repeated: tex.repeated,
        }));

        let matrix = match coords {
            CoordinateType::Pixels if tex.size.0 > 0 && tex.size.1 > 0 => Transform::IDENTITY
                .scale(crate::coords::Vec2::new(
                    1.0 / tex.size.0 as f32,
                    1.0 / tex.size.1 as f32,
                )),
            _ => Transform::IDENTITY,
        };
        gpu.set_texture_matrix(matrix.matrix());
    }
}

#[cfg(test)]
mod tests {
    use crate::device::{CommandRecorder, GpuCommand};

    use super::*;

    #[test]
    fn recycled_handle_gets_new_id() {
        let first = Texture::new(7, 64, 64);
        let first_id = first.cache_id();
        drop(first);
        let second = Texture::new(7, 64, 64);
        assert_ne!(second.cache_id(), first_id);
    }

    #[test]
    fn recreate_changes_id() {
        let mut tex = Texture::new(1, 8, 8);
        let id = tex.cache_id();
        tex.recreate(2, 16, 16);
        assert_ne!(tex.cache_id(), id);
        assert_eq!(tex.size(), (16, 16));
    }

    #[test]
    fn sampler_change_gets_new_id() {
        let mut tex = Texture::new(4, 8, 8);
        let id = tex.cache_id();

        tex.set_smooth(false);
        assert_eq!(tex.cache_id(), id);

        tex.set_smooth(true);
        let smooth_id = tex.cache_id();
        assert_ne!(smooth_id, id);

        tex.set_repeated(true);
        assert_ne!(tex.cache_id(), smooth_id);
    }

    #[test]
    fn pixel_binding_scales_by_inverse_size() {
        let mut gpu = CommandRecorder::default();
        let log = gpu.log();
        let tex = Texture::new(3, 64, 32);
        Texture::bind(&mut gpu, Some(&tex), CoordinateType::Pixels);

        let cmds = log.commands();
        let GpuCommand::SetTextureMatrix(m) = cmds[1] else {
            panic!("expected texture matrix, got {:?}", cmds[1]);
        };
        assert_eq!(m[0], 1.0 / 64.0);
        assert_eq!(m[5], 1.0 / 32.0);
    }

    #[test]
    fn unbinding_skips_matrix() {
        let mut gpu = CommandRecorder::default();
        let log = gpu.log();
        Texture::bind(&mut gpu, None, CoordinateType::Pixels);
        assert_eq!(*log.commands(), vec![GpuCommand::BindTexture(None)]);
    }
}
