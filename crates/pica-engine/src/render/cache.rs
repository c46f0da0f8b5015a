use crate::memory::{AllocError, DeviceBuffer, LinearHeap};
use crate::transform::Transform;

use super::{BlendMode, Vertex, BLEND_ALPHA};

/// Largest draw, in vertices, that is pre-transformed on the CPU.
pub const VERTEX_CACHE_CAPACITY: usize = 256;

/// Last state applied to the device by one render target.
///
/// Invariant: after any successful apply these fields match the device.
/// While `gl_states_set` is false nothing is known and the next draw must
/// start with a full reset.
#[derive(Debug)]
pub(super) struct StatesCache {
    pub gl_states_set: bool,
    pub view_changed: bool,
    /// The previous draw went through `vertex_cache`, so the scratch buffer
    /// binding is still in place.
    pub use_vertex_cache: bool,
    /// The bound modelview is the identity.
    pub identity_bound: bool,
    pub last_blend_mode: BlendMode,
    /// `Texture::cache_id` of the bound texture, 0 for none.
    pub last_texture_id: u64,
    /// Probed on the first reset and kept for the target's lifetime.
    pub shader_available: Option<bool>,
    pub vertex_cache: DeviceBuffer<Vertex>,
}

impl StatesCache {
    pub fn new(heap: &LinearHeap) -> Result<Self, AllocError> {
        let mut vertex_cache = heap.alloc::<Vertex>(VERTEX_CACHE_CAPACITY)?;
        vertex_cache.fill(Vertex::default());

        Ok(Self {
            gl_states_set: false,
            view_changed: false,
            use_vertex_cache: false,
            identity_bound: false,
            last_blend_mode: BLEND_ALPHA,
            last_texture_id: 0,
            shader_available: None,
            vertex_cache,
        })
    }

    /// Writes `src` into the scratch buffer with positions mapped by
    /// `transform`. `src` must fit in the cache.
    pub fn pre_transform(&mut self, src: &[Vertex], transform: &Transform) {
        debug_assert!(src.len() <= VERTEX_CACHE_CAPACITY);

        for (dst, v) in self.vertex_cache.iter_mut().zip(src) {
            *dst = Vertex {
                position: transform.transform_point(v.position()).to_array(),
                ..*v
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::coords::{Vec2, Vec3};
    use crate::memory::HeapInit;
    use crate::paint::Color;

    use super::*;

    #[test]
    fn starts_unset() {
        let heap = LinearHeap::new(HeapInit::default()).unwrap();
        let cache = StatesCache::new(&heap).unwrap();
        assert!(!cache.gl_states_set);
        assert_eq!(cache.last_texture_id, 0);
        assert_eq!(cache.vertex_cache.len(), VERTEX_CACHE_CAPACITY);
    }

    #[test]
    fn pre_transform_moves_positions_only() {
        let heap = LinearHeap::new(HeapInit::default()).unwrap();
        let mut cache = StatesCache::new(&heap).unwrap();
        let src = [Vertex::with_color_tex_coords(
            Vec3::new(1.0, 2.0, 0.5),
            Color::RED,
            Vec2::new(4.0, 8.0),
        )];
        let t = Transform::IDENTITY.translate(Vec2::new(10.0, 20.0));

        cache.pre_transform(&src, &t);

        let out = cache.vertex_cache[0];
        assert_eq!(out.position, [11.0, 22.0, 0.5]);
        assert_eq!(out.color, src[0].color);
        assert_eq!(out.tex_coords, src[0].tex_coords);
        assert_eq!(out.normal, src[0].normal);
    }

    #[test]
    fn scratch_buffer_is_gpu_addressable() {
        let heap = LinearHeap::new(HeapInit::default()).unwrap();
        let cache = StatesCache::new(&heap).unwrap();
        assert!(cache.vertex_cache.physical_address().is_some());
    }
}
