use anyhow::{Context, Result};

use crate::coords::{FloatRect, IntRect, Vec2, Vec2i};
use crate::device::{Gpu, GpuStateSnapshot};
use crate::memory::{DeviceSlice, LinearHeap};
use crate::paint::Color;
use crate::resource::{CoordinateType, Shader, Texture};
use crate::transform::Transform;

use super::cache::{StatesCache, VERTEX_CACHE_CAPACITY};
use super::{BlendMode, Drawable, PrimitiveType, RenderStates, Vertex, View, BLEND_ALPHA};

/// Render target parameters.
#[derive(Debug, Clone)]
pub struct TargetInit {
    /// Target size in pixels.
    pub width: u32,
    pub height: u32,
}

impl Default for TargetInit {
    /// The top screen.
    fn default() -> Self {
        Self { width: 400, height: 240 }
    }
}

/// Surface that vertices are drawn onto, plus the device state cache that
/// keeps redundant state changes off the command stream.
///
/// Caching strategies per state:
/// - view: re-applied only after `set_view` or a reset.
/// - transform: draws of up to [`VERTEX_CACHE_CAPACITY`] vertices are
///   transformed on the CPU and rendered with an identity modelview, which
///   then stays bound across consecutive small draws. Larger draws upload
///   their own transform.
/// - blend mode: applied when any of its six fields differs.
/// - texture: compared by `Texture::cache_id`; hardware handles get recycled.
/// - shader: uniforms are not tracked, so a shader is bound on every draw
///   that uses one and unbound right after.
pub struct RenderTarget {
    gpu: Box<dyn Gpu>,
    size: (u32, u32),
    default_view: View,
    view: View,
    cache: StatesCache,
    /// One entry per `push_gl_states`; `None` when capture failed.
    saved_states: Vec<Option<GpuStateSnapshot>>,
    warned_inaccessible: bool,
    /// Keeps the scratch buffer resident.
    _heap: LinearHeap,
}

impl RenderTarget {
    /// Creates a target drawing through `gpu`.
    ///
    /// The scratch vertex buffer is allocated from `heap`. No device state is
    /// touched until the first draw.
    pub fn new(gpu: impl Gpu + 'static, heap: &LinearHeap, init: TargetInit) -> Result<Self> {
        anyhow::ensure!(
            init.width > 0 && init.height > 0,
            "render target has zero size ({}x{})",
            init.width,
            init.height
        );

        let cache = StatesCache::new(heap).context("failed to allocate the vertex cache")?;

        let mut target = Self {
            gpu: Box::new(gpu),
            size: (init.width, init.height),
            default_view: View::default(),
            view: View::default(),
            cache,
            saved_states: Vec::new(),
            warned_inaccessible: false,
            _heap: heap.clone(),
        };
        target.initialize();
        Ok(target)
    }

    /// Size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// The device this target draws through.
    ///
    /// Commands issued directly should be bracketed by
    /// [`push_gl_states`](Self::push_gl_states) / [`pop_gl_states`](Self::pop_gl_states).
    pub fn gpu(&self) -> &dyn Gpu {
        self.gpu.as_ref()
    }

    pub fn gpu_mut(&mut self) -> &mut dyn Gpu {
        self.gpu.as_mut()
    }

    /// Makes the device context current for this target.
    pub fn activate(&mut self, active: bool) -> bool {
        self.gpu.activate(active)
    }

    /// Pre-transformed copy of the last small draw. Entries past that draw's
    /// vertex count are stale.
    pub fn vertex_cache(&self) -> &[Vertex] {
        &self.cache.vertex_cache
    }

    /// Clears the whole target. Depth and stencil are reset to 0.
    pub fn clear(&mut self, color: Color) {
        if self.gpu.activate(true) {
            self.gpu.clear(color.to_rgba8888(), 0);
        }
    }

    /// Replaces the current view. Takes effect at the next draw.
    pub fn set_view(&mut self, view: &View) {
        self.view = view.clone();
        self.cache.view_changed = true;
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// View covering the whole target in pixel units.
    pub fn default_view(&self) -> &View {
        &self.default_view
    }

    /// Pixel rectangle covered by `view` on this target.
    pub fn viewport(&self, view: &View) -> IntRect {
        let width = self.size.0 as f32;
        let height = self.size.1 as f32;
        let vp = view.viewport();

        IntRect::new(
            (0.5 + width * vp.origin.x) as i32,
            (0.5 + height * vp.origin.y) as i32,
            (0.5 + width * vp.size.x) as i32,
            (0.5 + height * vp.size.y) as i32,
        )
    }

    /// Converts a pixel position to world coordinates using the current view.
    pub fn map_pixel_to_coords(&self, point: Vec2i) -> Vec2 {
        self.map_pixel_to_coords_with(point, &self.view)
    }

    pub fn map_pixel_to_coords_with(&self, point: Vec2i, view: &View) -> Vec2 {
        let vp = self.viewport(view);
        let normalized = Vec2::new(
            -1.0 + 2.0 * (point.x as f32 - vp.left as f32) / vp.width as f32,
            1.0 - 2.0 * (point.y as f32 - vp.top as f32) / vp.height as f32,
        );
        view.inverse_transform().transform_point2(normalized)
    }

    /// Converts world coordinates to the nearest pixel using the current view.
    pub fn map_coords_to_pixel(&self, point: Vec2) -> Vec2i {
        self.map_coords_to_pixel_with(point, &self.view)
    }

    pub fn map_coords_to_pixel_with(&self, point: Vec2, view: &View) -> Vec2i {
        let normalized = view.transform().transform_point2(point);
        let vp = self.viewport(view);
        let x = (normalized.x + 1.0) / 2.0 * vp.width as f32 + vp.left as f32;
        let y = (-normalized.y + 1.0) / 2.0 * vp.height as f32 + vp.top as f32;
        Vec2i::new((x + 0.5).floor() as i32, (y + 0.5).floor() as i32)
    }

    pub fn draw<D: Drawable + ?Sized>(&mut self, drawable: &D, states: &RenderStates<'_>) {
        drawable.draw(self, states);
    }

    /// Draws vertices straight from the linear heap.
    ///
    /// Empty input draws nothing. Vertices that are not GPU-addressable are
    /// reported and skipped, as is the whole call when the context cannot be
    /// activated.
    pub fn draw_vertices<'v>(
        &mut self,
        vertices: impl Into<DeviceSlice<'v, Vertex>>,
        primitive: PrimitiveType,
        states: &RenderStates<'_>,
    ) {
        let vertices = vertices.into();
        if vertices.is_empty() {
            return;
        }

        let Some(source_addr) = vertices.physical_address() else {
            if !self.warned_inaccessible {
                log::error!(
                    "draw_vertices called with {} vertices outside the linear heap; draw skipped",
                    vertices.len()
                );
                self.warned_inaccessible = true;
            } else {
                log::debug!("draw skipped: vertices outside the linear heap");
            }
            return;
        };

        let Ok(count) = u32::try_from(vertices.len()) else {
            log::error!("draw_vertices called with {} vertices; draw skipped", vertices.len());
            return;
        };

        let Some(cache_addr) = self.cache.vertex_cache.physical_address() else {
            log::error!("vertex cache lost its linear heap; draw skipped");
            return;
        };

        if !self.gpu.activate(true) {
            log::debug!("render target activation failed; draw skipped");
            return;
        }

        if !self.cache.gl_states_set {
            self.reset_gl_states();
        }

        let use_vertex_cache = vertices.len() <= VERTEX_CACHE_CAPACITY;
        if use_vertex_cache {
            self.cache.pre_transform(vertices.data(), &states.transform);

            // Pre-transformed vertices render with identity.
            if !self.cache.identity_bound {
                self.apply_transform(&Transform::IDENTITY);
            }
        } else {
            self.apply_transform(&states.transform);
        }

        if self.cache.view_changed {
            self.apply_current_view();
        }

        if states.blend_mode != self.cache.last_blend_mode {
            self.apply_blend_mode(states.blend_mode);
        }

        let texture_id = states.texture.map_or(0, Texture::cache_id);
        if texture_id != self.cache.last_texture_id {
            self.apply_texture(states.texture);
        }

        if let Some(shader) = states.shader {
            self.apply_shader(Some(shader));
        }

        // The scratch buffer binding survives between consecutive cached draws.
        let binding_addr = match (use_vertex_cache, self.cache.use_vertex_cache) {
            (true, true) => None,
            (true, false) => Some(cache_addr),
            (false, _) => Some(source_addr),
        };
        if let Some(addr) = binding_addr {
            self.gpu.set_vertex_buffer(Vertex::binding(addr));
        }

        self.gpu.draw_arrays(primitive.into(), 0, count);

        if states.shader.is_some() {
            self.apply_shader(None);
        }

        self.cache.use_vertex_cache = use_vertex_cache;
    }

    /// Saves the device state and switches to the library defaults.
    ///
    /// Use around direct `gpu_mut()` work so the two don't clobber each
    /// other. Every push needs a matching [`pop_gl_states`](Self::pop_gl_states).
    pub fn push_gl_states(&mut self) {
        let saved = if self.gpu.activate(true) {
            Some(self.gpu.capture_state())
        } else {
            log::debug!("push_gl_states: activation failed; nothing captured");
            None
        };
        self.saved_states.push(saved);

        self.reset_gl_states();
    }

    /// Restores the device state captured by the matching
    /// [`push_gl_states`](Self::push_gl_states).
    ///
    /// The cache is invalidated, so the next draw starts with a full reset.
    pub fn pop_gl_states(&mut self) {
        let Some(saved) = self.saved_states.pop() else {
            log::warn!("pop_gl_states called without a matching push_gl_states");
            return;
        };

        if self.gpu.activate(true) {
            if let Some(snapshot) = saved {
                self.gpu.restore_state(&snapshot);
            }
        } else {
            log::debug!("pop_gl_states: activation failed; device state not restored");
        }

        self.cache.gl_states_set = false;
    }

    /// Applies every cached state unconditionally.
    ///
    /// Safe to call at any time, e.g. after the device was driven directly.
    pub fn reset_gl_states(&mut self) {
        let shader_available = match self.cache.shader_available {
            Some(available) => available,
            None => {
                let available = Shader::is_available(self.gpu.as_ref());
                if !available {
                    log::info!("shaders are not supported; shader states will be ignored");
                }
                self.cache.shader_available = Some(available);
                available
            }
        };

        if !self.gpu.activate(true) {
            log::debug!("reset_gl_states: activation failed");
            return;
        }

        self.cache.gl_states_set = true;

        self.apply_blend_mode(BLEND_ALPHA);
        self.apply_transform(&Transform::IDENTITY);
        self.apply_texture(None);
        if shader_available {
            self.apply_shader(None);
        }

        self.cache.use_vertex_cache = false;

        // Re-apply the view on the next draw.
        self.cache.view_changed = true;
    }

    /// Resets views to cover the target and forgets the device state.
    fn initialize(&mut self) {
        let (w, h) = self.size;
        self.default_view.reset(FloatRect::new(0.0, 0.0, w as f32, h as f32));
        self.view = self.default_view.clone();

        // Nothing is applied before the first draw, so a target that is
        // never drawn to leaves the device alone.
        self.cache.gl_states_set = false;
    }

    fn apply_current_view(&mut self) {
        let vp = self.viewport(&self.view);

        // Hardware viewports have a bottom-left origin.
        let bottom = self.size.1 as i32 - (vp.top + vp.height);
        self.gpu.set_viewport(IntRect::new(vp.left, bottom, vp.width, vp.height));
        self.gpu.set_projection(self.view.transform().matrix());

        self.cache.view_changed = false;
    }

    fn apply_blend_mode(&mut self, mode: BlendMode) {
        self.gpu.set_blend(mode.to_gpu());
        self.cache.last_blend_mode = mode;
    }

    fn apply_transform(&mut self, transform: &Transform) {
        self.gpu.set_modelview(transform.matrix());
        self.cache.identity_bound = transform.is_identity();
    }

    fn apply_texture(&mut self, texture: Option<&Texture>) {
        Texture::bind(self.gpu.as_mut(), texture, CoordinateType::Pixels);
        self.cache.last_texture_id = texture.map_or(0, Texture::cache_id);
    }

    fn apply_shader(&mut self, shader: Option<&Shader>) {
        Shader::bind(self.gpu.as_mut(), shader);
    }
}
