use crate::coords::IntRect;
use crate::transform::Transform;

/// Hardware blend factor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GpuBlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Hardware blend equation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GpuBlendEquation {
    Add,
    Subtract,
}

/// Full alpha-blend register configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GpuBlend {
    pub color_equation: GpuBlendEquation,
    pub alpha_equation: GpuBlendEquation,
    pub color_src: GpuBlendFactor,
    pub color_dst: GpuBlendFactor,
    pub alpha_src: GpuBlendFactor,
    pub alpha_dst: GpuBlendFactor,
}

/// Hardware primitive topology.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GpuPrimitive {
    Triangles,
    TriangleStrip,
    TriangleFan,
    /// Primitives assembled by a geometry shader.
    GeometryPrimitive,
}

/// Texture unit 0 configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureBinding {
    pub handle: u32,
    pub smooth: bool,
    pub repeated: bool,
}

/// Linked shader program on the device.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramHandle(pub u32);

/// Vertex buffer slot 0 configuration.
///
/// `permutation` lists which attribute each nibble of the buffer feeds,
/// lowest nibble first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexBinding {
    pub phys_addr: u32,
    pub stride: u32,
    pub attribute_count: u8,
    pub permutation: u64,
}

/// Everything a render target touches on the device.
///
/// Captured by `push_gl_states` and handed back to the device by
/// `pop_gl_states`.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuStateSnapshot {
    pub viewport: Option<IntRect>,
    pub projection: [f32; 16],
    pub modelview: [f32; 16],
    pub texture_matrix: [f32; 16],
    pub blend: Option<GpuBlend>,
    pub texture: Option<TextureBinding>,
    pub shader: Option<ProgramHandle>,
    pub vertex_buffer: Option<VertexBinding>,
}

impl Default for GpuStateSnapshot {
    fn default() -> Self {
        let identity = *Transform::IDENTITY.matrix();
        Self {
            viewport: None,
            projection: identity,
            modelview: identity,
            texture_matrix: identity,
            blend: None,
            texture: None,
            shader: None,
            vertex_buffer: None,
        }
    }
}

/// Command surface of the fixed-function GPU.
///
/// Implementations issue commands immediately; nothing is buffered on the
/// caller's side. Matrices are column-major.
pub trait Gpu {
    /// Makes this device's context current (`true`) or releases it.
    ///
    /// Must be cheap when the requested state is already in effect.
    /// Returns `false` when the context cannot be made current.
    fn activate(&mut self, active: bool) -> bool;

    /// Whether programmable shaders are supported at all.
    fn shaders_supported(&self) -> bool;

    /// Clears color (packed `0xRRGGBBAA`) and depth/stencil.
    fn clear(&mut self, color: u32, depth: u32);

    /// Viewport in hardware coordinates (bottom-left origin).
    fn set_viewport(&mut self, viewport: IntRect);

    fn set_projection(&mut self, matrix: &[f32; 16]);

    fn set_modelview(&mut self, matrix: &[f32; 16]);

    fn set_blend(&mut self, blend: GpuBlend);

    fn bind_texture(&mut self, texture: Option<TextureBinding>);

    fn set_texture_matrix(&mut self, matrix: &[f32; 16]);

    fn bind_shader(&mut self, program: Option<ProgramHandle>);

    fn set_vertex_buffer(&mut self, binding: VertexBinding);

    fn draw_arrays(&mut self, primitive: GpuPrimitive, first: u32, count: u32);

    /// Reads back the state listed in [`GpuStateSnapshot`].
    fn capture_state(&self) -> GpuStateSnapshot;

    /// Reprograms the device with a previously captured snapshot.
    fn restore_state(&mut self, snapshot: &GpuStateSnapshot);
}
