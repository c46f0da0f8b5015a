use crate::device::{GpuBlend, GpuBlendEquation, GpuBlendFactor};

/// Blending factor applied to a source or destination component.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendFactor {
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

/// How weighted source and destination are combined.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendEquation {
    /// `src * src_factor + dst * dst_factor`
    Add,
    /// `src * src_factor - dst * dst_factor`
    Subtract,
}

/// Color and alpha blending configuration.
///
/// Two modes are the same mode only if all six fields match.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlendMode {
    pub color_src_factor: BlendFactor,
    pub color_dst_factor: BlendFactor,
    pub color_equation: BlendEquation,
    pub alpha_src_factor: BlendFactor,
    pub alpha_dst_factor: BlendFactor,
    pub alpha_equation: BlendEquation,
}

/// Blend source over destination using source alpha.
pub const BLEND_ALPHA: BlendMode = BlendMode::separate(
    BlendFactor::SrcAlpha,
    BlendFactor::OneMinusSrcAlpha,
    BlendEquation::Add,
    BlendFactor::One,
    BlendFactor::OneMinusSrcAlpha,
    BlendEquation::Add,
);

/// Add source to destination.
pub const BLEND_ADD: BlendMode = BlendMode::separate(
    BlendFactor::SrcAlpha,
    BlendFactor::One,
    BlendEquation::Add,
    BlendFactor::One,
    BlendFactor::One,
    BlendEquation::Add,
);

/// Multiply source and destination.
pub const BLEND_MULTIPLY: BlendMode =
    BlendMode::new(BlendFactor::DstColor, BlendFactor::Zero, BlendEquation::Add);

/// Overwrite destination with source.
pub const BLEND_NONE: BlendMode =
    BlendMode::new(BlendFactor::One, BlendFactor::Zero, BlendEquation::Add);

impl BlendMode {
    /// Same factors and equation for color and alpha.
    pub const fn new(src: BlendFactor, dst: BlendFactor, equation: BlendEquation) -> Self {
        Self::separate(src, dst, equation, src, dst, equation)
    }

    pub const fn separate(
        color_src_factor: BlendFactor,
        color_dst_factor: BlendFactor,
        color_equation: BlendEquation,
        alpha_src_factor: BlendFactor,
        alpha_dst_factor: BlendFactor,
        alpha_equation: BlendEquation,
    ) -> Self {
        Self {
            color_src_factor,
            color_dst_factor,
            color_equation,
            alpha_src_factor,
            alpha_dst_factor,
            alpha_equation,
        }
    }

    pub(crate) fn to_gpu(self) -> GpuBlend {
        GpuBlend {
            color_equation: self.color_equation.into(),
            alpha_equation: self.alpha_equation.into(),
            color_src: self.color_src_factor.into(),
            color_dst: self.color_dst_factor.into(),
            alpha_src: self.alpha_src_factor.into(),
            alpha_dst: self.alpha_dst_factor.into(),
        }
    }
}

impl Default for BlendMode {
    fn default() -> Self {
        BLEND_ALPHA
    }
}

impl From<BlendFactor> for GpuBlendFactor {
    fn from(f: BlendFactor) -> Self {
        match f {
            BlendFactor::Zero => GpuBlendFactor::Zero,
            BlendFactor::One => GpuBlendFactor::One,
            BlendFactor::SrcColor => GpuBlendFactor::SrcColor,
            BlendFactor::OneMinusSrcColor => GpuBlendFactor::OneMinusSrcColor,
            BlendFactor::DstColor => GpuBlendFactor::DstColor,
            BlendFactor::OneMinusDstColor => GpuBlendFactor::OneMinusDstColor,
            BlendFactor::SrcAlpha => GpuBlendFactor::SrcAlpha,
            BlendFactor::OneMinusSrcAlpha => GpuBlendFactor::OneMinusSrcAlpha,
            BlendFactor::DstAlpha => GpuBlendFactor::DstAlpha,
            BlendFactor::OneMinusDstAlpha => GpuBlendFactor::OneMinusDstAlpha,
        }
    }
}

impl From<BlendEquation> for GpuBlendEquation {
    fn from(e: BlendEquation) -> Self {
        match e {
            BlendEquation::Add => GpuBlendEquation::Add,
            BlendEquation::Subtract => GpuBlendEquation::Subtract,
        }
    }
}
