use crate::device::GpuPrimitive;

/// How vertices are assembled into primitives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum PrimitiveType {
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
    /// Assembled by the bound geometry shader.
    Geometry,
}

impl PrimitiveType {
    pub const COUNT: usize = 4;
}

/// Hardware topology per `PrimitiveType`, indexed by ordinal.
///
/// Keep in step with `PrimitiveType`; the array length ties them together.
const PRIMITIVE_MODES: [GpuPrimitive; PrimitiveType::COUNT] = [
    GpuPrimitive::Triangles,
    GpuPrimitive::TriangleStrip,
    GpuPrimitive::TriangleFan,
    GpuPrimitive::GeometryPrimitive,
];

impl From<PrimitiveType> for GpuPrimitive {
    #[inline]
    fn from(p: PrimitiveType) -> Self {
        PRIMITIVE_MODES[p as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_ordinals() {
        assert_eq!(GpuPrimitive::from(PrimitiveType::Triangles), GpuPrimitive::Triangles);
        assert_eq!(GpuPrimitive::from(PrimitiveType::TriangleStrip), GpuPrimitive::TriangleStrip);
        assert_eq!(GpuPrimitive::from(PrimitiveType::TriangleFan), GpuPrimitive::TriangleFan);
        assert_eq!(GpuPrimitive::from(PrimitiveType::Geometry), GpuPrimitive::GeometryPrimitive);
    }
}
