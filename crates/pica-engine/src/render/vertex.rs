use bytemuck::{Pod, Zeroable};

use crate::coords::{Vec2, Vec3};
use crate::device::VertexBinding;
use crate::paint::Color;

/// Point with color, texture coordinates and normal.
///
/// The layout is fixed: the GPU reads these records directly from the
/// linear heap.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [u8; 4],
    /// In texels (see `CoordinateType::Pixels`).
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Attributes fed to the vertex shader: position, color, tex coords.
    /// The normal is carried along but not bound.
    pub const ATTRIBUTE_COUNT: u8 = 3;

    /// Attribute order within the record, one nibble per attribute.
    pub const PERMUTATION: u64 = 0x210;

    pub const STRIDE: u32 = size_of::<Vertex>() as u32;

    #[inline]
    pub fn new(position: Vec3) -> Self {
        Self::with_all(position, Color::WHITE, Vec2::zero(), Vec3::new(0.0, 0.0, 1.0))
    }

    #[inline]
    pub fn with_color(position: Vec3, color: Color) -> Self {
        Self::with_all(position, color, Vec2::zero(), Vec3::new(0.0, 0.0, 1.0))
    }

    #[inline]
    pub fn with_tex_coords(position: Vec3, tex_coords: Vec2) -> Self {
        Self::with_all(position, Color::WHITE, tex_coords, Vec3::new(0.0, 0.0, 1.0))
    }

    #[inline]
    pub fn with_color_tex_coords(position: Vec3, color: Color, tex_coords: Vec2) -> Self {
        Self::with_all(position, color, tex_coords, Vec3::new(0.0, 0.0, 1.0))
    }

    #[inline]
    pub fn with_all(position: Vec3, color: Color, tex_coords: Vec2, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            tex_coords: [tex_coords.x, tex_coords.y],
            normal: normal.to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Buffer binding for an array of vertices starting at `phys_addr`.
    pub(crate) fn binding(phys_addr: u32) -> VertexBinding {
        VertexBinding {
            phys_addr,
            stride: Self::STRIDE,
            attribute_count: Self::ATTRIBUTE_COUNT,
            permutation: Self::PERMUTATION,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Vec3::zero())
    }
}

#[cfg(test)]
mod tests {
    use core::mem::offset_of;

    use super::*;

    #[test]
    fn layout_is_packed() {
        assert_eq!(Vertex::STRIDE, 36);
        assert_eq!(offset_of!(Vertex, color), 12);
        assert_eq!(offset_of!(Vertex, tex_coords), 16);
        assert_eq!(offset_of!(Vertex, normal), 24);
    }

    #[test]
    fn default_is_white_facing_viewer() {
        let v = Vertex::default();
        assert_eq!(v.color, [255, 255, 255, 255]);
        assert_eq!(v.normal, [0.0, 0.0, 1.0]);
    }
}
