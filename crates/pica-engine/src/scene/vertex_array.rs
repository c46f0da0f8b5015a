use anyhow::{Context, Result};

use crate::coords::FloatRect;
use crate::memory::{AllocError, DeviceBuffer, LinearHeap};
use crate::render::{Drawable, PrimitiveType, RenderStates, RenderTarget, Vertex};

/// Raw vertices in the linear heap, drawn as one primitive batch.
#[derive(Debug)]
pub struct VertexArray {
    primitive: PrimitiveType,
    vertices: DeviceBuffer<Vertex>,
}

impl VertexArray {
    /// Creates an array of `count` default vertices.
    pub fn new(heap: &LinearHeap, primitive: PrimitiveType, count: usize) -> Result<Self> {
        let mut vertices = heap
            .alloc::<Vertex>(count)
            .with_context(|| format!("failed to allocate a vertex array of {count} vertices"))?;
        vertices.fill(Vertex::default());
        Ok(Self { primitive, vertices })
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive
    }

    pub fn set_primitive_type(&mut self, primitive: PrimitiveType) {
        self.primitive = primitive;
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn append(&mut self, vertex: Vertex) -> Result<(), AllocError> {
        self.vertices.push(vertex)
    }

    /// Removes every vertex. Keeps the reserved heap range.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Grows with default vertices or truncates.
    pub fn resize(&mut self, count: usize) -> Result<(), AllocError> {
        self.vertices.resize(count, Vertex::default())
    }

    /// Bounding rectangle of the vertex positions (x/y only).
    pub fn bounds(&self) -> FloatRect {
        FloatRect::bounding(self.vertices.iter().map(|v| v.position().xy()))
    }
}

impl Drawable for VertexArray {
    fn draw(&self, target: &mut RenderTarget, states: &RenderStates<'_>) {
        target.draw_vertices(&self.vertices, self.primitive, states);
    }
}
