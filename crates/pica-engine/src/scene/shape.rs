use std::rc::Rc;

use anyhow::{Context, Result};

use crate::coords::{FloatRect, IntRect, Vec2, Vec3};
use crate::memory::{DeviceBuffer, LinearHeap};
use crate::paint::Color;
use crate::render::{Drawable, PrimitiveType, RenderStates, RenderTarget, Vertex};
use crate::resource::Texture;
use crate::transform::{Transform, Transformable};

use super::Geometry;

/// Filled convex shape.
///
/// The outline is kept in the linear heap as a triangle fan: the center of
/// the bounding box, every outline point, then the first point again to
/// close the fan. Outlines with fewer than three points draw nothing.
///
/// Texture coordinates map the bounding box onto `texture_rect`, in texels.
#[derive(Debug)]
pub struct Shape {
    geometry: Geometry,
    transformable: Transformable,
    fill_color: Color,
    texture: Option<Rc<Texture>>,
    texture_rect: IntRect,
    vertices: DeviceBuffer<Vertex>,
    inside_bounds: FloatRect,
}

impl Shape {
    pub fn new(heap: &LinearHeap, geometry: Geometry) -> Result<Self> {
        let vertices = heap
            .alloc::<Vertex>(fan_len(geometry.point_count()))
            .context("failed to allocate shape vertices")?;

        let mut shape = Self {
            geometry,
            transformable: Transformable::new(),
            fill_color: Color::WHITE,
            texture: None,
            texture_rect: IntRect::default(),
            vertices,
            inside_bounds: FloatRect::default(),
        };
        shape.update()?;
        Ok(shape)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<()> {
        self.geometry = geometry;
        self.update()
    }

    pub fn point_count(&self) -> usize {
        self.geometry.point_count()
    }

    pub fn point(&self, index: usize) -> Option<Vec3> {
        self.geometry.point(index)
    }

    /// Changes the outline resolution. New convex points start at the origin.
    ///
    /// Fails for rectangles, which always have four corners.
    pub fn set_point_count(&mut self, count: usize) -> Result<()> {
        match &mut self.geometry {
            Geometry::Rectangle { .. } => {
                anyhow::bail!("a rectangle always has 4 points (requested {count})")
            }
            Geometry::Circle { point_count, .. } => *point_count = count,
            Geometry::Convex(points) => points.resize(count, Vec3::zero()),
        }
        self.update()
    }

    /// Moves one point of a convex outline.
    pub fn set_point(&mut self, index: usize, point: Vec3) -> Result<()> {
        let Geometry::Convex(points) = &mut self.geometry else {
            anyhow::bail!("only convex shapes have settable points");
        };
        let len = points.len();
        let slot = points
            .get_mut(index)
            .with_context(|| format!("point index {index} out of range for {len} points"))?;
        *slot = point;
        self.update()
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
        self.update_colors();
    }

    pub fn texture(&self) -> Option<&Rc<Texture>> {
        self.texture.as_ref()
    }

    /// Sets the texture. With `reset_rect`, or when no rect was set yet, the
    /// texture rect is reset to the full texture.
    pub fn set_texture(&mut self, texture: Option<Rc<Texture>>, reset_rect: bool) {
        if let Some(tex) = &texture {
            if reset_rect || (self.texture.is_none() && self.texture_rect == IntRect::default()) {
                let (w, h) = tex.size();
                self.set_texture_rect(IntRect::new(0, 0, w as i32, h as i32));
            }
        }
        self.texture = texture;
    }

    pub fn texture_rect(&self) -> IntRect {
        self.texture_rect
    }

    pub fn set_texture_rect(&mut self, rect: IntRect) {
        self.texture_rect = rect;
        self.update_tex_coords();
    }

    pub fn transformable(&self) -> &Transformable {
        &self.transformable
    }

    pub fn transformable_mut(&mut self) -> &mut Transformable {
        &mut self.transformable
    }

    pub fn transform(&self) -> Transform {
        self.transformable.transform()
    }

    /// Bounds in local coordinates.
    pub fn local_bounds(&self) -> FloatRect {
        self.inside_bounds
    }

    /// Bounds after the shape's own transform.
    pub fn global_bounds(&self) -> FloatRect {
        self.transform().transform_rect(self.local_bounds())
    }

    /// Fan vertices as they will be drawn.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Rebuilds the fan from the geometry.
    fn update(&mut self) -> Result<()> {
        let count = self.geometry.point_count();
        if count < 3 {
            self.vertices.clear();
            self.inside_bounds = FloatRect::default();
            return Ok(());
        }

        self.vertices
            .resize(fan_len(count), Vertex::default())
            .context("failed to grow shape vertices")?;

        for (i, p) in self.geometry.points().enumerate() {
            self.vertices[i + 1].position = p.to_array();
        }
        self.vertices[count + 1] = self.vertices[1];

        self.inside_bounds = FloatRect::bounding(self.geometry.points().map(Vec3::xy));
        let mean_z = self.geometry.points().map(|p| p.z).sum::<f32>() / count as f32;
        self.vertices[0].position = Vec3::from_xy(self.inside_bounds.center()).to_array();
        self.vertices[0].position[2] = mean_z;

        self.update_colors();
        self.update_tex_coords();
        Ok(())
    }

    fn update_colors(&mut self) {
        let color = self.fill_color.to_array();
        for v in self.vertices.iter_mut() {
            v.color = color;
        }
    }

    fn update_tex_coords(&mut self) {
        let bounds = self.inside_bounds;
        let rect = self.texture_rect;

        for v in self.vertices.iter_mut() {
            let ratio = Vec2::new(
                if bounds.size.x > 0.0 { (v.position[0] - bounds.origin.x) / bounds.size.x } else { 0.0 },
                if bounds.size.y > 0.0 { (v.position[1] - bounds.origin.y) / bounds.size.y } else { 0.0 },
            );
            v.tex_coords = [
                rect.left as f32 + rect.width as f32 * ratio.x,
                rect.top as f32 + rect.height as f32 * ratio.y,
            ];
        }
    }
}

impl Drawable for Shape {
    fn draw(&self, target: &mut RenderTarget, states: &RenderStates<'_>) {
        let mut states = *states;
        states.transform = states.transform * self.transform();
        states.texture = self.texture.as_deref();

        target.draw_vertices(&self.vertices, PrimitiveType::TriangleFan, &states);
    }
}

/// Center, outline, closing point.
fn fan_len(point_count: usize) -> usize {
    if point_count < 3 { 0 } else { point_count + 2 }
}

#[cfg(test)]
mod tests {
    use crate::device::{CommandRecorder, GpuCommand, GpuPrimitive};
    use crate::memory::HeapInit;
    use crate::render::TargetInit;

    use super::*;

    fn heap() -> LinearHeap {
        LinearHeap::new(HeapInit::default()).unwrap()
    }

    fn rect(heap: &LinearHeap) -> Shape {
        Shape::new(heap, Geometry::rectangle(Vec2::new(4.0, 2.0))).unwrap()
    }

    // ── fan layout ────────────────────────────────────────────────────────

    #[test]
    fn rectangle_fan_is_center_outline_and_closing_point() {
        let heap = heap();
        let shape = rect(&heap);
        let v = shape.vertices();

        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [2.0, 1.0, 0.0]);
        assert_eq!(v[1].position, [0.0, 0.0, 0.0]);
        assert_eq!(v[3].position, [4.0, 2.0, 0.0]);
        assert_eq!(v[5], v[1]);
    }

    #[test]
    fn circle_fan_has_point_count_plus_two() {
        let heap = heap();
        let mut shape = Shape::new(&heap, Geometry::circle(5.0)).unwrap();
        assert_eq!(shape.vertices().len(), 32);
        assert_eq!(shape.local_bounds().size.x.round(), 10.0);

        shape.set_point_count(8).unwrap();
        assert_eq!(shape.vertices().len(), 10);
    }

    #[test]
    fn degenerate_convex_draws_nothing() {
        let heap = heap();
        let gpu = CommandRecorder::default();
        let log = gpu.log();
        let mut target = RenderTarget::new(gpu, &heap, TargetInit::default()).unwrap();

        let shape = Shape::new(&heap, Geometry::Convex(vec![Vec3::zero(), Vec3::new(1.0, 0.0, 0.0)])).unwrap();
        assert!(shape.vertices().is_empty());

        target.draw(&shape, &RenderStates::default());
        assert!(log.is_empty());
    }

    // ── convex editing ────────────────────────────────────────────────────

    #[test]
    fn convex_points_are_editable() {
        let heap = heap();
        let mut shape = Shape::new(&heap, Geometry::Convex(Vec::new())).unwrap();
        shape.set_point_count(3).unwrap();
        shape.set_point(1, Vec3::new(6.0, 0.0, 0.0)).unwrap();
        shape.set_point(2, Vec3::new(0.0, 3.0, 0.0)).unwrap();

        assert_eq!(shape.point(1), Some(Vec3::new(6.0, 0.0, 0.0)));
        assert_eq!(shape.local_bounds(), FloatRect::new(0.0, 0.0, 6.0, 3.0));
        assert_eq!(shape.vertices().len(), 5);
    }

    #[test]
    fn invalid_edits_are_errors() {
        let heap = heap();
        let mut r = rect(&heap);
        assert!(r.set_point_count(5).is_err());
        assert!(r.set_point(0, Vec3::zero()).is_err());

        let mut c = Shape::new(&heap, Geometry::Convex(vec![Vec3::zero(); 3])).unwrap();
        assert!(c.set_point(3, Vec3::zero()).is_err());
    }

    // ── color / texture ───────────────────────────────────────────────────

    #[test]
    fn fill_color_reaches_every_vertex() {
        let heap = heap();
        let mut shape = rect(&heap);
        shape.set_fill_color(Color::BLUE);
        assert!(shape.vertices().iter().all(|v| v.color == Color::BLUE.to_array()));
    }

    #[test]
    fn texture_rect_spans_bounds() {
        let heap = heap();
        let mut shape = rect(&heap);
        shape.set_texture(Some(Rc::new(Texture::new(3, 64, 32))), false);

        assert_eq!(shape.texture_rect(), IntRect::new(0, 0, 64, 32));
        let v = shape.vertices();
        assert_eq!(v[1].tex_coords, [0.0, 0.0]);
        assert_eq!(v[3].tex_coords, [64.0, 32.0]);
        assert_eq!(v[0].tex_coords, [32.0, 16.0]);
    }

    #[test]
    fn explicit_texture_rect_survives_texture_swap() {
        let heap = heap();
        let mut shape = rect(&heap);
        shape.set_texture(Some(Rc::new(Texture::new(1, 64, 64))), false);
        shape.set_texture_rect(IntRect::new(8, 8, 16, 16));
        shape.set_texture(Some(Rc::new(Texture::new(2, 128, 128))), false);
        assert_eq!(shape.texture_rect(), IntRect::new(8, 8, 16, 16));
    }

    // ── bounds / drawing ──────────────────────────────────────────────────

    #[test]
    fn global_bounds_follow_position() {
        let heap = heap();
        let mut shape = rect(&heap);
        shape.transformable_mut().set_position(Vec2::new(10.0, 20.0));
        assert_eq!(shape.global_bounds(), FloatRect::new(10.0, 20.0, 4.0, 2.0));
    }

    #[test]
    fn draw_combines_transform_and_binds_texture() {
        let heap = heap();
        let gpu = CommandRecorder::default();
        let log = gpu.log();
        let mut target = RenderTarget::new(gpu, &heap, TargetInit::default()).unwrap();

        let mut shape = rect(&heap);
        shape.set_texture(Some(Rc::new(Texture::new(11, 16, 16))), true);
        shape.transformable_mut().set_position(Vec2::new(10.0, 0.0));
        let states = RenderStates::default().with_transform(Transform::IDENTITY.translate(Vec2::new(0.0, 5.0)));

        target.draw(&shape, &states);

        assert_eq!(target.vertex_cache()[1].position, [10.0, 5.0, 0.0]);
        let cmds = log.take();
        assert!(cmds.iter().any(|c| matches!(c, GpuCommand::BindTexture(Some(b)) if b.handle == 11)));
        assert_eq!(
            cmds.last(),
            Some(&GpuCommand::DrawArrays { primitive: GpuPrimitive::TriangleFan, first: 0, count: 6 })
        );
    }
}
