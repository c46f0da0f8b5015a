use std::cell::Cell;

use crate::coords::{FloatRect, Vec2};
use crate::transform::Transform;

/// 2D camera: which world rectangle is shown, and where on the target.
///
/// `viewport` is expressed as a fraction of the target, so `{0, 0, 1, 1}`
/// covers it entirely. The world-to-NDC transform and its inverse are
/// computed on first use and cached until center, size or rotation change.
#[derive(Debug, Clone)]
pub struct View {
    center: Vec2,
    size: Vec2,
    rotation: f32,
    viewport: FloatRect,
    transform: Cell<Option<Transform>>,
    inverse: Cell<Option<Transform>>,
}

impl View {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            rotation: 0.0,
            viewport: FloatRect::unit(),
            transform: Cell::new(None),
            inverse: Cell::new(None),
        }
    }

    /// View showing exactly `rect`.
    pub fn from_rect(rect: FloatRect) -> Self {
        Self::new(rect.center(), rect.size)
    }

    /// Shows `rect` again and drops any rotation. The viewport is kept.
    pub fn reset(&mut self, rect: FloatRect) {
        self.center = rect.center();
        self.size = rect.size;
        self.rotation = 0.0;
        self.invalidate();
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Rotation in degrees, in [0, 360).
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn viewport(&self) -> FloatRect {
        self.viewport
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
        self.invalidate();
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
        self.invalidate();
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees.rem_euclid(360.0);
        self.invalidate();
    }

    /// Viewport as a fraction of the target size.
    pub fn set_viewport(&mut self, viewport: FloatRect) {
        self.viewport = viewport;
    }

    pub fn move_by(&mut self, offset: Vec2) {
        self.set_center(self.center + offset);
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.set_rotation(self.rotation + degrees);
    }

    /// Scales the visible area. `factor > 1` zooms out.
    pub fn zoom(&mut self, factor: f32) {
        self.set_size(self.size * factor);
    }

    /// World to normalized device coordinates (`[-1, 1]`, +Y up).
    pub fn transform(&self) -> Transform {
        if let Some(t) = self.transform.get() {
            return t;
        }

        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let Vec2 { x: cx, y: cy } = self.center;
        let tx = -cx * cos - cy * sin + cx;
        let ty = cx * sin - cy * cos + cy;

        let a = 2.0 / self.size.x;
        let b = -2.0 / self.size.y;
        let c = -a * cx;
        let d = -b * cy;

        #[rustfmt::skip]
        let t = Transform::from_2d(
            a * cos,  a * sin, a * tx + c,
            -b * sin, b * cos, b * ty + d,
            0.0,      0.0,     1.0,
        );
        self.transform.set(Some(t));
        t
    }

    /// Normalized device coordinates to world.
    pub fn inverse_transform(&self) -> Transform {
        if let Some(t) = self.inverse.get() {
            return t;
        }
        let t = self.transform().inverse();
        self.inverse.set(Some(t));
        t
    }

    fn invalidate(&mut self) {
        self.transform.set(None);
        self.inverse.set(None);
    }
}

impl Default for View {
    fn default() -> Self {
        Self::from_rect(FloatRect::new(0.0, 0.0, 1000.0, 1000.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn corners_map_to_ndc_corners() {
        let v = View::from_rect(FloatRect::new(0.0, 0.0, 800.0, 600.0));
        let t = v.transform();
        assert!(close(t.transform_point2(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0)));
        assert!(close(t.transform_point2(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0)));
        assert!(close(t.transform_point2(Vec2::new(400.0, 300.0)), Vec2::zero()));
    }

    #[test]
    fn cached_transform_invalidated_by_zoom() {
        let mut v = View::from_rect(FloatRect::new(0.0, 0.0, 100.0, 100.0));
        let before = v.transform();
        v.zoom(2.0);
        assert_ne!(v.transform(), before);
        assert_eq!(v.size(), Vec2::new(200.0, 200.0));
    }

    #[test]
    fn inverse_recovers_world_point() {
        let mut v = View::new(Vec2::new(50.0, -20.0), Vec2::new(300.0, 200.0));
        v.rotate(33.0);
        let p = Vec2::new(12.0, 7.0);
        let ndc = v.transform().transform_point2(p);
        assert!(close(v.inverse_transform().transform_point2(ndc), p));
    }

    #[test]
    fn reset_keeps_viewport_and_clears_rotation() {
        let mut v = View::default();
        v.set_viewport(FloatRect::new(0.0, 0.0, 0.5, 1.0));
        v.set_rotation(45.0);
        v.reset(FloatRect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(v.rotation(), 0.0);
        assert_eq!(v.center(), Vec2::new(20.0, 20.0));
        assert_eq!(v.viewport(), FloatRect::new(0.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn negative_rotation_wraps() {
        let mut v = View::default();
        v.set_rotation(-30.0);
        assert_eq!(v.rotation(), 330.0);
    }
}
