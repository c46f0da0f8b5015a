use std::cell::Cell;

use crate::coords::Vec2;

use super::Transform;

/// Position, rotation, scale and origin of an object, composed into a
/// transform on demand.
///
/// The composed transform and its inverse are cached and recomputed only
/// after one of the components changes.
#[derive(Debug, Clone)]
pub struct Transformable {
    origin: Vec2,
    position: Vec2,
    rotation: f32,
    scale: Vec2,
    transform: Cell<Option<Transform>>,
    inverse: Cell<Option<Transform>>,
}

impl Default for Transformable {
    fn default() -> Self {
        Self {
            origin: Vec2::zero(),
            position: Vec2::zero(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            transform: Cell::new(None),
            inverse: Cell::new(None),
        }
    }
}

impl Transformable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Rotation in degrees, in [0, 360).
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.invalidate();
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees.rem_euclid(360.0);
        self.invalidate();
    }

    pub fn set_scale(&mut self, factors: Vec2) {
        self.scale = factors;
        self.invalidate();
    }

    /// Local point that `position`, rotation and scale are relative to.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
        self.invalidate();
    }

    pub fn move_by(&mut self, offset: Vec2) {
        self.set_position(self.position + offset);
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.set_rotation(self.rotation + degrees);
    }

    pub fn scale_by(&mut self, factors: Vec2) {
        self.set_scale(Vec2::new(self.scale.x * factors.x, self.scale.y * factors.y));
    }

    pub fn transform(&self) -> Transform {
        if let Some(t) = self.transform.get() {
            return t;
        }

        let (sin, cos) = (-self.rotation).to_radians().sin_cos();
        let sxc = self.scale.x * cos;
        let syc = self.scale.y * cos;
        let sxs = self.scale.x * sin;
        let sys = self.scale.y * sin;
        let tx = -self.origin.x * sxc - self.origin.y * sys + self.position.x;
        let ty = self.origin.x * sxs - self.origin.y * syc + self.position.y;

        #[rustfmt::skip]
        let t = Transform::from_2d(
             sxc, sys, tx,
            -sxs, syc, ty,
             0.0, 0.0, 1.0,
        );
        self.transform.set(Some(t));
        t
    }

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
