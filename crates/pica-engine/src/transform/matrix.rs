use core::ops::{Mul, MulAssign};

use crate::coords::{FloatRect, Vec2, Vec3};

/// Affine transform stored as a 4x4 column-major matrix.
///
/// 2D transforms occupy the x/y rows and columns plus the translation column;
/// z passes through untouched unless a full 3D matrix is supplied. The layout
/// is what the projection and modelview uniforms take, so the matrix can be
/// uploaded without conversion.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    m: [f32; 16],
}

impl Transform {
    #[rustfmt::skip]
    pub const IDENTITY: Transform = Transform {
        m: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Builds a transform from a row-major 3x3 2D matrix.
    #[rustfmt::skip]
    #[allow(clippy::too_many_arguments)]
    pub const fn from_2d(
        a00: f32, a01: f32, a02: f32,
        a10: f32, a11: f32, a12: f32,
        a20: f32, a21: f32, a22: f32,
    ) -> Self {
        Self {
            m: [
                a00, a10, 0.0, a20,
                a01, a11, 0.0, a21,
                0.0, 0.0, 1.0, 0.0,
                a02, a12, 0.0, a22,
            ],
        }
    }

    /// Wraps a column-major 4x4 matrix.
    #[inline]
    pub const fn from_matrix(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Column-major 4x4 matrix.
    #[inline]
    pub const fn matrix(&self) -> &[f32; 16] {
        &self.m
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Returns the inverse, or identity when the matrix is singular.
    pub fn inverse(&self) -> Transform {
        let m = &self.m;
        let mut inv = [0.0f32; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14] + m[13] * m[6] * m[11] - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14] - m[12] * m[6] * m[11] + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13] + m[12] * m[5] * m[11] - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13] - m[12] * m[5] * m[10] + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14] - m[13] * m[2] * m[11] + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14] + m[12] * m[2] * m[11] - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13] - m[12] * m[1] * m[11] + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13] + m[12] * m[1] * m[10] - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14] + m[13] * m[2] * m[7] - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14] - m[12] * m[2] * m[7] + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13] + m[12] * m[1] * m[7] - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13] - m[12] * m[1] * m[6] + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10] - m[9] * m[2] * m[7] + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10] + m[8] * m[2] * m[7] - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9] - m[8] * m[1] * m[7] + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9] + m[8] * m[1] * m[6] - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det == 0.0 {
            return Transform::IDENTITY;
        }

        let inv_det = 1.0 / det;
        for v in &mut inv {
            *v *= inv_det;
        }
        Transform { m: inv }
    }

    /// Maps a 3D point (w = 1). The projective row is ignored.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0] * p.x + m[4] * p.y + m[8] * p.z + m[12],
            m[1] * p.x + m[5] * p.y + m[9] * p.z + m[13],
            m[2] * p.x + m[6] * p.y + m[10] * p.z + m[14],
        )
    }

    /// Maps a 2D point on the z = 0 plane.
    #[inline]
    pub fn transform_point2(&self, p: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(
            m[0] * p.x + m[4] * p.y + m[12],
            m[1] * p.x + m[5] * p.y + m[13],
        )
    }

    /// Axis-aligned bounding box of the transformed rectangle.
    pub fn transform_rect(&self, r: FloatRect) -> FloatRect {
        let FloatRect { origin: o, size: s } = r;
        FloatRect::bounding([
            self.transform_point2(o),
            self.transform_point2(Vec2::new(o.x, o.y + s.y)),
            self.transform_point2(Vec2::new(o.x + s.x, o.y)),
            self.transform_point2(Vec2::new(o.x + s.x, o.y + s.y)),
        ])
    }

    /// Returns `self * other`: `other` is applied to points first.
    pub fn combine(&self, other: &Transform) -> Transform {
        let a = &self.m;
        let b = &other.m;
        let mut out = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum();
            }
        }
        Transform { m: out }
    }

    #[rustfmt::skip]
    pub fn translate(self, offset: Vec2) -> Transform {
        self * Transform::from_2d(
            1.0, 0.0, offset.x,
            0.0, 1.0, offset.y,
            0.0, 0.0, 1.0,
        )
    }

    /// Rotates by `degrees` around the local origin.
    #[rustfmt::skip]
    pub fn rotate(self, degrees: f32) -> Transform {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self * Transform::from_2d(
            cos, -sin, 0.0,
            sin,  cos, 0.0,
            0.0,  0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotate_around(self, degrees: f32, center: Vec2) -> Transform {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self * Transform::from_2d(
            cos, -sin, center.x * (1.0 - cos) + center.y * sin,
            sin,  cos, center.y * (1.0 - cos) - center.x * sin,
            0.0,  0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn scale(self, factors: Vec2) -> Transform {
        self * Transform::from_2d(
            factors.x, 0.0,       0.0,
            0.0,       factors.y, 0.0,
            0.0,       0.0,       1.0,
        )
    }

    #[rustfmt::skip]
    pub fn scale_around(self, factors: Vec2, center: Vec2) -> Transform {
        self * Transform::from_2d(
            factors.x, 0.0,       center.x * (1.0 - factors.x),
            0.0,       factors.y, center.y * (1.0 - factors.y),
            0.0,       0.0,       1.0,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;
    #[inline]
    fn mul(self, rhs: Transform) -> Transform {
        self.combine(&rhs)
    }
}

impl MulAssign for Transform {
    #[inline]
    fn mul_assign(&mut self, rhs: Transform) {
        *self = self.combine(&rhs);
    }
}

impl Mul<Vec3> for Transform {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform_point(rhs)
    }
}

impl Mul<Vec2> for Transform {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        self.transform_point2(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn identity_leaves_points_alone() {
        let p = Vec3::new(1.5, -2.0, 3.0);
        assert_eq!(Transform::IDENTITY.transform_point(p), p);
    }

    #[test]
    fn translate_then_scale_applies_right_to_left() {
        // Scale is applied to the point first, then translation.
        let t = Transform::IDENTITY
            .translate(Vec2::new(10.0, 20.0))
            .scale(Vec2::new(2.0, 3.0));
        assert_eq!(t.transform_point2(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 23.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let t = Transform::IDENTITY.rotate(90.0);
        assert!(close(t.transform_point2(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn rotate_around_keeps_center_fixed() {
        let c = Vec2::new(5.0, 5.0);
        let t = Transform::IDENTITY.rotate_around(37.0, c);
        assert!(close(t.transform_point2(c), c));
    }

    #[test]
    fn inverse_undoes_transform() {
        let t = Transform::IDENTITY
            .translate(Vec2::new(-3.0, 7.0))
            .rotate(30.0)
            .scale(Vec2::new(2.0, 0.5));
        let p = Vec2::new(4.0, -9.0);
        assert!(close(t.inverse().transform_point2(t.transform_point2(p)), p));
    }

    #[test]
    fn singular_inverse_is_identity() {
        let t = Transform::IDENTITY.scale(Vec2::new(0.0, 1.0));
        assert_eq!(t.inverse(), Transform::IDENTITY);
    }

    #[test]
    fn transform_rect_bounds_rotated_rect() {
        let t = Transform::IDENTITY.rotate(90.0);
        let b = t.transform_rect(FloatRect::new(0.0, 0.0, 2.0, 1.0));
        assert!(close(b.origin, Vec2::new(-1.0, 0.0)));
        assert!(close(b.size, Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn z_passes_through_2d_transform() {
        let t = Transform::IDENTITY.translate(Vec2::new(1.0, 1.0));
        assert_eq!(t.transform_point(Vec3::new(0.0, 0.0, 4.0)).z, 4.0);
    }
}
