use std::f32::consts::PI;

use crate::coords::{Vec2, Vec3};

/// Point count used by [`Geometry::circle`].
pub const DEFAULT_CIRCLE_POINTS: usize = 30;

/// Outline of a [`Shape`](super::Shape), in local coordinates.
///
/// Points run around the outline; the shape fills the convex polygon they
/// describe.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Axis-aligned rectangle with its top-left corner at the local origin.
    Rectangle { size: Vec2 },
    /// Regular polygon approximating a circle. Its bounding box starts at
    /// the local origin.
    Circle { radius: f32, point_count: usize },
    /// Arbitrary convex polygon.
    Convex(Vec<Vec3>),
}

impl Geometry {
    pub fn rectangle(size: Vec2) -> Self {
        Geometry::Rectangle { size }
    }

    pub fn circle(radius: f32) -> Self {
        Geometry::Circle { radius, point_count: DEFAULT_CIRCLE_POINTS }
    }

    pub fn point_count(&self) -> usize {
        match self {
            Geometry::Rectangle { .. } => 4,
            Geometry::Circle { point_count, .. } => *point_count,
            Geometry::Convex(points) => points.len(),
        }
    }

    /// Outline point `index`, or `None` past the end.
    pub fn point(&self, index: usize) -> Option<Vec3> {
        if index >= self.point_count() {
            return None;
        }

        let p = match self {
            Geometry::Rectangle { size } => match index {
                0 => Vec3::new(0.0, 0.0, 0.0),
                1 => Vec3::new(size.x, 0.0, 0.0),
                2 => Vec3::new(size.x, size.y, 0.0),
                _ => Vec3::new(0.0, size.y, 0.0),
            },
            Geometry::Circle { radius, point_count } => {
                // First point at the top, then clockwise on screen.
                let angle = index as f32 * 2.0 * PI / *point_count as f32 - PI / 2.0;
                Vec3::new(radius + angle.cos() * radius, radius + angle.sin() * radius, 0.0)
            }
            Geometry::Convex(points) => points[index],
        };
        Some(p)
    }

    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.point_count()).filter_map(|i| self.point(i))
    }
}
