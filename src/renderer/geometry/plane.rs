//! Plane in equation form

use glam::{Vec3, Vec4};

/// A plane in 3D space defined by the equation ax + by + cz + d = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal vector (a, b, c) - not necessarily normalized.
    pub normal: Vec3,
    /// Distance term (d).
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from normal and distance.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Horizontal floor at `height`: (0, 1, 0, -height).
    pub fn horizontal(height: f32) -> Self {
        Self::new(Vec3::Y, -height)
    }

    /// Coefficients (a, b, c, d).
    pub fn to_vec4(&self) -> Vec4 {
        self.normal.extend(self.distance)
    }

    /// Normalize the plane equation.
    pub fn normalize(&self) -> Self {
        let len = self.normal.length();
        if len > 0.0 {
            Self {
                normal: self.normal / len,
                distance: self.distance / len,
            }
        } else {
            *self
        }
    }

    /// Get the signed distance from a point to the plane.
    /// Positive = in front (same side as normal), Negative = behind.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Orthogonal projection of `point` onto the plane.
    pub fn project_point(&self, point: Vec3) -> Vec3 {
        let plane = self.normalize();
        point - plane.normal * plane.signed_distance(point)
    }
}
