//! Geometry abstractions
//!
//! Provides CPU meshes, primitive generators, bounds and planes.

mod mesh;
mod plane;

pub use mesh::{Mesh, Vertex};
pub use plane::Plane;

use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from a set of points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for p in points {
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }

    /// Get the center of the AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the AABB.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Radius of the sphere enclosing the box, centered at [`Aabb::center`].
    pub fn bounding_radius(&self) -> f32 {
        self.size().length() * 0.5
    }

    /// Get all 8 corners of the AABB.
    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Bounds of this box after an affine transform.
    pub fn transformed(&self, transform: Mat4) -> Self {
        Self::from_points(
            self.corners()
                .into_iter()
                .map(|c| transform.transform_point3(c)),
        )
    }

    /// Check if a point is inside the AABB.
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Merge two AABBs.
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

/// Trait for indexed triangle geometry that can be rasterized.
pub trait Geometry {
    /// Get the vertices.
    fn vertices(&self) -> &[Vertex];

    /// Get the triangle list indices.
    fn indices(&self) -> &[u32];

    /// Get the axis-aligned bounding box in object space.
    fn aabb(&self) -> Aabb;

    /// Iterate over triangles as vertex triples.
    fn triangles(&self) -> Box<dyn Iterator<Item = [Vertex; 3]> + '_> {
        let vertices = self.vertices();
        Box::new(self.indices().chunks_exact(3).map(move |tri| {
            [
                vertices[tri[0] as usize],
                vertices[tri[1] as usize],
                vertices[tri[2] as usize],
            ]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points([
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(3.0, -2.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ]);
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_aabb_transformed() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let moved = aabb.transformed(Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(moved.min, Vec3::new(-1.0, 1.0, -1.0));
        assert_eq!(moved.max, Vec3::new(1.0, 3.0, 1.0));
        assert!(moved.contains(Vec3::new(0.0, 2.5, 0.0)));
        assert!(!moved.contains(Vec3::ZERO - Vec3::Y));
    }

    #[test]
    fn test_aabb_bounding_radius() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!((aabb.bounding_radius() - 3.0f32.sqrt()).abs() < 1e-6);
    }
}
