//! Mesh geometry
//!
//! Provides an indexed triangle mesh and primitive generators. All primitives
//! wind counter-clockwise when seen from outside.

use super::{Aabb, Geometry};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::PI;

/// Vertex with position, normal and UV.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// Position as a vector.
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Normal as a vector.
    pub fn normal(&self) -> Vec3 {
        Vec3::from(self.normal)
    }
}

/// A mesh with vertex and index data.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    aabb: Aabb,
}

impl Mesh {
    /// Create a new mesh from vertices and triangle list indices.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let aabb = Aabb::from_points(vertices.iter().map(Vertex::position));
        Self {
            vertices,
            indices,
            aabb,
        }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Create a cube mesh centered at the origin.
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        // (normal, u, v) with u x v = normal
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (-Vec3::X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (-Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, Vec3::Y, Vec3::X),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u32;
            let corners = [
                (-u - v, [0.0, 0.0]),
                (u - v, [1.0, 0.0]),
                (u + v, [1.0, 1.0]),
                (-u + v, [0.0, 1.0]),
            ];
            for (offset, uv) in corners {
                let position = (normal + offset) * half;
                vertices.push(Vertex::new(position.to_array(), normal.to_array(), uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(vertices, indices)
    }

    /// Create a UV sphere centered at the origin.
    pub fn sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
        let mut indices = Vec::with_capacity((rings * segments * 6) as usize);

        for ring in 0..=rings {
            let phi = PI * ring as f32 / rings as f32;
            let y = phi.cos();
            let ring_radius = phi.sin();

            for segment in 0..=segments {
                let theta = 2.0 * PI * segment as f32 / segments as f32;
                let normal = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
                vertices.push(Vertex::new(
                    (normal * radius).to_array(),
                    normal.to_array(),
                    [
                        segment as f32 / segments as f32,
                        ring as f32 / rings as f32,
                    ],
                ));
            }
        }

        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let next = current + segments + 1;
                indices.extend_from_slice(&[current, current + 1, next]);
                indices.extend_from_slice(&[current + 1, next + 1, next]);
            }
        }

        Self::new(vertices, indices)
    }

    /// Create a torus in the XZ plane centered at the origin.
    pub fn torus(major_radius: f32, minor_radius: f32, segments: u32, sides: u32) -> Self {
        let segments = segments.max(3);
        let sides = sides.max(3);
        let mut vertices = Vec::with_capacity(((segments + 1) * (sides + 1)) as usize);
        let mut indices = Vec::with_capacity((segments * sides * 6) as usize);

        for i in 0..=segments {
            let u = 2.0 * PI * i as f32 / segments as f32;
            let (sin_u, cos_u) = u.sin_cos();
            for j in 0..=sides {
                let v = 2.0 * PI * j as f32 / sides as f32;
                let (sin_v, cos_v) = v.sin_cos();
                let ring = major_radius + minor_radius * cos_v;
                let position = Vec3::new(ring * cos_u, minor_radius * sin_v, ring * sin_u);
                let normal = Vec3::new(cos_v * cos_u, sin_v, cos_v * sin_u);
                vertices.push(Vertex::new(
                    position.to_array(),
                    normal.to_array(),
                    [i as f32 / segments as f32, j as f32 / sides as f32],
                ));
            }
        }

        let idx = |i: u32, j: u32| i * (sides + 1) + j;
        for i in 0..segments {
            for j in 0..sides {
                indices.extend_from_slice(&[idx(i, j), idx(i, j + 1), idx(i + 1, j)]);
                indices.extend_from_slice(&[idx(i + 1, j), idx(i, j + 1), idx(i + 1, j + 1)]);
            }
        }

        Self::new(vertices, indices)
    }

    /// Create a quad mesh (XZ plane, facing +Y).
    pub fn quad(width: f32, depth: f32) -> Self {
        let hw = width / 2.0;
        let hd = depth / 2.0;
        let normal = [0.0, 1.0, 0.0];

        let vertices = vec![
            Vertex::new([-hw, 0.0, -hd], normal, [0.0, 0.0]),
            Vertex::new([-hw, 0.0, hd], normal, [0.0, 1.0]),
            Vertex::new([hw, 0.0, hd], normal, [1.0, 1.0]),
            Vertex::new([hw, 0.0, -hd], normal, [1.0, 0.0]),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];

        Self::new(vertices, indices)
    }
}

impl Geometry for Mesh {
    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn indices(&self) -> &[u32] {
        &self.indices
    }

    fn aabb(&self) -> Aabb {
        self.aabb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward_winding(mesh: &Mesh) {
        for [a, b, c] in mesh.triangles() {
            let face = (b.position() - a.position()).cross(c.position() - a.position());
            if face.length_squared() < 1e-12 {
                // pole triangles of the UV sphere collapse
                continue;
            }
            let normal = a.normal() + b.normal() + c.normal();
            assert!(
                face.dot(normal) > 0.0,
                "triangle winds inward: {:?} {:?} {:?}",
                a,
                b,
                c
            );
        }
    }

    #[test]
    fn test_vertex_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32); // 3+3+2 floats * 4 bytes
    }

    #[test]
    fn test_cube() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertices().len(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.aabb().min, Vec3::splat(-1.0));
        assert_eq!(cube.aabb().max, Vec3::splat(1.0));
        assert_outward_winding(&cube);
    }

    #[test]
    fn test_sphere() {
        let sphere = Mesh::sphere(0.5, 16, 8);
        assert_eq!(sphere.vertices().len(), 17 * 9);
        assert_eq!(sphere.triangle_count(), 16 * 8 * 2);
        for v in sphere.vertices() {
            assert!((v.position().length() - 0.5).abs() < 1e-5);
            assert!((v.normal().length() - 1.0).abs() < 1e-5);
        }
        assert_outward_winding(&sphere);
    }

    #[test]
    fn test_torus() {
        let torus = Mesh::torus(1.0, 0.25, 24, 12);
        assert_eq!(torus.triangle_count(), 24 * 12 * 2);
        let aabb = torus.aabb();
        assert!((aabb.max.x - 1.25).abs() < 1e-5);
        assert!((aabb.max.y - 0.25).abs() < 1e-3);
        assert_outward_winding(&torus);
    }

    #[test]
    fn test_quad() {
        let quad = Mesh::quad(4.0, 2.0);
        assert_eq!(quad.triangle_count(), 2);
        assert_eq!(quad.aabb().min, Vec3::new(-2.0, 0.0, -1.0));
        assert_outward_winding(&quad);
    }
}
