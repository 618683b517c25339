//! Planar shadow projection
//!
//! `M = (P.L) I - L P^T` flattens geometry onto the plane `P` as seen from
//! the homogeneous light `L`. Points on the plane are fixed up to scale and
//! the light itself maps to the zero vector.

use glam::{Mat4, Vec3, Vec4};

use crate::core::math::{smoothstep, EPSILON};
use crate::error::{self, Error};
use crate::renderer::geometry::Plane;
use crate::renderer::light::Light;

/// Planar shadow configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarShadowConfig {
    /// `|P.L|` below this flags the matrix as degenerate. Default: 1e-3.
    pub degenerate_threshold: f32,
    /// Log a warning when the matrix is degenerate.
    pub verbose: bool,
    /// Shadow opacity at the center of the footprint. Default: 0.6.
    pub base_alpha: f32,
}

impl Default for PlanarShadowConfig {
    fn default() -> Self {
        Self {
            degenerate_threshold: 1e-3,
            verbose: false,
            base_alpha: 0.6,
        }
    }
}

impl PlanarShadowConfig {
    /// Check that every field is in range.
    pub fn validate(&self) -> error::Result<()> {
        error::non_negative("degenerate_threshold", self.degenerate_threshold)?;
        error::non_negative("base_alpha", self.base_alpha)?;
        if self.base_alpha > 1.0 {
            return Err(Error::InvalidScalar {
                name: "base_alpha",
                value: self.base_alpha,
            });
        }
        Ok(())
    }
}

/// Projection matrix onto a plane plus its degeneracy diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarShadowMatrix {
    pub matrix: Mat4,
    /// `P.L`, proportional to the light's height above the plane.
    pub dot: f32,
    /// The light is (nearly) in the plane or parallel to it.
    pub degenerate: bool,
}

impl PlanarShadowMatrix {
    /// Project a world point onto the plane.
    ///
    /// `None` when the point is level with or above the light, where it casts
    /// no shadow onto the plane.
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        let h = self.matrix * point.extend(1.0);
        if h.w * self.dot.signum() <= EPSILON * self.dot.abs() {
            return None;
        }
        Some(h.truncate() / h.w)
    }

    /// Whether the projection produces a usable shadow on the lit side.
    pub fn casts(&self) -> bool {
        !self.degenerate && self.dot > 0.0
    }
}

/// Build the planar shadow matrix for `light` (homogeneous) and `plane`.
///
/// Row `i`, column `j` is `dot * delta(i, j) - L[i] * P[j]`. A near-zero
/// `dot` is flagged, never corrected.
pub fn build_planar_shadow_matrix(
    light: Vec4,
    plane: &Plane,
    config: &PlanarShadowConfig,
) -> PlanarShadowMatrix {
    let p = plane.to_vec4();
    let dot = p.dot(light);

    // Column j of (dot * I) minus column j of (L P^T)
    let matrix = Mat4::from_cols(
        Vec4::X * dot - light * p.x,
        Vec4::Y * dot - light * p.y,
        Vec4::Z * dot - light * p.z,
        Vec4::W * dot - light * p.w,
    );

    let degenerate = !(dot.abs() >= config.degenerate_threshold);
    if degenerate && config.verbose {
        tracing::warn!(
            "Planar shadow matrix is degenerate: light {:?} plane {:?} dot {}",
            light,
            p,
            dot
        );
    }

    PlanarShadowMatrix {
        matrix,
        dot,
        degenerate,
    }
}

/// Outer radius of the soft shadow footprint.
///
/// Grows as the light gets closer to the object: `r * (1 + r / h)`.
pub fn estimate_shadow_radius(object_radius: f32, light_height: f32) -> f32 {
    object_radius * (1.0 + object_radius / light_height.max(EPSILON))
}

/// Opacity of the planar shadow at `fragment`.
///
/// Falls off with horizontal (XZ) distance from `center`, fully opaque up to
/// half of `outer_radius` and transparent beyond it.
pub fn soft_edge_alpha(center: Vec3, fragment: Vec3, outer_radius: f32, base_alpha: f32) -> f32 {
    let dx = fragment.x - center.x;
    let dz = fragment.z - center.z;
    let distance = (dx * dx + dz * dz).sqrt();
    let outer = outer_radius.max(0.0);
    base_alpha * (1.0 - smoothstep(outer * 0.5, outer, distance))
}

/// Per-frame planar shadow state for one caster.
#[derive(Debug, Clone)]
pub struct PlanarShadow {
    config: PlanarShadowConfig,
    projection: PlanarShadowMatrix,
    center: Vec3,
    outer_radius: f32,
}

impl PlanarShadow {
    pub fn new(config: PlanarShadowConfig) -> error::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            projection: PlanarShadowMatrix {
                matrix: Mat4::IDENTITY,
                dot: 0.0,
                degenerate: true,
            },
            center: Vec3::ZERO,
            outer_radius: 0.0,
        })
    }

    pub fn config(&self) -> &PlanarShadowConfig {
        &self.config
    }

    pub fn projection(&self) -> &PlanarShadowMatrix {
        &self.projection
    }

    /// Shadow center on the plane.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    /// Recompute the matrix and footprint for the current light.
    pub fn update(
        &mut self,
        light: &Light,
        plane: &Plane,
        object_center: Vec3,
        object_radius: f32,
    ) {
        let plane = plane.normalize();
        self.projection = build_planar_shadow_matrix(light.homogeneous(), &plane, &self.config);

        let light_height = match light.position() {
            Some(position) => {
                plane.signed_distance(position) - plane.signed_distance(object_center)
            }
            None => f32::INFINITY,
        };
        self.outer_radius = estimate_shadow_radius(object_radius, light_height);
        self.center = self
            .projection
            .project(object_center)
            .unwrap_or_else(|| plane.project_point(object_center));
    }

    /// Shadow opacity at a point on the plane.
    pub fn alpha_at(&self, fragment: Vec3) -> f32 {
        if !self.projection.casts() {
            return 0.0;
        }
        soft_edge_alpha(self.center, fragment, self.outer_radius, self.config.base_alpha)
    }

    /// Get the planar shadow uniform data for shaders.
    pub fn uniform(&self) -> PlanarShadowUniform {
        PlanarShadowUniform {
            matrix: self.projection.matrix.to_cols_array_2d(),
            center_radius: self.center.extend(self.outer_radius).to_array(),
            params: [
                self.config.base_alpha,
                self.projection.dot,
                if self.projection.degenerate { 1.0 } else { 0.0 },
                0.0,
            ],
        }
    }
}

/// Planar shadow uniform data for GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlanarShadowUniform {
    /// Projection onto the plane.
    pub matrix: [[f32; 4]; 4],
    /// Shadow center (xyz) and outer radius (w).
    pub center_radius: [f32; 4],
    /// (base_alpha, dot, degenerate, -).
    pub params: [f32; 4],
}
