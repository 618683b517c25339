//! Light space framing
//!
//! Directional lights get an orthographic box around the scene bounds.
//! Positional lights get a perspective frustum from the light position.

use glam::{Mat4, Vec3, Vec4};

use crate::core::math::{safe_normalize, EPSILON};
use crate::renderer::geometry::Aabb;
use crate::renderer::light::{Light, LightKind};
use crate::renderer::viewer::Projection;

const MIN_FOV: f32 = 0.05;
const MAX_FOV: f32 = 2.9;

/// Bounding sphere of everything that casts or receives shadows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub center: Vec3,
    pub radius: f32,
}

impl SceneBounds {
    /// Create bounds. The radius is floored so the frustum never collapses.
    pub fn new(center: Vec3, radius: f32) -> Self {
        let radius = if radius.is_finite() { radius.max(1e-3) } else { 1.0 };
        Self { center, radius }
    }

    /// Bounding sphere of an AABB.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(aabb.center(), aabb.bounding_radius())
    }
}

/// World to light clip space transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSpace {
    pub view: Mat4,
    /// Frustum shape the projection matrix was built from.
    pub frustum: Projection,
    pub projection: Mat4,
    /// `projection * view`.
    pub matrix: Mat4,
    /// Inverse of `matrix`.
    pub inverse: Mat4,
}

impl LightSpace {
    pub fn new(view: Mat4, frustum: Projection) -> Self {
        let projection = frustum.matrix();
        let matrix = projection * view;
        Self {
            view,
            frustum,
            projection,
            matrix,
            inverse: matrix.inverse(),
        }
    }

    /// World position to light clip space.
    pub fn project(&self, world: Vec3) -> Vec4 {
        self.matrix * world.extend(1.0)
    }

    /// Light NDC back to a world position.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.inverse.project_point3(ndc)
    }
}

impl Default for LightSpace {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Projection::square_orthographic(1.0, 0.0, 1.0))
    }
}

/// Up vector for a look-at along `forward` that never degenerates.
fn stable_up(forward: Vec3) -> Vec3 {
    if forward.dot(Vec3::Y).abs() > 0.999 {
        Vec3::Z
    } else {
        Vec3::Y
    }
}

/// Build the light view-projection that frames `bounds`.
pub fn build_light_space_matrix(light: &Light, bounds: &SceneBounds) -> LightSpace {
    let center = bounds.center;
    let radius = bounds.radius;

    match light.kind {
        LightKind::Directional { direction } => {
            let direction = safe_normalize(direction, -Vec3::Y);
            let eye = center - direction * (radius * 2.0);
            let view = Mat4::look_at_rh(eye, center, stable_up(direction));

            let near = (radius * 0.05).max(0.01);
            LightSpace::new(
                view,
                Projection::square_orthographic(radius * 1.5, near, radius * 4.0),
            )
        }
        LightKind::Point { position }
        | LightKind::Area { position, .. }
        | LightKind::Spot { position, .. } => {
            let to_center = center - position;
            let distance = to_center.length();

            let (forward, fov) = match light.kind {
                LightKind::Spot {
                    direction,
                    half_angle,
                    softness,
                    ..
                } => (
                    safe_normalize(direction, -Vec3::Y),
                    2.0 * (half_angle + softness.max(0.0)),
                ),
                _ if distance > radius => (to_center / distance, 2.4 * (radius / distance).asin()),
                _ => (safe_normalize(to_center, -Vec3::Y), MAX_FOV),
            };

            let near = (distance - radius).max(distance * 0.1).max(0.05);
            let far = (distance + radius).max(near + EPSILON) * 1.01;
            let view = Mat4::look_at_rh(position, position + forward, stable_up(forward));
            let frustum = Projection::Perspective {
                fov_y: fov.clamp(MIN_FOV, MAX_FOV),
                aspect: 1.0,
                near,
                far,
            };
            LightSpace::new(view, frustum)
        }
    }
}
