//! Scalar and vector helpers shared by the shading code.

use glam::Vec3;

/// Floor used for denominators that may approach zero.
pub const EPSILON: f32 = 1e-4;

/// Clamp to [0, 1].
#[inline]
pub fn saturate(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Cubic Hermite interpolation between `edge0` and `edge1`.
///
/// Coincident edges degrade to a hard step at `edge0`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if (edge1 - edge0).abs() <= f32::EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = saturate((x - edge0) / (edge1 - edge0));
    t * t * (3.0 - 2.0 * t)
}

/// Normalize `v`, falling back to `fallback` for zero-length or non-finite input.
#[inline]
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(fallback)
}

/// Build a tangent and bitangent perpendicular to the unit vector `n`.
///
/// World Y is used as the helper axis unless `n` is nearly parallel to it,
/// in which case world X is used instead.
pub fn orthonormal_basis(n: Vec3) -> (Vec3, Vec3) {
    let up = if n.dot(Vec3::Y).abs() > 0.999 {
        Vec3::X
    } else {
        Vec3::Y
    };
    let tangent = up.cross(n).normalize();
    let bitangent = n.cross(tangent);
    (tangent, bitangent)
}
