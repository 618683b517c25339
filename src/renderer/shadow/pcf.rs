//! Percentage-closer filtering
//!
//! Lookups outside the light frustum count as lit.

use glam::{Vec3, Vec4};

use super::ShadowMap;
use crate::core::math::saturate;
use crate::core::DepthBuffer;

/// Slope-scaled depth bias: `max(c * (1 - N.L), 0.1 * c)`.
#[inline]
pub fn slope_scaled_bias(constant: f32, n_dot_l: f32) -> f32 {
    let n_dot_l = saturate(n_dot_l);
    (constant * (1.0 - n_dot_l)).max(constant * 0.1)
}

/// Average of `(2r + 1)^2` depth comparisons around `coords`.
///
/// `coords.xy` are texture coordinates in [0, 1] with v growing downward,
/// `coords.z` is the receiver depth. Taps past the edge clamp to it.
pub fn sample_pcf(depth: &DepthBuffer, coords: Vec3, bias: f32, radius: u32) -> f32 {
    let width = depth.width();
    let height = depth.height();
    if width == 0 || height == 0 {
        return 1.0;
    }

    let cx = ((coords.x * width as f32) as i32).min(width as i32 - 1);
    let cy = ((coords.y * height as f32) as i32).min(height as i32 - 1);
    let current = coords.z - bias;
    let r = radius as i32;

    let mut lit = 0u32;
    for dy in -r..=r {
        for dx in -r..=r {
            if current <= depth.sample(cx + dx, cy + dy) {
                lit += 1;
            }
        }
    }

    let side = 2 * radius + 1;
    lit as f32 / (side * side) as f32
}

/// Visibility for shadow map texture coordinates.
///
/// 1.0 when `coords` falls outside the map or beyond the far plane.
pub fn shadow_factor_at(shadow_map: &ShadowMap, coords: Vec3, n: Vec3, l: Vec3) -> f32 {
    if !coords.is_finite()
        || !(0.0..=1.0).contains(&coords.x)
        || !(0.0..=1.0).contains(&coords.y)
        || coords.z > 1.0
    {
        return 1.0;
    }

    let config = shadow_map.config();
    let bias = slope_scaled_bias(config.bias, n.dot(l));
    sample_pcf(shadow_map.depth(), coords, bias, config.pcf_radius)
}

/// Visibility of a fragment from its light clip space position.
///
/// `n` is the surface normal and `l` the unit direction toward the light.
/// Positions behind the light (`w <= 0`) are lit.
pub fn compute_shadow_factor(
    shadow_map: &ShadowMap,
    light_space_position: Vec4,
    n: Vec3,
    l: Vec3,
) -> f32 {
    if !(light_space_position.w > 0.0) {
        return 1.0;
    }
    let ndc = light_space_position.truncate() / light_space_position.w;
    let coords = Vec3::new(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5, ndc.z);
    shadow_factor_at(shadow_map, coords, n, l)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shadow::{SceneBounds, ShadowConfig};
    use crate::renderer::{Light, Mesh};
    use glam::Mat4;

    fn occluded_map() -> ShadowMap {
        let mut map = ShadowMap::new(ShadowConfig {
            resolution: 128,
            ..Default::default()
        })
        .unwrap();
        let light = Light::directional(-Vec3::Y, Vec3::ONE, 1.0);
        map.update(&light, &SceneBounds::new(Vec3::ZERO, 3.0));
        let caster = Mesh::cube(1.0);
        map.render_depth_pass(&[(Mat4::from_translation(Vec3::Y), &caster)]);
        map
    }

    #[test]
    fn test_bias() {
        assert!((slope_scaled_bias(0.005, 1.0) - 0.0005).abs() < 1e-9);
        assert!((slope_scaled_bias(0.005, 0.0) - 0.005).abs() < 1e-9);
        assert!((slope_scaled_bias(0.005, -1.0) - 0.005).abs() < 1e-9);
        assert!(slope_scaled_bias(0.005, 0.5) > slope_scaled_bias(0.005, 0.9));
    }

    #[test]
    fn test_pcf_on_flat_buffer() {
        let mut depth = DepthBuffer::new(8, 8);
        depth.clear(0.5);
        assert_eq!(sample_pcf(&depth, Vec3::new(0.5, 0.5, 0.4), 0.0, 2), 1.0);
        assert_eq!(sample_pcf(&depth, Vec3::new(0.5, 0.5, 0.6), 0.0, 2), 0.0);
        // Bias pulls the receiver in front of the stored depth
        assert_eq!(sample_pcf(&depth, Vec3::new(0.5, 0.5, 0.52), 0.05, 1), 1.0);
    }

    #[test]
    fn test_pcf_partial_edge() {
        let mut depth = DepthBuffer::new(8, 8);
        // Left half occluded
        for y in 0..8 {
            for x in 0..4 {
                depth.set(x, y, 0.2);
            }
        }
        let at_edge = sample_pcf(&depth, Vec3::new(4.5 / 8.0, 0.5, 0.5), 0.0, 1);
        assert!((at_edge - 6.0 / 9.0).abs() < 1e-6);
        // Corner taps clamp to the edge texel
        assert_eq!(sample_pcf(&depth, Vec3::new(1.0, 1.0, 0.5), 0.0, 2), 1.0);
        assert_eq!(sample_pcf(&depth, Vec3::new(0.0, 0.0, 0.5), 0.0, 2), 0.0);
    }

    #[test]
    fn test_occluded_point_is_shadowed() {
        let map = occluded_map();
        let below = map.project(Vec3::new(0.0, -1.0, 0.0));
        let factor = compute_shadow_factor(&map, below, Vec3::Y, Vec3::Y);
        assert!(factor < 1.0);
        assert_eq!(factor, 0.0);
    }

    #[test]
    fn test_unoccluded_point_is_fully_lit() {
        let map = occluded_map();
        let beside = map.project(Vec3::new(2.5, -1.0, 0.0));
        assert_eq!(compute_shadow_factor(&map, beside, Vec3::Y, Vec3::Y), 1.0);
        // The caster's own top face does not self-shadow
        let top = map.project(Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(compute_shadow_factor(&map, top, Vec3::Y, Vec3::Y), 1.0);
    }

    #[test]
    fn test_out_of_bounds_is_lit() {
        let map = occluded_map();
        assert_eq!(shadow_factor_at(&map, Vec3::new(1.5, 0.5, 0.5), Vec3::Y, Vec3::Y), 1.0);
        assert_eq!(shadow_factor_at(&map, Vec3::new(0.5, -0.1, 0.5), Vec3::Y, Vec3::Y), 1.0);
        assert_eq!(shadow_factor_at(&map, Vec3::new(0.5, 0.5, 1.2), Vec3::Y, Vec3::Y), 1.0);
        assert_eq!(shadow_factor_at(&map, Vec3::splat(f32::NAN), Vec3::Y, Vec3::Y), 1.0);
    }

    #[test]
    fn test_behind_light_is_lit() {
        let map = occluded_map();
        let behind = Vec4::new(0.0, 0.0, 0.5, -1.0);
        assert_eq!(compute_shadow_factor(&map, behind, Vec3::Y, Vec3::Y), 1.0);
        let at_infinity = Vec4::new(0.0, 0.0, 0.5, 0.0);
        assert_eq!(compute_shadow_factor(&map, at_infinity, Vec3::Y, Vec3::Y), 1.0);
    }
}
