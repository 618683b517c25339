//! Direct lighting
//!
//! Combines the light model with the Cook-Torrance BRDF for one shading
//! point, plus the constant ambient term added outside the BRDF.

use glam::Vec3;

use crate::core::math::safe_normalize;
use crate::error::{self, Error};
use crate::renderer::light::{Light, DEFAULT_AREA_GRID, MAX_AREA_GRID};
use crate::renderer::material::{cook_torrance, PbrMaterial, ShadingVectors};

/// Lighting configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingConfig {
    /// Ambient fraction of albedo. Default: 0.03.
    pub ambient_strength: f32,
    /// Fake environment reflection for metallic, smooth surfaces. Default: 0.25.
    pub environment_boost: f32,
    /// Area light samples per side. Default: 8 (64 samples).
    pub area_grid: u32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_strength: 0.03,
            environment_boost: 0.25,
            area_grid: DEFAULT_AREA_GRID,
        }
    }
}

impl LightingConfig {
    /// Check that every field is in range.
    pub fn validate(&self) -> error::Result<()> {
        error::non_negative("ambient_strength", self.ambient_strength)?;
        error::non_negative("environment_boost", self.environment_boost)?;
        if self.area_grid == 0 || self.area_grid > MAX_AREA_GRID {
            return Err(Error::InvalidAreaGrid {
                grid: self.area_grid,
                max: MAX_AREA_GRID,
            });
        }
        Ok(())
    }
}

/// A point being shaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    /// World position.
    pub position: Vec3,
    /// Unit surface normal.
    pub normal: Vec3,
}

impl SurfacePoint {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal: safe_normalize(normal, Vec3::Y),
        }
    }

    /// Unit direction from the surface toward `eye`.
    pub fn view_direction(&self, eye: Vec3) -> Vec3 {
        safe_normalize(eye - self.position, self.normal)
    }
}

/// Outgoing radiance from one light at one surface point, excluding ambient.
///
/// `view` is the unit direction from the surface toward the eye. Area lights
/// evaluate the BRDF once per grid sample and sum the weighted results.
pub fn evaluate_direct_lighting(
    surface: &SurfacePoint,
    view: Vec3,
    material: &PbrMaterial,
    light: &Light,
    config: &LightingConfig,
) -> Vec3 {
    light
        .sample(surface.position, config.area_grid)
        .filter(|sample| sample.attenuation > 0.0)
        .map(|sample| {
            let vectors = ShadingVectors::new(surface.normal, view, sample.direction);
            cook_torrance(&vectors, material, sample.radiance)
        })
        .sum()
}

/// Constant ambient term.
///
/// `ambient_strength * albedo`, plus `F0 * metallic * (1 - roughness)^2 *
/// environment_boost` so polished metals do not go black where unlit.
pub fn ambient(material: &PbrMaterial, config: &LightingConfig) -> Vec3 {
    let m = material.clamped();
    let smoothness = 1.0 - m.roughness;
    let reflection = m.f0() * (m.metallic * smoothness * smoothness * config.environment_boost);
    m.albedo * config.ambient_strength + reflection
}

/// Final color for a fragment: ambient plus shadowed direct lighting.
///
/// `shadow` is the visibility factor in [0, 1] and only scales direct light.
pub fn shade(
    surface: &SurfacePoint,
    eye: Vec3,
    material: &PbrMaterial,
    light: &Light,
    shadow: f32,
    config: &LightingConfig,
) -> Vec3 {
    let view = surface.view_direction(eye);
    let direct = evaluate_direct_lighting(surface, view, material, light, config);
    ambient(material, config) + direct * shadow.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn floor_point() -> SurfacePoint {
        SurfacePoint::new(Vec3::ZERO, Vec3::Y)
    }

    #[test]
    fn test_lambertian_point_light() {
        // Rough white dielectric lit and viewed head-on from distance 1
        let material = PbrMaterial::new(Vec3::ONE, 1.0, 0.0);
        let light = Light::point(Vec3::Y, Vec3::ONE, 1.0);
        let out = evaluate_direct_lighting(
            &floor_point(),
            Vec3::Y,
            &material,
            &light,
            &LightingConfig::default(),
        );
        // diffuse = 0.96 / PI, specular = D(1) G F / 4 with alpha = 1
        let specular = (1.0 / PI) * 0.04 / 4.0;
        let expected = 0.96 / PI + specular;
        assert!((out.x - expected).abs() < 1e-4, "{} vs {}", out.x, expected);
    }

    #[test]
    fn test_light_below_surface_is_black() {
        let light = Light::point(-Vec3::Y, Vec3::ONE, 10.0);
        let out = evaluate_direct_lighting(
            &floor_point(),
            Vec3::Y,
            &PbrMaterial::default(),
            &light,
            &LightingConfig::default(),
        );
        assert_eq!(out, Vec3::ZERO);
    }

    #[test]
    fn test_zero_size_area_converges_to_point() {
        let material = PbrMaterial::plastic();
        let position = Vec3::new(0.5, 2.0, 0.0);
        let point = Light::point(position, Vec3::ONE, 5.0);
        // Emitter faces the shading point
        let area = Light::area(position, -position, 0.0, 0.0, Vec3::ONE, 5.0);
        let view = Vec3::new(0.0, 1.0, 1.0).normalize();
        let config = LightingConfig {
            area_grid: 1,
            ..Default::default()
        };

        let expected = evaluate_direct_lighting(&floor_point(), view, &material, &point, &config);
        let single = evaluate_direct_lighting(&floor_point(), view, &material, &area, &config);
        assert!((single - expected).length() < 1e-4);

        let dense = LightingConfig {
            area_grid: 8,
            ..Default::default()
        };
        let averaged = evaluate_direct_lighting(&floor_point(), view, &material, &area, &dense);
        assert!((averaged - expected).length() < 1e-4);
    }

    #[test]
    fn test_area_light_is_softer_than_point() {
        let material = PbrMaterial::default();
        let config = LightingConfig::default();
        let big = Light::area(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y, 4.0, 4.0, Vec3::ONE, 1.0);
        let small = Light::area(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y, 0.0, 0.0, Vec3::ONE, 1.0);
        let big_out = evaluate_direct_lighting(&floor_point(), Vec3::Y, &material, &big, &config);
        let small_out =
            evaluate_direct_lighting(&floor_point(), Vec3::Y, &material, &small, &config);
        // Spreading the emitter moves energy to grazing angles and longer paths
        assert!(big_out.x < small_out.x);
        assert!(big_out.x > 0.0);
    }

    #[test]
    fn test_unvalidated_area_grid_is_clamped() {
        let material = PbrMaterial::default();
        let light = Light::area(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y, 1.0, 1.0, Vec3::ONE, 1.0);
        let huge = LightingConfig {
            area_grid: 70_000,
            ..Default::default()
        };
        let largest = LightingConfig {
            area_grid: MAX_AREA_GRID,
            ..Default::default()
        };
        assert!(huge.validate().is_err());

        let out = evaluate_direct_lighting(&floor_point(), Vec3::Y, &material, &light, &huge);
        let expected =
            evaluate_direct_lighting(&floor_point(), Vec3::Y, &material, &light, &largest);
        assert!(out.is_finite());
        assert!((out - expected).length() < 1e-6);
    }

    #[test]
    fn test_ambient() {
        let config = LightingConfig::default();
        let plastic = PbrMaterial::new(Vec3::new(0.5, 0.2, 0.1), 0.5, 0.0);
        assert!((ambient(&plastic, &config) - plastic.albedo * 0.03).length() < 1e-6);

        let mirror = PbrMaterial::new(Vec3::ONE, 0.0, 1.0);
        let rough_metal = PbrMaterial::new(Vec3::ONE, 1.0, 1.0);
        assert!(ambient(&mirror, &config).x > ambient(&rough_metal, &config).x);
        assert!((ambient(&mirror, &config).x - (0.03 + 0.25)).abs() < 1e-6);
    }

    #[test]
    fn test_shadow_only_scales_direct() {
        let material = PbrMaterial::default();
        let light = Light::directional(-Vec3::Y, Vec3::ONE, 3.0);
        let config = LightingConfig::default();
        let eye = Vec3::new(0.0, 3.0, 3.0);

        let lit = shade(&floor_point(), eye, &material, &light, 1.0, &config);
        let dark = shade(&floor_point(), eye, &material, &light, 0.0, &config);
        let half = shade(&floor_point(), eye, &material, &light, 0.5, &config);

        assert!((dark - ambient(&material, &config)).length() < 1e-6);
        assert!(((lit + dark) * 0.5 - half).length() < 1e-5);
    }

    #[test]
    fn test_config_validation() {
        assert!(LightingConfig::default().validate().is_ok());
        let bad = LightingConfig {
            area_grid: 0,
            ..Default::default()
        };
        assert_eq!(
            bad.validate(),
            Err(Error::InvalidAreaGrid {
                grid: 0,
                max: MAX_AREA_GRID
            })
        );
        let negative = LightingConfig {
            ambient_strength: -0.1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }
}
