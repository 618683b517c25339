//! PBR (Physically Based Rendering) material

use glam::Vec3;

use super::brdf::{self, DIELECTRIC_F0};
use crate::core::math::saturate;

/// PBR material uniform data.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PbrUniform {
    /// Base color (albedo) RGB + padding.
    pub albedo: [f32; 4],
    /// Metallic factor.
    pub metallic: f32,
    /// Perceptual roughness.
    pub roughness: f32,
    /// Distribution alpha (roughness squared, floored).
    pub alpha: f32,
    /// Padding.
    pub _padding: f32,
}

/// PBR material with metallic-roughness workflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PbrMaterial {
    /// Base color (albedo), linear RGB in [0, 1].
    pub albedo: Vec3,
    /// Roughness factor (0.0 = smooth, 1.0 = rough).
    pub roughness: f32,
    /// Metallic factor (0.0 = dielectric, 1.0 = metal).
    pub metallic: f32,
}

impl PbrMaterial {
    /// Create a new material.
    pub fn new(albedo: Vec3, roughness: f32, metallic: f32) -> Self {
        Self {
            albedo,
            roughness,
            metallic,
        }
    }

    /// A copy with every parameter clamped into its valid range.
    ///
    /// Non-finite values fall back to the defaults.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let finite = |x: f32, fallback: f32| if x.is_finite() { x } else { fallback };
        Self {
            albedo: Vec3::new(
                saturate(finite(self.albedo.x, defaults.albedo.x)),
                saturate(finite(self.albedo.y, defaults.albedo.y)),
                saturate(finite(self.albedo.z, defaults.albedo.z)),
            ),
            roughness: saturate(finite(self.roughness, defaults.roughness)),
            metallic: saturate(finite(self.metallic, defaults.metallic)),
        }
    }

    /// GGX alpha used by the distribution term.
    pub fn alpha(&self) -> f32 {
        brdf::alpha_from_roughness(self.roughness)
    }

    /// Reflectance at normal incidence: 4% for dielectrics, albedo for metals.
    pub fn f0(&self) -> Vec3 {
        Vec3::splat(DIELECTRIC_F0).lerp(self.albedo, self.metallic)
    }

    /// Get the uniform data for shaders.
    pub fn uniform(&self) -> PbrUniform {
        let m = self.clamped();
        PbrUniform {
            albedo: m.albedo.extend(1.0).to_array(),
            metallic: m.metallic,
            roughness: m.roughness,
            alpha: m.alpha(),
            _padding: 0.0,
        }
    }

    /// Polished gold.
    pub fn gold() -> Self {
        Self::new(Vec3::new(1.0, 0.766, 0.336), 0.25, 1.0)
    }

    /// Rough red plastic.
    pub fn plastic() -> Self {
        Self::new(Vec3::new(0.8, 0.1, 0.1), 0.6, 0.0)
    }
}

impl Default for PbrMaterial {
    fn default() -> Self {
        Self::new(Vec3::new(0.8, 0.8, 0.8), 0.5, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<PbrUniform>(), 32);
    }

    #[test]
    fn test_clamped() {
        let m = PbrMaterial::new(Vec3::new(1.5, -0.2, 0.5), 2.0, f32::NAN).clamped();
        assert_eq!(m.albedo, Vec3::new(1.0, 0.0, 0.5));
        assert_eq!(m.roughness, 1.0);
        assert_eq!(m.metallic, 0.0);
    }

    #[test]
    fn test_f0() {
        let dielectric = PbrMaterial::new(Vec3::new(0.9, 0.1, 0.1), 0.5, 0.0);
        assert!((dielectric.f0() - Vec3::splat(0.04)).length() < 1e-6);

        let metal = PbrMaterial::gold();
        assert!((metal.f0() - metal.albedo).length() < 1e-6);
    }

    #[test]
    fn test_uniform_alpha_floor() {
        let smooth = PbrMaterial::new(Vec3::ONE, 0.0, 0.0);
        let uniform = smooth.uniform();
        assert!(uniform.alpha >= 1e-3);
        assert_eq!(uniform.albedo[3], 1.0);
    }
}
