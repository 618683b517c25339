//! Cook-Torrance microfacet BRDF
//!
//! `f = kD * albedo / PI + D * G * F / (4 * (N.V) * (N.L))`
//!
//! * `D` - GGX / Trowbridge-Reitz normal distribution, `alpha = roughness^2`
//! * `G` - Smith masking-shadowing built from two Schlick-GGX terms with the
//!   direct-lighting remap `k = (roughness + 1)^2 / 8`
//! * `F` - Schlick's Fresnel approximation
//!
//! Every dot product is clamped to [0, 1] before use, and every denominator is
//! floored, so the result is finite and non-negative for any unit vectors.

use glam::Vec3;
use std::f32::consts::PI;

use super::pbr::PbrMaterial;
use crate::core::math::{safe_normalize, saturate, EPSILON};

/// Reflectance at normal incidence for dielectrics.
pub const DIELECTRIC_F0: f32 = 0.04;

/// Smallest alpha fed to the distribution term.
pub const MIN_ALPHA: f32 = 1e-3;

/// Map perceptual roughness to GGX alpha (`roughness^2`, floored at [`MIN_ALPHA`]).
#[inline]
pub fn alpha_from_roughness(roughness: f32) -> f32 {
    let r = saturate(roughness);
    (r * r).max(MIN_ALPHA)
}

/// Floor for the GGX base term, below `MIN_ALPHA^2` so it never clips a valid alpha.
const MIN_GGX_BASE: f32 = 1e-7;

/// GGX / Trowbridge-Reitz normal distribution `D`.
///
/// The base `(N.H)^2 (alpha^2 - 1) + 1` is expanded as
/// `(N.H)^2 alpha^2 + (1 - (N.H)^2)` so the peak at `N.H = 1` is exactly
/// `1 / (PI alpha^2)`, and floored at [`MIN_GGX_BASE`] for `alpha = 0`.
#[inline]
pub fn distribution_ggx(n_dot_h: f32, alpha: f32) -> f32 {
    let a2 = alpha * alpha;
    let n_dot_h = saturate(n_dot_h);
    let cos2 = n_dot_h * n_dot_h;
    let base = (cos2 * a2 + (1.0 - cos2)).max(MIN_GGX_BASE);
    a2 / (PI * base * base)
}

/// Schlick-GGX geometry term for a single direction.
#[inline]
pub fn geometry_schlick_ggx(n_dot_x: f32, k: f32) -> f32 {
    let n_dot_x = saturate(n_dot_x);
    n_dot_x / (n_dot_x * (1.0 - k) + k).max(EPSILON)
}

/// `k` remap for analytic (direct) lights.
#[inline]
pub fn direct_k(roughness: f32) -> f32 {
    let r = saturate(roughness) + 1.0;
    r * r / 8.0
}

/// Smith masking-shadowing `G = G1(N.V) * G1(N.L)`.
#[inline]
pub fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    let k = direct_k(roughness);
    geometry_schlick_ggx(n_dot_v, k) * geometry_schlick_ggx(n_dot_l, k)
}

/// Schlick's Fresnel approximation.
#[inline]
pub fn fresnel_schlick(v_dot_h: f32, f0: Vec3) -> Vec3 {
    let m = 1.0 - saturate(v_dot_h);
    let m2 = m * m;
    f0 + (Vec3::ONE - f0) * (m2 * m2 * m)
}

/// The vectors a shading point is evaluated with.
///
/// `n`, `v` (surface to eye) and `l` (surface to light) are unit vectors and
/// `h` is their half vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingVectors {
    pub n: Vec3,
    pub v: Vec3,
    pub l: Vec3,
    pub h: Vec3,
}

impl ShadingVectors {
    /// Build from normal, view and light directions, normalizing each.
    ///
    /// When `v` and `l` cancel out the half vector falls back to the normal.
    pub fn new(n: Vec3, v: Vec3, l: Vec3) -> Self {
        let n = safe_normalize(n, Vec3::Y);
        let v = safe_normalize(v, n);
        let l = safe_normalize(l, n);
        let h = safe_normalize(v + l, n);
        Self { n, v, l, h }
    }

    /// Unclamped N.L, negative when the light is behind the surface.
    pub fn raw_n_dot_l(&self) -> f32 {
        self.n.dot(self.l)
    }

    pub fn n_dot_l(&self) -> f32 {
        saturate(self.n.dot(self.l))
    }

    pub fn n_dot_v(&self) -> f32 {
        saturate(self.n.dot(self.v))
    }

    pub fn n_dot_h(&self) -> f32 {
        saturate(self.n.dot(self.h))
    }

    pub fn v_dot_h(&self) -> f32 {
        saturate(self.v.dot(self.h))
    }
}

/// Intermediate terms of one BRDF evaluation.
#[derive(Debug, Clone, Copy)]
pub struct BrdfTerms {
    /// Normal distribution.
    pub d: f32,
    /// Masking-shadowing.
    pub g: f32,
    /// Fresnel reflectance, also the specular weight `kS`.
    pub f: Vec3,
    /// Diffuse weight `(1 - kS) * (1 - metallic)`.
    pub k_d: Vec3,
    /// Lambertian lobe `kD * albedo / PI`.
    pub diffuse: Vec3,
    /// Specular lobe `D * G * F / (4 (N.V)(N.L))`.
    pub specular: Vec3,
}

impl BrdfTerms {
    /// Total reflectance per unit incoming radiance, before the cosine factor.
    pub fn value(&self) -> Vec3 {
        self.diffuse + self.specular
    }
}

/// Evaluate all BRDF terms. Material parameters are clamped first.
pub fn evaluate_terms(vectors: &ShadingVectors, material: &PbrMaterial) -> BrdfTerms {
    let material = material.clamped();
    let n_dot_v = vectors.n_dot_v();
    let n_dot_l = vectors.n_dot_l();

    let d = distribution_ggx(vectors.n_dot_h(), material.alpha());
    let g = geometry_smith(n_dot_v, n_dot_l, material.roughness);
    let f = fresnel_schlick(vectors.v_dot_h(), material.f0());

    let specular = d * g * f / (4.0 * n_dot_v * n_dot_l).max(EPSILON);
    let k_d = (Vec3::ONE - f) * (1.0 - material.metallic);
    let diffuse = k_d * material.albedo / PI;

    BrdfTerms {
        d,
        g,
        f,
        k_d,
        diffuse,
        specular,
    }
}

/// Outgoing radiance for one light direction: `(diffuse + specular) * radiance * N.L`.
///
/// Exactly zero when the light is at or below the surface horizon.
pub fn cook_torrance(vectors: &ShadingVectors, material: &PbrMaterial, radiance: Vec3) -> Vec3 {
    if vectors.raw_n_dot_l() <= 0.0 {
        return Vec3::ZERO;
    }
    let terms = evaluate_terms(vectors, material);
    let out = terms.value() * radiance.max(Vec3::ZERO) * vectors.n_dot_l();
    if out.is_finite() {
        out
    } else {
        Vec3::ZERO
    }
}
