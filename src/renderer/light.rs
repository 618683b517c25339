//! Light types
//!
//! A light is a [`LightKind`] plus a color and intensity. Evaluating a light
//! at a surface point yields one or more [`LightSample`]s: a single sample for
//! analytic lights, and a fixed grid of point emitters for area lights.

use glam::{Vec3, Vec4};

use crate::core::math::{orthonormal_basis, safe_normalize, smoothstep, EPSILON};

/// Default area light grid size per side (8 x 8 = 64 samples).
pub const DEFAULT_AREA_GRID: u32 = 8;

/// Largest area light grid size per side. Larger requests are clamped.
pub const MAX_AREA_GRID: u32 = 64;

/// Light type enumeration.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    Point = 0,
    Directional = 1,
    Spot = 2,
    Area = 3,
}

impl LightType {
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn name(&self) -> &'static str {
        match self {
            LightType::Point => "point",
            LightType::Directional => "directional",
            LightType::Spot => "spot",
            LightType::Area => "area",
        }
    }
}

/// Kind-specific light parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Omnidirectional emitter with inverse-square falloff.
    Point {
        /// World-space position.
        position: Vec3,
    },
    /// Infinitely distant emitter.
    Directional {
        /// Direction the light travels (from the light outward).
        direction: Vec3,
    },
    /// Cone-shaped emitter.
    Spot {
        /// World-space position.
        position: Vec3,
        /// Cone axis (from the light outward).
        direction: Vec3,
        /// Angle (radians) inside which the light is at full strength.
        half_angle: f32,
        /// Extra angle (radians) over which the edge fades to zero.
        softness: f32,
    },
    /// Rectangular emitter, integrated over a fixed sample grid.
    Area {
        /// Center of the rectangle.
        position: Vec3,
        /// Emission normal.
        direction: Vec3,
        /// Extent along the tangent.
        width: f32,
        /// Extent along the bitangent.
        height: f32,
    },
}

/// One point-emitter contribution at a surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit direction from the surface toward the emitter (`L`).
    pub direction: Vec3,
    /// Distance to the emitter, infinite for directional lights.
    pub distance: f32,
    /// Falloff factor. For area lights this includes the `1 / samples` weight.
    pub attenuation: f32,
    /// `color * intensity * attenuation`.
    pub radiance: Vec3,
}

/// A light source snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Kind-specific parameters.
    pub kind: LightKind,
    /// Light color (linear RGB in [0, 1]).
    pub color: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
}

/// Inverse-square falloff with a floored denominator.
#[inline]
pub fn inverse_square(distance_sq: f32) -> f32 {
    1.0 / distance_sq.max(EPSILON)
}

/// Spot cone factor for the angle between `L` and the reversed spot axis.
///
/// 1 inside `half_angle`, 0 beyond `half_angle + softness`, and a smoothstep
/// ramp in between.
#[inline]
pub fn spot_cone_factor(cos_theta: f32, half_angle: f32, softness: f32) -> f32 {
    let inner = half_angle.cos();
    let outer = (half_angle + softness.max(0.0)).cos();
    smoothstep(outer, inner, cos_theta)
}

impl Light {
    /// Create a light from its kind, color and intensity.
    pub fn new(kind: LightKind, color: Vec3, intensity: f32) -> Self {
        Self {
            kind,
            color,
            intensity,
        }
    }

    /// Create a point light.
    pub fn point(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self::new(LightKind::Point { position }, color, intensity)
    }

    /// Create a directional light. `direction` points away from the source.
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self::new(
            LightKind::Directional {
                direction: safe_normalize(direction, -Vec3::Y),
            },
            color,
            intensity,
        )
    }

    /// Create a spot light with angles in radians.
    pub fn spot(
        position: Vec3,
        direction: Vec3,
        half_angle: f32,
        softness: f32,
        color: Vec3,
        intensity: f32,
    ) -> Self {
        Self::new(
            LightKind::Spot {
                position,
                direction: safe_normalize(direction, -Vec3::Y),
                half_angle,
                softness,
            },
            color,
            intensity,
        )
    }

    /// Create a spot light with cone angles in degrees.
    pub fn spot_degrees(
        position: Vec3,
        direction: Vec3,
        half_angle_degrees: f32,
        softness_degrees: f32,
        color: Vec3,
        intensity: f32,
    ) -> Self {
        Self::spot(
            position,
            direction,
            half_angle_degrees.to_radians(),
            softness_degrees.to_radians(),
            color,
            intensity,
        )
    }

    /// Create a rectangular area light.
    pub fn area(
        position: Vec3,
        direction: Vec3,
        width: f32,
        height: f32,
        color: Vec3,
        intensity: f32,
    ) -> Self {
        Self::new(
            LightKind::Area {
                position,
                direction: safe_normalize(direction, -Vec3::Y),
                width,
                height,
            },
            color,
            intensity,
        )
    }

    /// Get the light type.
    pub fn light_type(&self) -> LightType {
        match self.kind {
            LightKind::Point { .. } => LightType::Point,
            LightKind::Directional { .. } => LightType::Directional,
            LightKind::Spot { .. } => LightType::Spot,
            LightKind::Area { .. } => LightType::Area,
        }
    }

    /// World position, `None` for directional lights.
    pub fn position(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Point { position }
            | LightKind::Spot { position, .. }
            | LightKind::Area { position, .. } => Some(position),
            LightKind::Directional { .. } => None,
        }
    }

    /// Normalized emission direction, `None` for point lights.
    pub fn direction(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Point { .. } => None,
            LightKind::Directional { direction }
            | LightKind::Spot { direction, .. }
            | LightKind::Area { direction, .. } => Some(safe_normalize(direction, -Vec3::Y)),
        }
    }

    /// Homogeneous light coordinate.
    ///
    /// Positional lights give `(position, 1)`. Directional lights give the
    /// point at infinity `(-direction, 0)` toward the source.
    pub fn homogeneous(&self) -> Vec4 {
        match self.kind {
            LightKind::Directional { direction } => {
                safe_normalize(-direction, Vec3::Y).extend(0.0)
            }
            LightKind::Point { position }
            | LightKind::Spot { position, .. }
            | LightKind::Area { position, .. } => position.extend(1.0),
        }
    }

    /// Unattenuated radiance `color * intensity`. Negative intensity emits nothing.
    pub fn radiance(&self) -> Vec3 {
        self.color.max(Vec3::ZERO) * self.intensity.max(0.0)
    }

    /// Number of samples [`Light::sample`] yields for a given area grid.
    pub fn sample_count(&self, area_grid: u32) -> u32 {
        match self.kind {
            LightKind::Area { .. } => {
                let grid = area_grid.clamp(1, MAX_AREA_GRID);
                grid * grid
            }
            _ => 1,
        }
    }

    /// Evaluate the light at `point`.
    ///
    /// Area lights yield `area_grid * area_grid` samples with the grid clamped
    /// to `1..=MAX_AREA_GRID`. Every other kind yields exactly one.
    pub fn sample(&self, point: Vec3, area_grid: u32) -> LightSamples<'_> {
        LightSamples {
            light: self,
            point,
            grid: area_grid.clamp(1, MAX_AREA_GRID),
            next: 0,
            total: self.sample_count(area_grid),
        }
    }

    /// Single sample for analytic lights. Area lights return their center as
    /// an unweighted point emitter.
    pub fn sample_direct(&self, point: Vec3) -> LightSample {
        let (direction, distance, attenuation) = match self.kind {
            LightKind::Directional { direction } => {
                (safe_normalize(-direction, Vec3::Y), f32::INFINITY, 1.0)
            }
            LightKind::Point { position } | LightKind::Area { position, .. } => {
                let to_light = position - point;
                let distance = to_light.length();
                (
                    safe_normalize(to_light, Vec3::Y),
                    distance,
                    inverse_square(distance * distance),
                )
            }
            LightKind::Spot {
                position,
                direction,
                half_angle,
                softness,
            } => {
                let to_light = position - point;
                let distance = to_light.length();
                let l = safe_normalize(to_light, Vec3::Y);
                let cos_theta = l.dot(safe_normalize(-direction, Vec3::Y));
                let cone = spot_cone_factor(cos_theta, half_angle, softness);
                (l, distance, inverse_square(distance * distance) * cone)
            }
        };

        LightSample {
            direction,
            distance,
            attenuation,
            radiance: self.radiance() * attenuation,
        }
    }

    /// One cell of the area light quadrature grid.
    fn area_sample(&self, point: Vec3, index: u32, grid: u32) -> LightSample {
        let LightKind::Area {
            position,
            direction,
            width,
            height,
        } = self.kind
        else {
            return self.sample_direct(point);
        };

        let normal = safe_normalize(direction, -Vec3::Y);
        let (tangent, bitangent) = orthonormal_basis(normal);
        let count = (grid * grid) as f32;

        // Cell centers spanning [-extent/2, extent/2]
        let i = index % grid;
        let j = index / grid;
        let s = (i as f32 + 0.5) / grid as f32 - 0.5;
        let t = (j as f32 + 0.5) / grid as f32 - 0.5;
        let emitter = position + tangent * (s * width) + bitangent * (t * height);

        let to_light = emitter - point;
        let distance = to_light.length();
        let l = safe_normalize(to_light, normal);
        let cos_theta = normal.dot(-l);

        let attenuation = if cos_theta > 0.0 {
            cos_theta * inverse_square(distance * distance) / count
        } else {
            0.0
        };

        LightSample {
            direction: l,
            distance,
            attenuation,
            radiance: self.radiance() * attenuation,
        }
    }

    /// Get the light uniforms for GPU.
    pub fn uniforms(&self) -> LightUniforms {
        let direction = self.direction().unwrap_or(Vec3::ZERO);
        let params = match self.kind {
            LightKind::Spot {
                half_angle,
                softness,
                ..
            } => [
                half_angle.cos(),
                (half_angle + softness.max(0.0)).cos(),
                0.0,
                0.0,
            ],
            LightKind::Area { width, height, .. } => [0.0, 0.0, width, height],
            _ => [0.0; 4],
        };

        LightUniforms {
            position_or_direction: self.homogeneous().to_array(),
            direction: direction.extend(self.light_type().as_u32() as f32).to_array(),
            color_intensity: self.color.extend(self.intensity).to_array(),
            params,
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::point(Vec3::new(2.0, 4.0, 2.0), Vec3::ONE, 20.0)
    }
}

/// Iterator over the samples of one light at one surface point.
#[derive(Debug, Clone)]
pub struct LightSamples<'a> {
    light: &'a Light,
    point: Vec3,
    grid: u32,
    next: u32,
    total: u32,
}

impl Iterator for LightSamples<'_> {
    type Item = LightSample;

    fn next(&mut self) -> Option<LightSample> {
        if self.next >= self.total {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(match self.light.kind {
            LightKind::Area { .. } => self.light.area_sample(self.point, index, self.grid),
            _ => self.light.sample_direct(self.point),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LightSamples<'_> {}

/// Light uniform data for GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniforms {
    /// Homogeneous light coordinate (w = 0 for directional, 1 otherwise).
    pub position_or_direction: [f32; 4],
    /// Emission direction (xyz) and light type (w).
    pub direction: [f32; 4],
    /// Light color and intensity (rgb = color, a = intensity).
    pub color_intensity: [f32; 4],
    /// Spot: (inner_cos, outer_cos, -, -). Area: (-, -, width, height).
    pub params: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(light: &Light, point: Vec3) -> LightSample {
        let samples: Vec<_> = light.sample(point, DEFAULT_AREA_GRID).collect();
        assert_eq!(samples.len(), 1);
        samples[0]
    }

    #[test]
    fn test_directional_attenuation_is_one() {
        let light = Light::directional(Vec3::new(0.3, -1.0, 0.2), Vec3::ONE, 2.0);
        for point in [Vec3::ZERO, Vec3::splat(100.0), Vec3::new(-1e4, 3.0, 7.0)] {
            let sample = single(&light, point);
            assert_eq!(sample.attenuation, 1.0);
            assert!((sample.direction - -Vec3::new(0.3, -1.0, 0.2).normalize()).length() < 1e-6);
            assert_eq!(sample.radiance, Vec3::splat(2.0));
            assert!(sample.distance.is_infinite());
        }
    }

    #[test]
    fn test_point_inverse_square() {
        let light = Light::point(Vec3::new(0.0, 1.0, 0.0), Vec3::ONE, 1.0);
        let at_one = single(&light, Vec3::ZERO);
        assert!((at_one.attenuation - 1.0).abs() < 1e-6);
        assert_eq!(at_one.direction, Vec3::Y);

        let at_two = single(&light, Vec3::new(0.0, -1.0, 0.0));
        assert!((at_two.attenuation - 0.25).abs() < 1e-6);
        assert!((at_two.distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_at_light_is_finite() {
        let light = Light::point(Vec3::ONE, Vec3::ONE, 1.0);
        let sample = single(&light, Vec3::ONE);
        assert!(sample.attenuation.is_finite());
        assert!(sample.direction.is_normalized());
    }

    #[test]
    fn test_spot_cone() {
        let light = Light::spot_degrees(
            Vec3::new(0.0, 1.0, 0.0),
            -Vec3::Y,
            20.0,
            10.0,
            Vec3::ONE,
            1.0,
        );

        // On axis, distance 1: full strength
        let center = single(&light, Vec3::ZERO);
        assert!((center.attenuation - 1.0).abs() < 1e-5);

        // 40 degrees off axis: outside the outer cone
        let off = 40f32.to_radians().tan();
        let outside = single(&light, Vec3::new(off, 0.0, 0.0));
        assert_eq!(outside.attenuation, 0.0);

        // Inside the inner cone only inverse-square applies
        let inner = 10f32.to_radians().tan();
        let p = Vec3::new(inner, 0.0, 0.0);
        let sample = single(&light, p);
        let d2 = (Vec3::Y - p).length_squared();
        assert!((sample.attenuation - 1.0 / d2).abs() < 1e-5);
    }

    #[test]
    fn test_spot_ramp_is_monotonic() {
        let mut previous = f32::INFINITY;
        for step in 0..=40 {
            let degrees = 15.0 + step as f32 * 0.5;
            let factor = spot_cone_factor(
                degrees.to_radians().cos(),
                20f32.to_radians(),
                10f32.to_radians(),
            );
            assert!(factor <= previous + 1e-6);
            assert!((0.0..=1.0).contains(&factor));
            previous = factor;
        }
        let half = 20f32.to_radians();
        let soft = 10f32.to_radians();
        assert_eq!(spot_cone_factor(35f32.to_radians().cos(), half, soft), 0.0);
        assert_eq!(spot_cone_factor(15f32.to_radians().cos(), half, soft), 1.0);
    }

    #[test]
    fn test_area_sample_count() {
        let light = Light::area(Vec3::Y * 2.0, -Vec3::Y, 1.0, 1.0, Vec3::ONE, 1.0);
        assert_eq!(light.sample(Vec3::ZERO, 8).len(), 64);
        assert_eq!(light.sample(Vec3::ZERO, 1).count(), 1);
        assert_eq!(light.sample(Vec3::ZERO, 0).count(), 1);
    }

    #[test]
    fn test_area_grid_is_clamped() {
        let light = Light::area(Vec3::Y * 2.0, -Vec3::Y, 1.0, 1.0, Vec3::ONE, 1.0);
        let max = MAX_AREA_GRID * MAX_AREA_GRID;
        assert_eq!(light.sample_count(70_000), max);
        assert_eq!(light.sample(Vec3::ZERO, u32::MAX).len(), max as usize);

        // Weights still sum as for the largest grid
        let clamped: f32 = light.sample(Vec3::ZERO, 70_000).map(|s| s.attenuation).sum();
        let largest: f32 = light.sample(Vec3::ZERO, MAX_AREA_GRID).map(|s| s.attenuation).sum();
        assert!((clamped - largest).abs() < 1e-6);
    }

    #[test]
    fn test_zero_size_area_matches_point() {
        let position = Vec3::new(0.0, 2.0, 0.0);
        let area = Light::area(position, -Vec3::Y, 0.0, 0.0, Vec3::ONE, 3.0);
        let point = Light::point(position, Vec3::ONE, 3.0);

        // Directly below, the emitter faces the surface so cos = 1
        let p = Vec3::ZERO;
        let expected = single(&point, p).radiance;
        for grid in [1, 4, 8] {
            let total: Vec3 = area.sample(p, grid).map(|s| s.radiance).sum();
            assert!((total - expected).length() < 1e-5, "grid {}: {:?}", grid, total);
        }
    }

    #[test]
    fn test_area_back_side_is_dark() {
        let light = Light::area(Vec3::Y * 2.0, Vec3::Y, 1.0, 1.0, Vec3::ONE, 1.0);
        let total: f32 = light.sample(Vec3::ZERO, 4).map(|s| s.attenuation).sum();
        assert_eq!(total, 0.0);
    }

    #[test]
    fn test_area_samples_span_rectangle() {
        // Emitting down: tangent runs along Z (width), bitangent along X (height)
        let light = Light::area(Vec3::ZERO, -Vec3::Y, 2.0, 4.0, Vec3::ONE, 1.0);
        let p = Vec3::new(0.0, -1.0, 0.0);
        let emitters: Vec<Vec3> = light
            .sample(p, 2)
            .map(|s| p + s.direction * s.distance)
            .collect();
        assert_eq!(emitters.len(), 4);
        for e in &emitters {
            assert!(e.y.abs() < 1e-5);
            assert!((e.x.abs() - 1.0).abs() < 1e-5, "{:?}", e);
            assert!((e.z.abs() - 0.5).abs() < 1e-5, "{:?}", e);
        }
    }

    #[test]
    fn test_homogeneous() {
        let point = Light::point(Vec3::new(1.0, 2.0, 3.0), Vec3::ONE, 1.0);
        assert_eq!(point.homogeneous(), Vec4::new(1.0, 2.0, 3.0, 1.0));

        let sun = Light::directional(Vec3::new(0.0, -2.0, 0.0), Vec3::ONE, 1.0);
        assert_eq!(sun.homogeneous(), Vec4::new(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn test_negative_intensity_emits_nothing() {
        let light = Light::point(Vec3::Y, Vec3::ONE, -5.0);
        assert_eq!(light.radiance(), Vec3::ZERO);
    }

    #[test]
    fn test_uniforms() {
        assert_eq!(std::mem::size_of::<LightUniforms>(), 64);
        let light = Light::spot(Vec3::Y, -Vec3::Y, 0.5, 0.1, Vec3::ONE, 4.0);
        let u = light.uniforms();
        assert_eq!(u.direction[3], LightType::Spot.as_u32() as f32);
        assert_eq!(u.color_intensity[3], 4.0);
        assert!((u.params[0] - 0.5f32.cos()).abs() < 1e-6);
        assert!((u.params[1] - 0.6f32.cos()).abs() < 1e-6);
    }
}
