//! Shadow mapping module
//!
//! Two techniques are provided: a depth map rendered from the light and
//! filtered with PCF, and a planar projection that flattens the caster onto a
//! ground plane.

mod light_space;
mod pcf;
mod planar;

pub use light_space::{build_light_space_matrix, LightSpace, SceneBounds};
pub use pcf::{compute_shadow_factor, sample_pcf, shadow_factor_at, slope_scaled_bias};
pub use planar::{
    build_planar_shadow_matrix, estimate_shadow_radius, soft_edge_alpha, PlanarShadow,
    PlanarShadowConfig, PlanarShadowMatrix, PlanarShadowUniform,
};

use glam::{Mat4, Vec3, Vec4};

use crate::core::{rasterize_triangle, CullState, DepthBuffer};
use crate::error::{self, Error};
use crate::renderer::geometry::Geometry;
use crate::renderer::light::Light;

/// Largest accepted shadow map resolution.
pub const MAX_SHADOW_RESOLUTION: u32 = 8192;

/// Largest accepted PCF radius (17 x 17 taps).
pub const MAX_PCF_RADIUS: u32 = 8;

/// How shadows are produced for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowTechnique {
    /// No shadows.
    None,
    /// Depth map from the light, filtered with PCF.
    #[default]
    ShadowMap,
    /// Caster projected onto the ground plane.
    Planar,
}

impl ShadowTechnique {
    pub fn name(&self) -> &'static str {
        match self {
            ShadowTechnique::None => "none",
            ShadowTechnique::ShadowMap => "shadow_map",
            ShadowTechnique::Planar => "planar",
        }
    }
}

/// Shadow map configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowConfig {
    /// Shadow map resolution (width and height).
    pub resolution: u32,
    /// Constant depth bias, scaled by the surface slope at lookup time.
    pub bias: f32,
    /// PCF kernel radius (1 = 3x3, 2 = 5x5, etc.).
    pub pcf_radius: u32,
    /// Log per-pass shadow diagnostics.
    pub verbose: bool,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            resolution: 2048,
            bias: 0.005,
            pcf_radius: 2,
            verbose: false,
        }
    }
}

impl ShadowConfig {
    /// Check that every field is in range.
    pub fn validate(&self) -> error::Result<()> {
        if self.resolution == 0 || self.resolution > MAX_SHADOW_RESOLUTION {
            return Err(Error::InvalidShadowResolution {
                resolution: self.resolution,
                max: MAX_SHADOW_RESOLUTION,
            });
        }
        if self.pcf_radius > MAX_PCF_RADIUS {
            return Err(Error::InvalidPcfRadius {
                radius: self.pcf_radius,
                max: MAX_PCF_RADIUS,
            });
        }
        error::non_negative("bias", self.bias)
    }

    /// Number of depth comparisons per lookup.
    pub fn pcf_taps(&self) -> u32 {
        let side = 2 * self.pcf_radius + 1;
        side * side
    }
}

/// Shadow map for a single light source.
#[derive(Debug, Clone)]
pub struct ShadowMap {
    depth: DepthBuffer,
    light_space: LightSpace,
    config: ShadowConfig,
}

impl ShadowMap {
    /// Create a new shadow map. The depth buffer starts at the far plane.
    pub fn new(config: ShadowConfig) -> error::Result<Self> {
        config.validate()?;
        tracing::debug!(
            "Creating {}x{} shadow map ({} KiB, {} PCF taps)",
            config.resolution,
            config.resolution,
            depth_bytes(config.resolution) / 1024,
            config.pcf_taps()
        );
        Ok(Self {
            depth: DepthBuffer::new(config.resolution, config.resolution),
            light_space: LightSpace::default(),
            config,
        })
    }

    /// Get the shadow configuration.
    pub fn config(&self) -> &ShadowConfig {
        &self.config
    }

    /// Reallocate the depth buffer at a new resolution.
    pub fn resize(&mut self, resolution: u32) -> error::Result<()> {
        let config = ShadowConfig {
            resolution,
            ..self.config
        };
        config.validate()?;
        if resolution != self.config.resolution {
            tracing::info!(
                "Resizing shadow map {} -> {} ({} KiB)",
                self.config.resolution,
                resolution,
                depth_bytes(resolution) / 1024
            );
            self.depth.resize(resolution, resolution);
        }
        self.config = config;
        Ok(())
    }

    /// Get the depth buffer.
    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Get the light space transform used by the last depth pass.
    pub fn light_space(&self) -> &LightSpace {
        &self.light_space
    }

    /// Get the light matrix (world to light clip space).
    pub fn light_matrix(&self) -> Mat4 {
        self.light_space.matrix
    }

    /// Frame the scene from `light` and reset the depth buffer.
    pub fn update(&mut self, light: &Light, bounds: &SceneBounds) {
        self.light_space = build_light_space_matrix(light, bounds);
        self.depth.clear(1.0);
    }

    /// Render depth for a list of casters into the map.
    ///
    /// Returns the number of texels written.
    pub fn render_depth_pass<G: Geometry>(&mut self, objects: &[(Mat4, &G)]) -> usize {
        let resolution = self.config.resolution;
        let light_matrix = self.light_space.matrix;
        let depth = &mut self.depth;
        let mut written = 0;

        for (model, geometry) in objects {
            let mvp = light_matrix * *model;
            for triangle in geometry.triangles() {
                let clip = triangle.map(|v| mvp * v.position().extend(1.0));
                rasterize_triangle(clip, resolution, resolution, CullState::None, |frag| {
                    if depth.write_if_closer(frag.x, frag.y, frag.depth) {
                        written += 1;
                    }
                });
            }
        }

        if self.config.verbose {
            tracing::debug!(
                "Shadow depth pass: {} casters, {} texels written, {} taps per lookup",
                objects.len(),
                written,
                self.config.pcf_taps()
            );
        }
        written
    }

    /// Transform a world position into light clip space.
    pub fn project(&self, world: Vec3) -> Vec4 {
        self.light_space.matrix * world.extend(1.0)
    }

    /// Visibility of a world position with normal `n` and light direction `l`.
    pub fn visibility(&self, world: Vec3, n: Vec3, l: Vec3) -> f32 {
        compute_shadow_factor(self, self.project(world), n, l)
    }

    /// Size of the depth buffer in bytes.
    pub fn memory_bytes(&self) -> u64 {
        depth_bytes(self.config.resolution)
    }

    /// Get the shadow uniform data for shaders.
    pub fn uniform(&self) -> ShadowUniform {
        ShadowUniform {
            light_matrix: self.light_space.matrix.to_cols_array_2d(),
            bias: self.config.bias,
            pcf_radius: self.config.pcf_radius as f32,
            shadow_map_size: self.config.resolution as f32,
            _padding: 0.0,
        }
    }
}

fn depth_bytes(resolution: u32) -> u64 {
    (resolution as u64) * (resolution as u64) * 4
}

/// Shadow uniform data for GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowUniform {
    /// Light space matrix (world to light clip space).
    pub light_matrix: [[f32; 4]; 4],
    /// Constant depth bias.
    pub bias: f32,
    /// PCF kernel radius.
    pub pcf_radius: f32,
    /// Shadow map size (for texel size calculation).
    pub shadow_map_size: f32,
    /// Padding.
    pub _padding: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::geometry::Mesh;

    fn small_config() -> ShadowConfig {
        ShadowConfig {
            resolution: 64,
            ..Default::default()
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = ShadowConfig::default();
        assert_eq!(config.resolution, 2048);
        assert_eq!(config.pcf_taps(), 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let zero = ShadowConfig {
            resolution: 0,
            ..Default::default()
        };
        assert_eq!(
            zero.validate(),
            Err(Error::InvalidShadowResolution {
                resolution: 0,
                max: MAX_SHADOW_RESOLUTION
            })
        );

        let wide = ShadowConfig {
            pcf_radius: 9,
            ..Default::default()
        };
        assert!(matches!(
            wide.validate(),
            Err(Error::InvalidPcfRadius { radius: 9, .. })
        ));

        let negative = ShadowConfig {
            bias: -0.1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());
        assert!(ShadowMap::new(negative).is_err());
    }

    #[test]
    fn test_resize() {
        let mut map = ShadowMap::new(small_config()).unwrap();
        assert_eq!(map.depth().width(), 64);
        map.resize(128).unwrap();
        assert_eq!(map.depth().width(), 128);
        assert_eq!(map.uniform().shadow_map_size, 128.0);
        assert_eq!(map.memory_bytes(), 128 * 128 * 4);
        assert!(map.resize(0).is_err());
        assert_eq!(map.depth().width(), 128);
    }

    #[test]
    fn test_depth_pass_writes_caster() {
        let mut map = ShadowMap::new(small_config()).unwrap();
        let light = Light::directional(-Vec3::Y, Vec3::ONE, 1.0);
        let cube = Mesh::cube(1.0);
        map.update(&light, &SceneBounds::new(Vec3::ZERO, 2.0));

        let written = map.render_depth_pass(&[(Mat4::IDENTITY, &cube)]);
        assert!(written > 0);
        assert!(map.depth().as_slice().iter().any(|&d| d < 1.0));

        // Below the cube is occluded, beside it is not
        assert!(map.visibility(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, Vec3::Y) < 1.0);
        assert_eq!(map.visibility(Vec3::new(1.8, -1.0, 0.0), Vec3::Y, Vec3::Y), 1.0);
    }

    #[test]
    fn test_update_clears_previous_frame() {
        let mut map = ShadowMap::new(small_config()).unwrap();
        let light = Light::directional(-Vec3::Y, Vec3::ONE, 1.0);
        let cube = Mesh::cube(1.0);
        let bounds = SceneBounds::new(Vec3::ZERO, 2.0);
        map.update(&light, &bounds);
        map.render_depth_pass(&[(Mat4::IDENTITY, &cube)]);

        map.update(&light, &bounds);
        assert!(map.depth().as_slice().iter().all(|&d| d == 1.0));
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<ShadowUniform>(), 80);
        let map = ShadowMap::new(ShadowConfig::default()).unwrap();
        let uniform = map.uniform();
        assert_eq!(uniform.pcf_radius, 2.0);
        assert_eq!(uniform.bias, 0.005);
    }

    #[test]
    fn test_technique_default() {
        assert_eq!(ShadowTechnique::default(), ShadowTechnique::ShadowMap);
        assert_eq!(ShadowTechnique::Planar.name(), "planar");
    }
}
