//! Frame orchestration
//!
//! A frame runs in a fixed order:
//!
//! 1. scene bounds and light space, then the depth pass (shadow map only)
//! 2. ground pass, recording which pixels show the ground
//! 3. planar shadow mask, blended once per covered ground pixel (planar only)
//! 4. object pass with Cook-Torrance, shadow factor and ambient

use glam::{Mat3, Mat4, Vec3, Vec4};

use crate::core::{rasterize_triangle, ClearState, ColorBuffer, CullState, DepthBuffer};
use crate::error::{self, Error};
use crate::renderer::geometry::{Aabb, Geometry, Mesh, Plane};
use crate::renderer::light::{Light, LightUniforms};
use crate::renderer::lighting::{shade, LightingConfig, SurfacePoint};
use crate::renderer::material::{PbrMaterial, PbrUniform};
use crate::renderer::shadow::{
    PlanarShadow, PlanarShadowConfig, PlanarShadowUniform, SceneBounds, ShadowConfig, ShadowMap,
    ShadowTechnique, ShadowUniform,
};
use crate::renderer::viewer::{Camera, CameraUniform, Viewer};

/// Ground footprint around the object that receives shadows, in object radii.
const RECEIVER_EXTENT: f32 = 3.0;

/// Frame configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameConfig {
    pub width: u32,
    pub height: u32,
    pub technique: ShadowTechnique,
    /// Background color (linear RGBA).
    pub clear_color: Vec4,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            technique: ShadowTechnique::ShadowMap,
            clear_color: Vec4::new(0.02, 0.02, 0.03, 1.0),
        }
    }
}

impl FrameConfig {
    pub fn validate(&self) -> error::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidFrameSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Horizontal ground quad that receives shadows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ground {
    pub height: f32,
    /// Edge length of the square.
    pub size: f32,
    pub material: PbrMaterial,
}

impl Default for Ground {
    fn default() -> Self {
        Self {
            height: 0.0,
            size: 8.0,
            material: PbrMaterial::new(Vec3::new(0.6, 0.6, 0.6), 0.9, 0.0),
        }
    }
}

impl Ground {
    pub fn plane(&self) -> Plane {
        Plane::horizontal(self.height)
    }

    pub fn mesh(&self) -> Mesh {
        Mesh::quad(self.size, self.size)
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.height, 0.0))
    }
}

/// Everything one frame draws.
#[derive(Debug, Clone)]
pub struct Scene {
    pub object: Mesh,
    /// Object to world transform.
    pub transform: Mat4,
    pub material: PbrMaterial,
    pub light: Light,
    pub ground: Ground,
}

impl Scene {
    /// Object resting on the default ground at the origin.
    pub fn new(object: Mesh, material: PbrMaterial, light: Light) -> Self {
        let lift = -object.aabb().min.y;
        Self {
            object,
            transform: Mat4::from_translation(Vec3::new(0.0, lift, 0.0)),
            material,
            light,
            ground: Ground::default(),
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_ground(mut self, ground: Ground) -> Self {
        self.ground = ground;
        self
    }

    /// World-space bounds of the object.
    pub fn object_bounds(&self) -> Aabb {
        self.object.aabb().transformed(self.transform)
    }

    /// Bounds of the caster plus the patch of ground its shadow can reach.
    pub fn shadow_bounds(&self) -> SceneBounds {
        let object = self.object_bounds();
        let center = object.center();
        let extent = (object.bounding_radius() * RECEIVER_EXTENT).min(self.ground.size * 0.5);
        let footprint = Aabb::new(
            Vec3::new(center.x - extent, self.ground.height, center.z - extent),
            Vec3::new(center.x + extent, self.ground.height, center.z + extent),
        );
        SceneBounds::from_aabb(&object.merge(&footprint))
    }
}

/// Per-pass counters for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub shadow_texels: usize,
    pub ground_fragments: usize,
    pub shadow_mask_pixels: usize,
    pub object_fragments: usize,
}

/// Everything a shader needs to reproduce one frame, in GPU layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub camera: CameraUniform,
    pub light: LightUniforms,
    pub material: PbrUniform,
    pub shadow: ShadowUniform,
    pub planar: PlanarShadowUniform,
}

impl FrameUniforms {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Per-pass shading inputs shared by every fragment.
struct ShadingContext<'a> {
    eye: Vec3,
    light: &'a Light,
    lighting: &'a LightingConfig,
    shadow_map: Option<&'a ShadowMap>,
}

impl ShadingContext<'_> {
    fn shade(&self, position: Vec3, normal: Vec3, material: &PbrMaterial) -> Vec3 {
        let surface = SurfacePoint::new(position, normal);
        let visibility = match self.shadow_map {
            Some(map) => {
                let l = self.light.sample_direct(position).direction;
                map.visibility(position, surface.normal, l)
            }
            None => 1.0,
        };
        shade(&surface, self.eye, material, self.light, visibility, self.lighting)
    }
}

/// Rasterize `geometry` with depth testing and write shaded fragments.
///
/// `shade_fragment` receives the pixel, world position and world normal.
fn draw_surface<G, F>(
    geometry: &G,
    model: Mat4,
    view_projection: Mat4,
    color: &mut ColorBuffer,
    depth: &mut DepthBuffer,
    mut shade_fragment: F,
) -> usize
where
    G: Geometry,
    F: FnMut(u32, u32, Vec3, Vec3) -> Vec3,
{
    let normal_matrix = Mat3::from_mat4(model.inverse().transpose());
    let (width, height) = (color.width(), color.height());
    let mut count = 0;

    for triangle in geometry.triangles() {
        let world = triangle.map(|v| model.transform_point3(v.position()));
        let normals = triangle.map(|v| normal_matrix * v.normal());
        let clip = world.map(|p| view_projection * p.extend(1.0));

        rasterize_triangle(clip, width, height, CullState::None, |frag| {
            if !depth.write_if_closer(frag.x, frag.y, frag.depth) {
                return;
            }
            let position = frag.interpolate(world);
            let normal = frag.interpolate(normals);
            let rgb = shade_fragment(frag.x, frag.y, position, normal);
            color.set(frag.x, frag.y, rgb.extend(1.0));
            count += 1;
        });
    }
    count
}

/// Project the caster onto the ground, mark covered ground pixels, then
/// darken each marked pixel exactly once.
fn blend_planar_shadow(
    planar: &PlanarShadow,
    scene: &Scene,
    view_projection: Mat4,
    ground_positions: &[Option<Vec3>],
    mask: &mut [bool],
    color: &mut ColorBuffer,
) -> usize {
    let projection = planar.projection();
    if !projection.casts() {
        return 0;
    }

    let (width, height) = (color.width(), color.height());
    let flatten = view_projection * projection.matrix * scene.transform;

    for triangle in scene.object.triangles() {
        let clip = triangle.map(|v| flatten * v.position().extend(1.0));
        rasterize_triangle(clip, width, height, CullState::None, |frag| {
            let index = (frag.y * width + frag.x) as usize;
            if ground_positions[index].is_some() {
                mask[index] = true;
            }
        });
    }

    let mut blended = 0;
    for (index, _) in mask.iter().enumerate().filter(|&(_, &covered)| covered) {
        if let Some(position) = ground_positions[index] {
            let (x, y) = (index as u32 % width, index as u32 / width);
            color.blend(x, y, Vec3::ZERO, planar.alpha_at(position));
            blended += 1;
        }
    }
    blended
}

/// Software renderer for one object over a ground plane.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    config: FrameConfig,
    lighting: LightingConfig,
    shadow_map: ShadowMap,
    planar: PlanarShadow,
    color: ColorBuffer,
    depth: DepthBuffer,
    /// World position of the ground under each pixel, if visible.
    ground_positions: Vec<Option<Vec3>>,
    shadow_mask: Vec<bool>,
}

impl FrameRenderer {
    pub fn new(
        config: FrameConfig,
        lighting: LightingConfig,
        shadow: ShadowConfig,
        planar: PlanarShadowConfig,
    ) -> error::Result<Self> {
        config.validate()?;
        lighting.validate()?;
        let pixels = config.width as usize * config.height as usize;
        Ok(Self {
            config,
            lighting,
            shadow_map: ShadowMap::new(shadow)?,
            planar: PlanarShadow::new(planar)?,
            color: ColorBuffer::new(config.width, config.height),
            depth: DepthBuffer::new(config.width, config.height),
            ground_positions: vec![None; pixels],
            shadow_mask: vec![false; pixels],
        })
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    pub fn lighting(&self) -> &LightingConfig {
        &self.lighting
    }

    pub fn set_lighting(&mut self, lighting: LightingConfig) -> error::Result<()> {
        lighting.validate()?;
        self.lighting = lighting;
        Ok(())
    }

    pub fn set_technique(&mut self, technique: ShadowTechnique) {
        self.config.technique = technique;
    }

    /// Reallocate the color and depth targets.
    pub fn resize(&mut self, width: u32, height: u32) -> error::Result<()> {
        let config = FrameConfig {
            width,
            height,
            ..self.config
        };
        config.validate()?;
        self.config = config;
        self.color.resize(width, height);
        self.depth.resize(width, height);
        let pixels = width as usize * height as usize;
        self.ground_positions = vec![None; pixels];
        self.shadow_mask = vec![false; pixels];
        Ok(())
    }

    pub fn color(&self) -> &ColorBuffer {
        &self.color
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn shadow_map(&self) -> &ShadowMap {
        &self.shadow_map
    }

    pub fn planar(&self) -> &PlanarShadow {
        &self.planar
    }

    /// Uniform snapshot of the last rendered frame of `scene`.
    pub fn uniforms(&self, scene: &Scene, camera: &Camera) -> FrameUniforms {
        FrameUniforms {
            camera: CameraUniform::from_viewer(camera),
            light: scene.light.uniforms(),
            material: scene.material.uniform(),
            shadow: self.shadow_map.uniform(),
            planar: self.planar.uniform(),
        }
    }

    fn clear(&mut self, state: ClearState) {
        if let Some(color) = state.color {
            self.color.clear(color);
        }
        if let Some(depth) = state.depth {
            self.depth.clear(depth);
        }
        self.ground_positions.fill(None);
        self.shadow_mask.fill(false);
    }

    /// Render one frame of `scene` as seen by `camera`.
    pub fn render(&mut self, scene: &Scene, camera: &Camera) -> FrameStats {
        let technique = self.config.technique;
        let mut stats = FrameStats::default();
        self.clear(ClearState::color_and_depth(self.config.clear_color, 1.0));

        // Shadow setup
        match technique {
            ShadowTechnique::ShadowMap => {
                self.shadow_map.update(&scene.light, &scene.shadow_bounds());
                stats.shadow_texels = self
                    .shadow_map
                    .render_depth_pass(&[(scene.transform, &scene.object)]);
            }
            ShadowTechnique::Planar => {
                let bounds = scene.object_bounds();
                self.planar.update(
                    &scene.light,
                    &scene.ground.plane(),
                    bounds.center(),
                    bounds.bounding_radius(),
                );
            }
            ShadowTechnique::None => {}
        }

        let view_projection = camera.view_projection_matrix();
        let context = ShadingContext {
            eye: camera.eye(),
            light: &scene.light,
            lighting: &self.lighting,
            shadow_map: (technique == ShadowTechnique::ShadowMap).then_some(&self.shadow_map),
        };

        // Ground
        let width = self.config.width;
        let ground_positions = &mut self.ground_positions;
        stats.ground_fragments = draw_surface(
            &scene.ground.mesh(),
            scene.ground.transform(),
            view_projection,
            &mut self.color,
            &mut self.depth,
            |x, y, position, normal| {
                ground_positions[(y * width + x) as usize] = Some(position);
                context.shade(position, normal, &scene.ground.material)
            },
        );
        tracing::debug!("Ground pass: {} fragments", stats.ground_fragments);

        // Planar shadow mask
        if technique == ShadowTechnique::Planar {
            stats.shadow_mask_pixels = blend_planar_shadow(
                &self.planar,
                scene,
                view_projection,
                &self.ground_positions,
                &mut self.shadow_mask,
                &mut self.color,
            );
            tracing::debug!("Planar shadow pass: {} pixels", stats.shadow_mask_pixels);
        }

        // Object
        stats.object_fragments = draw_surface(
            &scene.object,
            scene.transform,
            view_projection,
            &mut self.color,
            &mut self.depth,
            |_, _, position, normal| context.shade(position, normal, &scene.material),
        );
        tracing::debug!("Object pass: {} fragments", stats.object_fragments);

        stats
    }
}
