use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use glam::{Mat4, Vec3};
use lustre::{
    Camera, FrameConfig, FrameRenderer, Ground, Light, LightingConfig, Mesh, PbrMaterial,
    PlanarShadowConfig, Projection, Scene, ShadowConfig, ShadowTechnique,
};

const TILE_WIDTH: u32 = 320;
const TILE_HEIGHT: u32 = 240;

/// Grid of equally sized 8-bit RGB tiles written out as one PNG.
struct ContactSheet {
    columns: u32,
    rows: u32,
    pixels: Vec<u8>,
}

impl ContactSheet {
    fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            pixels: vec![0; (columns * TILE_WIDTH * rows * TILE_HEIGHT * 3) as usize],
        }
    }

    fn width(&self) -> u32 {
        self.columns * TILE_WIDTH
    }

    fn height(&self) -> u32 {
        self.rows * TILE_HEIGHT
    }

    fn place(&mut self, column: u32, row: u32, tile: &[u8]) {
        let stride = (TILE_WIDTH * 3) as usize;
        for y in 0..TILE_HEIGHT {
            let src = y as usize * stride;
            let dst = (((row * TILE_HEIGHT + y) * self.width() + column * TILE_WIDTH) * 3) as usize;
            self.pixels[dst..dst + stride].copy_from_slice(&tile[src..src + stride]);
        }
    }

    fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        let mut encoder = png::Encoder::new(&mut writer, self.width(), self.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_source_gamma(png::ScaledFloat::new(1.0 / 2.2));

        let mut writer = encoder
            .write_header()
            .with_context(|| format!("Failed to write PNG header to {}", path.display()))?;
        writer
            .write_image_data(&self.pixels)
            .with_context(|| format!("Failed to write PNG data to {}", path.display()))?;

        log::info!("Wrote {}", path.display());
        Ok(())
    }
}

fn showcase_camera() -> Camera {
    let aspect = TILE_WIDTH as f32 / TILE_HEIGHT as f32;
    let mut camera = Camera::look_at(
        Vec3::ZERO,
        Vec3::ZERO,
        Projection::perspective_degrees(40.0, aspect, 0.1, 100.0),
    );
    camera.orbit(Vec3::new(0.0, 0.8, 0.0), 0.6, 0.5, 7.0);
    camera
}

fn gallery_lights() -> [Light; 4] {
    [
        Light::point(Vec3::new(2.0, 4.0, 2.0), Vec3::ONE, 25.0),
        Light::directional(Vec3::new(-0.6, -1.0, -0.4), Vec3::new(1.0, 0.96, 0.9), 3.0),
        Light::spot_degrees(
            Vec3::new(-1.5, 4.5, 1.5),
            Vec3::new(1.5, -3.5, -1.5),
            22.0,
            8.0,
            Vec3::ONE,
            40.0,
        ),
        Light::area(
            Vec3::new(1.5, 3.5, 1.0),
            Vec3::new(-1.5, -3.5, -1.0),
            2.0,
            1.0,
            Vec3::new(1.0, 0.92, 0.85),
            20.0,
        ),
    ]
}

fn create_renderer() -> anyhow::Result<FrameRenderer> {
    let renderer = FrameRenderer::new(
        FrameConfig {
            width: TILE_WIDTH,
            height: TILE_HEIGHT,
            ..Default::default()
        },
        LightingConfig::default(),
        ShadowConfig {
            resolution: 1024,
            ..Default::default()
        },
        PlanarShadowConfig {
            verbose: true,
            ..Default::default()
        },
    )?;
    Ok(renderer)
}

/// Light type x shadow technique, one tile each.
///
/// The per-tile uniform snapshots go to `gallery_uniforms.bin` in tile order
/// for replaying the gallery in a shader.
fn render_gallery(renderer: &mut FrameRenderer, output: &Path) -> anyhow::Result<()> {
    let techniques = [
        ShadowTechnique::None,
        ShadowTechnique::ShadowMap,
        ShadowTechnique::Planar,
    ];
    let lights = gallery_lights();
    let camera = showcase_camera();
    let mut sheet = ContactSheet::new(lights.len() as u32, techniques.len() as u32);
    let mut snapshots = Vec::new();

    let torus = Mesh::torus(0.8, 0.3, 48, 24);
    let ground = Ground {
        size: 10.0,
        ..Default::default()
    };
    let transform = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)) * Mat4::from_rotation_x(0.7);

    for (row, technique) in techniques.iter().enumerate() {
        renderer.set_technique(*technique);
        for (column, light) in lights.iter().enumerate() {
            let scene = Scene::new(torus.clone(), PbrMaterial::gold(), *light)
                .with_transform(transform)
                .with_ground(ground);
            let stats = renderer.render(&scene, &camera);
            log::debug!(
                "{} / {}: {:?}",
                light.light_type().name(),
                technique.name(),
                stats
            );
            sheet.place(column as u32, row as u32, &renderer.color().to_srgb8());
            snapshots.extend_from_slice(renderer.uniforms(&scene, &camera).as_bytes());
        }
    }

    let uniforms = output.join("gallery_uniforms.bin");
    std::fs::write(&uniforms, &snapshots)
        .with_context(|| format!("Failed to write {}", uniforms.display()))?;
    log::info!("Wrote {} ({} bytes)", uniforms.display(), snapshots.len());

    sheet.save(&output.join("gallery.png"))
}

/// Roughness across, metallic down.
fn render_material_sweep(renderer: &mut FrameRenderer, output: &Path) -> anyhow::Result<()> {
    let roughness = [0.05, 0.25, 0.5, 0.75, 1.0];
    let metallic = [0.0, 1.0];
    let camera = showcase_camera();
    let light = Light::point(Vec3::new(2.5, 4.0, 3.0), Vec3::ONE, 30.0);
    let sphere = Mesh::sphere(1.0, 64, 32);
    let mut sheet = ContactSheet::new(roughness.len() as u32, metallic.len() as u32);

    // Stronger fake reflections so the metal row reads as metal
    renderer.set_lighting(LightingConfig {
        environment_boost: 0.4,
        ..Default::default()
    })?;
    renderer.set_technique(ShadowTechnique::ShadowMap);
    for (row, &m) in metallic.iter().enumerate() {
        for (column, &r) in roughness.iter().enumerate() {
            let material = PbrMaterial::new(Vec3::new(0.95, 0.64, 0.54), r, m);
            let scene = Scene::new(sphere.clone(), material, light);
            renderer.render(&scene, &camera);
            sheet.place(column as u32, row as u32, &renderer.color().to_srgb8());
        }
    }

    sheet.save(&output.join("material_sweep.png"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("renders"));
    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let mut renderer = create_renderer()?;
    render_gallery(&mut renderer, &output)?;
    render_material_sweep(&mut renderer, &output)?;
    Ok(())
}
