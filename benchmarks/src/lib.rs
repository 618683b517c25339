//! Shared setup helpers for lustre benchmarks.
//!
//! ## Running
//!
//! Per-fragment shading (criterion):
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench shading
//!
//! Whole frames (criterion):
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench frame
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench shading -- pcf

use glam::{Mat4, Vec3};
use lustre::{
    Camera, FrameConfig, FrameRenderer, Light, LightingConfig, Mesh, PbrMaterial,
    PlanarShadowConfig, Projection, Scene, SceneBounds, ShadowConfig, ShadowMap,
    ShadowTechnique, SurfacePoint,
};

/// Deterministic shading points on the upper hemisphere of a unit sphere.
pub fn surface_points(n: usize) -> Vec<SurfacePoint> {
    let golden = std::f32::consts::PI * (3.0 - 5f32.sqrt());
    (0..n)
        .map(|i| {
            let y = 1.0 - (i as f32 + 0.5) / n as f32;
            let r = (1.0 - y * y).sqrt();
            let phi = golden * i as f32;
            let normal = Vec3::new(r * phi.cos(), y, r * phi.sin());
            SurfacePoint::new(normal, normal)
        })
        .collect()
}

/// One light of each kind, labelled.
pub fn lights() -> Vec<(&'static str, Light)> {
    vec![
        ("point", Light::point(Vec3::new(2.0, 4.0, 2.0), Vec3::ONE, 20.0)),
        ("directional", Light::directional(Vec3::new(-0.5, -1.0, -0.3), Vec3::ONE, 3.0)),
        (
            "spot",
            Light::spot_degrees(Vec3::new(0.0, 4.0, 0.0), -Vec3::Y, 30.0, 10.0, Vec3::ONE, 30.0),
        ),
        (
            "area",
            Light::area(Vec3::new(0.0, 3.0, 0.0), -Vec3::Y, 1.0, 1.0, Vec3::ONE, 15.0),
        ),
    ]
}

/// Shadow map holding a unit sphere lit from above.
pub fn occluded_shadow_map(resolution: u32, pcf_radius: u32) -> ShadowMap {
    let mut map = ShadowMap::new(ShadowConfig {
        resolution,
        pcf_radius,
        ..Default::default()
    })
    .expect("valid shadow config");
    let light = Light::directional(Vec3::new(0.3, -1.0, 0.2), Vec3::ONE, 1.0);
    map.update(&light, &SceneBounds::new(Vec3::ZERO, 3.0));
    let sphere = Mesh::sphere(1.0, 32, 16);
    map.render_depth_pass(&[(Mat4::from_translation(Vec3::Y), &sphere)]);
    map
}

/// Sphere on the default ground.
pub fn showcase_scene(light: Light) -> Scene {
    Scene::new(Mesh::sphere(1.0, 48, 24), PbrMaterial::gold(), light)
}

pub fn showcase_camera(width: u32, height: u32) -> Camera {
    let mut camera = Camera::look_at(
        Vec3::ZERO,
        Vec3::ZERO,
        Projection::perspective_degrees(40.0, width as f32 / height as f32, 0.1, 100.0),
    );
    camera.orbit(Vec3::new(0.0, 0.8, 0.0), 0.6, 0.5, 7.0);
    camera
}

pub fn renderer(width: u32, height: u32, technique: ShadowTechnique) -> FrameRenderer {
    FrameRenderer::new(
        FrameConfig {
            width,
            height,
            technique,
            ..Default::default()
        },
        LightingConfig::default(),
        ShadowConfig {
            resolution: 1024,
            ..Default::default()
        },
        PlanarShadowConfig::default(),
    )
    .expect("valid frame config")
}
