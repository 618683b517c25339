//! High-level rendering
//!
//! Cameras, geometry, materials, lights, shadows and the frame orchestrator.

pub mod frame;
pub mod geometry;
pub mod light;
pub mod lighting;
pub mod material;
pub mod shadow;
pub mod viewer;

pub use frame::{FrameConfig, FrameRenderer, FrameStats, FrameUniforms, Ground, Scene};
pub use geometry::{Aabb, Geometry, Mesh, Plane, Vertex};
pub use light::{Light, LightKind, LightSample, LightType, LightUniforms};
pub use lighting::{ambient, evaluate_direct_lighting, shade, LightingConfig, SurfacePoint};
pub use material::{cook_torrance, BrdfTerms, PbrMaterial, PbrUniform, ShadingVectors};
pub use shadow::{
    build_light_space_matrix, build_planar_shadow_matrix, compute_shadow_factor, LightSpace,
    PlanarShadow, PlanarShadowConfig, PlanarShadowMatrix, PlanarShadowUniform, SceneBounds,
    ShadowConfig, ShadowMap, ShadowTechnique, ShadowUniform,
};
pub use viewer::{Camera, CameraUniform, Projection, Viewer};
