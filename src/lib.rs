//! lustre
//!
//! A software renderer for a single object under Cook-Torrance shading with
//! shadow-mapped or planar shadows, built on glam.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **core** - CPU render targets, render states and triangle rasterization
//! 2. **renderer** - High-level rendering (cameras, geometry, materials, lights, shadows)
//! 3. **error** - Configuration errors
//!
//! Shading is pure per fragment: [`evaluate_direct_lighting`] sums the BRDF
//! over a light's samples, [`compute_shadow_factor`] filters the shadow map,
//! and [`FrameRenderer`] runs the depth, ground, planar and object passes.

pub mod core;
pub mod error;
pub mod renderer;

// Re-export commonly used types
pub use crate::core::{ClearState, ColorBuffer, CullState, DepthBuffer};

pub use error::{Error, Result};

pub use renderer::{
    build_light_space_matrix, build_planar_shadow_matrix, compute_shadow_factor,
    evaluate_direct_lighting, Aabb, Camera, FrameConfig, FrameRenderer, FrameStats, FrameUniforms,
    Geometry, Ground, Light, LightKind, LightSpace, LightType, LightingConfig, Mesh, PbrMaterial,
    PlanarShadowConfig, PlanarShadowMatrix, Plane, Projection, Scene, SceneBounds, ShadowConfig,
    ShadowMap, ShadowTechnique, SurfacePoint, Viewer,
};

// Re-export glam for convenience
pub use glam;
