//! Materials
//!
//! The PBR material snapshot and the Cook-Torrance BRDF that shades it.

pub mod brdf;
mod pbr;

pub use brdf::{cook_torrance, evaluate_terms, BrdfTerms, ShadingVectors};
pub use pbr::{PbrMaterial, PbrUniform};
