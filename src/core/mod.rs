//! Core rendering abstractions
//!
//! This module provides the software primitives the renderer is built on:
//! math helpers, CPU textures, render states and triangle rasterization.

pub mod math;
pub mod raster;
pub mod render_states;
pub mod texture;

pub use raster::{rasterize_triangle, Fragment};
pub use render_states::{ClearState, CullState};
pub use texture::{ColorBuffer, DepthBuffer};
