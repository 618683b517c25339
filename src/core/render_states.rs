//! Render state configurations
//!
//! Small value types describing how a pass treats its targets.

use glam::Vec4;

/// Clear state for render targets.
#[derive(Debug, Clone, Copy)]
pub struct ClearState {
    /// Color to clear to (linear RGBA), or None to not clear.
    pub color: Option<Vec4>,
    /// Depth value to clear to (0.0-1.0), or None to not clear.
    pub depth: Option<f32>,
}

impl ClearState {
    /// Create a clear state that clears both color and depth.
    pub fn color_and_depth(color: Vec4, depth: f32) -> Self {
        Self {
            color: Some(color),
            depth: Some(depth),
        }
    }
}

impl Default for ClearState {
    fn default() -> Self {
        Self::color_and_depth(Vec4::new(0.0, 0.0, 0.0, 1.0), 1.0)
    }
}

/// Face culling mode.
///
/// Front faces wind counter-clockwise in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullState {
    /// Rasterize both faces.
    #[default]
    None,
    /// Discard back faces.
    Back,
    /// Discard front faces.
    Front,
}

impl CullState {
    /// Whether a triangle with the given signed NDC area is discarded.
    pub fn culls(&self, signed_area: f32) -> bool {
        match self {
            CullState::None => false,
            CullState::Back => signed_area < 0.0,
            CullState::Front => signed_area > 0.0,
        }
    }
}
