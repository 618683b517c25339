//! Triangle rasterization
//!
//! Converts clip-space triangles into fragments using edge functions over the
//! triangle's screen-space bounding box. Pixel centers sit at `+0.5`.

use super::render_states::CullState;
use glam::{Vec2, Vec3, Vec4};

/// A fragment produced by the rasterizer.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    /// Pixel column.
    pub x: u32,
    /// Pixel row (0 at the top).
    pub y: u32,
    /// Interpolated NDC depth in [0, 1].
    pub depth: f32,
    /// Perspective-correct barycentric weights of the three vertices.
    pub barycentric: Vec3,
}

impl Fragment {
    /// Interpolate a per-vertex attribute.
    pub fn interpolate(&self, attributes: [Vec3; 3]) -> Vec3 {
        attributes[0] * self.barycentric.x
            + attributes[1] * self.barycentric.y
            + attributes[2] * self.barycentric.z
    }
}

/// Map an NDC x/y pair to continuous screen coordinates.
#[inline]
pub fn ndc_to_screen(ndc: Vec2, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * width as f32,
        (0.5 - ndc.y * 0.5) * height as f32,
    )
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Rasterize one clip-space triangle into a `width` x `height` target.
///
/// Triangles with any vertex at `w <= 0` are rejected rather than clipped.
/// Fragments outside the [0, 1] depth range are discarded.
pub fn rasterize_triangle<F>(
    clip: [Vec4; 3],
    width: u32,
    height: u32,
    cull: CullState,
    mut fragment: F,
) where
    F: FnMut(Fragment),
{
    if width == 0 || height == 0 {
        return;
    }
    if clip.iter().any(|v| v.w <= 1e-6 || !v.is_finite()) {
        return;
    }

    let ndc = clip.map(|v| v.truncate() / v.w);
    let inv_w = clip.map(|v| 1.0 / v.w);

    let ndc_area = (ndc[1].x - ndc[0].x) * (ndc[2].y - ndc[0].y)
        - (ndc[1].y - ndc[0].y) * (ndc[2].x - ndc[0].x);
    if ndc_area.abs() <= f32::EPSILON || cull.culls(ndc_area) {
        return;
    }

    let screen = ndc.map(|p| ndc_to_screen(p.truncate(), width, height));
    let area = edge(screen[0], screen[1], screen[2]);
    if area.abs() <= f32::EPSILON {
        return;
    }

    let min = screen[0].min(screen[1]).min(screen[2]).floor();
    let max = screen[0].max(screen[1]).max(screen[2]).ceil();
    let x0 = min.x.max(0.0) as u32;
    let y0 = min.y.max(0.0) as u32;
    let x1 = (max.x.min(width as f32)) as u32;
    let y1 = (max.y.min(height as f32)) as u32;

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(screen[1], screen[2], p) / area;
            let w1 = edge(screen[2], screen[0], p) / area;
            let w2 = edge(screen[0], screen[1], p) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            // z/w is affine in screen space
            let depth = w0 * ndc[0].z + w1 * ndc[1].z + w2 * ndc[2].z;
            if !(0.0..=1.0).contains(&depth) {
                continue;
            }

            let perspective = Vec3::new(w0 * inv_w[0], w1 * inv_w[1], w2 * inv_w[2]);
            let sum = perspective.x + perspective.y + perspective.z;
            if sum <= 0.0 {
                continue;
            }

            fragment(Fragment {
                x,
                y,
                depth,
                barycentric: perspective / sum,
            });
        }
    }
}
