//! CPU texture abstractions
//!
//! Provides a depth buffer for shadow maps and depth testing, and a linear
//! color buffer for the main pass.

use glam::{Vec3, Vec4};

/// Single-channel depth buffer with values in [0, 1].
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl DepthBuffer {
    /// Create a new depth buffer cleared to the far plane.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![1.0; width as usize * height as usize],
        }
    }

    /// Get the width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate storage for a new size. Contents are reset to the far plane.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width as usize * height as usize, 1.0);
    }

    /// Fill every texel with `depth`.
    pub fn clear(&mut self, depth: f32) {
        self.data.fill(depth);
    }

    /// Read the depth at a texel. Out-of-range coordinates clamp to the edge.
    pub fn sample(&self, x: i32, y: i32) -> f32 {
        if self.data.is_empty() {
            return 1.0;
        }
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        self.data[y * self.width as usize + x]
    }

    /// Read the depth at an in-range texel.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Overwrite a texel unconditionally.
    pub fn set(&mut self, x: u32, y: u32, depth: f32) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = depth;
        }
    }

    /// Store `depth` if it is closer than the current value (less-equal test).
    ///
    /// Returns whether the write happened.
    pub fn write_if_closer(&mut self, x: u32, y: u32, depth: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let texel = &mut self.data[(y * self.width + x) as usize];
        if depth <= *texel {
            *texel = depth;
            true
        } else {
            false
        }
    }

    /// Raw texel data in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Linear RGBA color buffer.
#[derive(Debug, Clone)]
pub struct ColorBuffer {
    width: u32,
    height: u32,
    data: Vec<Vec4>,
}

impl ColorBuffer {
    /// Create a new color buffer cleared to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![Vec4::ZERO; width as usize * height as usize],
        }
    }

    /// Get the width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the aspect ratio.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Reallocate storage for a new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width as usize * height as usize, Vec4::ZERO);
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Vec4) {
        self.data.fill(color);
    }

    /// Read a pixel.
    pub fn get(&self, x: u32, y: u32) -> Option<Vec4> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Write a pixel.
    pub fn set(&mut self, x: u32, y: u32, color: Vec4) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = color;
        }
    }

    /// Blend `color` over the existing pixel with the given coverage.
    pub fn blend(&mut self, x: u32, y: u32, color: Vec3, alpha: f32) {
        if x < self.width && y < self.height {
            let texel = &mut self.data[(y * self.width + x) as usize];
            let rgb = texel.truncate() * (1.0 - alpha) + color * alpha;
            *texel = rgb.extend(texel.w);
        }
    }

    /// Raw pixel data in row-major order.
    pub fn as_slice(&self) -> &[Vec4] {
        &self.data
    }

    /// Convert to 8-bit sRGB triples.
    ///
    /// HDR values are compressed with Reinhard (`c / (1 + c)`) before a 2.2 gamma.
    pub fn to_srgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 3);
        for pixel in &self.data {
            let mapped = pixel.truncate().max(Vec3::ZERO);
            let mapped = mapped / (Vec3::ONE + mapped);
            let mapped = mapped.powf(1.0 / 2.2);
            for c in mapped.to_array() {
                bytes.push((c * 255.0 + 0.5).clamp(0.0, 255.0) as u8);
            }
        }
        bytes
    }
}
