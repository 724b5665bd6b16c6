//! Core types for the rasterizer

use super::math::Vec3;
use serde::{Deserialize, Serialize};

// =============================================================================
// Color
// =============================================================================

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a packed 0xRRGGBB value
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    /// Packed 0xRRGGBB value
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// CSS-style lowercase hex string, e.g. `#ffce00`
    pub fn hex_string(self) -> String {
        format!("#{:06x}", self.to_hex())
    }

    /// Per-channel shading, each channel clamped to 0.0-1.0
    pub fn shade_rgb(self, r: f32, g: f32, b: f32) -> Self {
        Self {
            r: (self.r as f32 * r.clamp(0.0, 1.0)) as u8,
            g: (self.g as f32 * g.clamp(0.0, 1.0)) as u8,
            b: (self.b as f32 * b.clamp(0.0, 1.0)) as u8,
        }
    }

    /// Channels as 0.0-1.0 floats
    pub fn to_unit(self) -> (f32, f32, f32) {
        (self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0)
    }

    /// Convert to [u8; 4] for framebuffer (RGBA, always opaque)
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

// =============================================================================
// Lighting
// =============================================================================

/// Directional light (direction points FROM the light INTO the scene)
#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub direction: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    /// Light shining from `position` toward the origin, like a sun placed in the sky
    pub fn from_position(position: Vec3, intensity: f32) -> Self {
        Self {
            direction: (-position).normalize(),
            color: Color::WHITE,
            intensity,
        }
    }
}

/// Scene lighting: one ambient term plus any number of directional lights
#[derive(Debug, Clone)]
pub struct Lighting {
    pub ambient: Color,
    pub ambient_intensity: f32,
    pub lights: Vec<Light>,
}

impl Lighting {
    /// Per-channel light energy for a face with the given world normal
    pub fn shade(&self, normal: Vec3) -> (f32, f32, f32) {
        let (ar, ag, ab) = self.ambient.to_unit();
        let mut r = ar * self.ambient_intensity;
        let mut g = ag * self.ambient_intensity;
        let mut b = ab * self.ambient_intensity;

        for light in &self.lights {
            let ndotl = normal.dot(-light.direction).max(0.0);
            let (lr, lg, lb) = light.color.to_unit();
            r += lr * ndotl * light.intensity;
            g += lg * ndotl * light.intensity;
            b += lb * ndotl * light.intensity;
        }

        (r, g, b)
    }
}

// =============================================================================
// Mesh
// =============================================================================

/// Triangle with indices into a mesh's vertex list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }
}

/// Material applied to a whole mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    /// Self-illumination added on top of lighting (0.0-1.0)
    pub emissive: f32,
    /// 1.0 = opaque; anything lower is blended and skips depth writes
    pub opacity: f32,
    /// Skip backface culling (planes, rings)
    pub double_sided: bool,
}

impl Material {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            emissive: 0.0,
            opacity: 1.0,
            double_sided: false,
        }
    }

    pub fn glowing(color: Color, emissive: f32, opacity: f32) -> Self {
        Self {
            color,
            emissive,
            opacity,
            double_sided: false,
        }
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Indexed triangle mesh with a single material
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub material: Material,
}

impl Mesh {
    pub fn new(material: Material) -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            material,
        }
    }

    /// Return a copy with every vertex passed through `f`
    pub fn transformed(&self, f: impl Fn(Vec3) -> Vec3) -> Mesh {
        Mesh {
            vertices: self.vertices.iter().map(|&v| f(v)).collect(),
            faces: self.faces.clone(),
            material: self.material,
        }
    }

    pub fn translate(mut self, offset: Vec3) -> Mesh {
        for v in &mut self.vertices {
            *v += offset;
        }
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }
}
