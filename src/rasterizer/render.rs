//! Core rendering functions
//! Framebuffer and flat-shaded, z-buffered triangle rasterization

use super::camera::{project, Camera, ScreenPoint, Viewport};
use super::math::{Vec3, NEAR_PLANE};
use super::types::{Color, Lighting, Material, Mesh};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,   // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>, // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
            self.zbuffer = vec![f32::MAX; width * height];
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(f32::MAX);
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some(Color::new(self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]))
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Write with depth test; returns true if the pixel was written
    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let zi = y * self.width + x;
        if z >= self.zbuffer[zi] {
            return false;
        }
        self.zbuffer[zi] = z;
        self.set_pixel(x, y, color);
        true
    }

    /// Blend `color` over the existing pixel. `alpha` is 0-255.
    /// Pixels that were cleared transparent take the new alpha directly.
    pub fn set_pixel_alpha(&mut self, x: usize, y: usize, color: Color, alpha: u8) {
        if x >= self.width || y >= self.height || alpha == 0 {
            return;
        }
        let idx = (y * self.width + x) * 4;
        let a = alpha as f32 / 255.0;
        let inv = 1.0 - a;
        self.pixels[idx] = (color.r as f32 * a + self.pixels[idx] as f32 * inv) as u8;
        self.pixels[idx + 1] = (color.g as f32 * a + self.pixels[idx + 1] as f32 * inv) as u8;
        self.pixels[idx + 2] = (color.b as f32 * a + self.pixels[idx + 2] as f32 * inv) as u8;
        let dst_a = self.pixels[idx + 3] as f32 / 255.0;
        self.pixels[idx + 3] = ((a + dst_a * inv) * 255.0) as u8;
    }

    /// Filled circle with alpha (particles)
    pub fn draw_circle_alpha(&mut self, cx: i32, cy: i32, radius: i32, color: Color, alpha: u8) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    let (x, y) = (cx + dx, cy + dy);
                    if x >= 0 && y >= 0 {
                        self.set_pixel_alpha(x as usize, y as usize, color, alpha);
                    }
                }
            }
        }
    }

    /// Bresenham line blended over the existing pixels
    pub fn draw_line_alpha(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color, alpha: u8) {
        let (a, b) = ((x0 as f32, y0 as f32), (x1 as f32, y1 as f32));
        self.walk_line(a, b, |fb, x, y, _| fb.set_pixel_alpha(x, y, color, alpha));
    }

    /// Line with depth testing against (but not writing) the z-buffer
    pub fn draw_line_3d(&mut self, a: ScreenPoint, b: ScreenPoint, color: Color) {
        self.walk_line((a.x, a.y), (b.x, b.y), |fb, x, y, t| {
            let z = a.depth + (b.depth - a.depth) * t;
            if z < fb.zbuffer[y * fb.width + x] {
                fb.set_pixel(x, y, color);
            }
        });
    }

    /// Liang-Barsky clip against the pixel rect. Returns the kept `t` range
    /// along the segment, or `None` if it misses the framebuffer.
    fn clip_to_bounds(&self, (x0, y0): (f32, f32), (x1, y1): (f32, f32)) -> Option<(f32, f32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let (xmax, ymax) = (self.width as f32 - 1.0, self.height as f32 - 1.0);
        let (dx, dy) = (x1 - x0, y1 - y0);
        let mut t0 = 0.0f32;
        let mut t1 = 1.0f32;

        for (p, q) in [(-dx, x0), (dx, xmax - x0), (-dy, y0), (dy, ymax - y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
        Some((t0, t1))
    }

    /// Shared Bresenham walk over the on-screen part of a segment.
    /// `plot` gets in-bounds pixels and the 0..1 progress along the whole
    /// segment. Returns the number of pixels stepped.
    fn walk_line(
        &mut self,
        a: (f32, f32),
        b: (f32, f32),
        mut plot: impl FnMut(&mut Self, usize, usize, f32),
    ) -> usize {
        let Some((t0, t1)) = self.clip_to_bounds(a, b) else {
            return 0;
        };
        let at = |t: f32| ((a.0 + (b.0 - a.0) * t).round() as i32, (a.1 + (b.1 - a.1) * t).round() as i32);
        let (x0, y0) = at(t0);
        let (x1, y1) = at(t1);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;
        let steps = dx.max(-dy).max(1) as f32;
        let mut step = 0.0;
        let mut walked = 0;

        loop {
            if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
                plot(self, x as usize, y as usize, t0 + (t1 - t0) * step / steps);
            }
            walked += 1;

            if x == x1 && y == y1 {
                break walked;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
            step += 1.0;
        }
    }
}

/// Triangle ready for rasterization: screen-space corners plus final color
struct Surface {
    v1: ScreenPoint,
    v2: ScreenPoint,
    v3: ScreenPoint,
    color: Color,
    alpha: u8,
}

/// Render a mesh with flat shading.
///
/// Opaque materials write depth; translucent ones blend over what is already
/// there and leave the z-buffer untouched, so draw them last.
/// Returns the number of triangles that reached the rasterizer.
pub fn render_mesh(fb: &mut Framebuffer, mesh: &Mesh, camera: &Camera, lighting: &Lighting) -> usize {
    let viewport = fb.viewport();
    let material = mesh.material;

    // === TRANSFORM PHASE ===
    let projected: Vec<Option<ScreenPoint>> = mesh
        .vertices
        .iter()
        .map(|&v| project(v, camera, viewport))
        .collect();

    let mut drawn = 0;
    for face in &mesh.faces {
        // Conservative near-plane handling: skip triangles with any vertex behind it
        let (Some(s1), Some(s2), Some(s3)) = (projected[face.v0], projected[face.v1], projected[face.v2]) else {
            continue;
        };
        if s1.depth <= NEAR_PLANE || s2.depth <= NEAR_PLANE || s3.depth <= NEAR_PLANE {
            continue;
        }

        let w1 = mesh.vertices[face.v0];
        let w2 = mesh.vertices[face.v1];
        let w3 = mesh.vertices[face.v2];
        let mut normal = (w2 - w1).cross(w3 - w1).normalize();
        if normal == Vec3::ZERO {
            continue; // Degenerate
        }

        // Backface test in world space: does the face look at the eye?
        let facing = normal.dot(camera.position - w1) > 0.0;
        if !facing {
            if !material.double_sided {
                continue;
            }
            normal = -normal;
        }

        let surface = Surface {
            v1: s1,
            v2: s2,
            v3: s3,
            color: shade_face(material, normal, lighting),
            alpha: (material.opacity.clamp(0.0, 1.0) * 255.0) as u8,
        };
        rasterize_triangle(fb, &surface, material.is_translucent());
        drawn += 1;
    }

    drawn
}

/// Flat color for one face: lit base color plus emissive glow
fn shade_face(material: Material, normal: Vec3, lighting: &Lighting) -> Color {
    let (r, g, b) = lighting.shade(normal);
    let e = material.emissive;
    material.color.shade_rgb(r + e, g + e, b + e)
}

/// Rasterize a triangle using incremental edge functions.
/// Depth is interpolated perspective-correctly (1/z is linear in screen space).
fn rasterize_triangle(fb: &mut Framebuffer, surface: &Surface, translucent: bool) {
    let (v1, v2, v3) = (surface.v1, surface.v2, surface.v3);

    // Bounding box
    let min_x = v1.x.min(v2.x).min(v3.x).max(0.0) as usize;
    let max_x = (v1.x.max(v2.x).max(v3.x) + 1.0).min(fb.width as f32) as usize;
    let min_y = v1.y.min(v2.y).min(v3.y).max(0.0) as usize;
    let max_y = (v1.y.max(v2.y).max(v3.y) + 1.0).min(fb.height as f32) as usize;

    if min_x >= max_x || min_y >= max_y {
        return;
    }

    // Triangle area * 2 (sign depends on screen winding; both windings are drawn)
    let area = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
    if area.abs() < 0.00001 {
        return;
    }
    let inv_area = 1.0 / area;

    // E23 and E31 coefficients; bc.z = 1 - bc.x - bc.y
    let a0 = v2.y - v3.y;
    let b0 = v3.x - v2.x;
    let a1 = v3.y - v1.y;
    let b1 = v1.x - v3.x;

    // Sample at pixel centers
    let start_x = min_x as f32 + 0.5;
    let start_y = min_y as f32 + 0.5;
    let mut w0_row = a0 * (start_x - v3.x) + b0 * (start_y - v3.y);
    let mut w1_row = a1 * (start_x - v3.x) + b1 * (start_y - v3.y);

    let inv_z1 = 1.0 / v1.depth;
    let inv_z2 = 1.0 / v2.depth;
    let inv_z3 = 1.0 / v3.depth;

    for y in min_y..max_y {
        let mut w0 = w0_row;
        let mut w1 = w1_row;

        for x in min_x..max_x {
            let bc_x = w0 * inv_area;
            let bc_y = w1 * inv_area;
            let bc_z = 1.0 - bc_x - bc_y;

            const ERR: f32 = -0.0001;
            if bc_x >= ERR && bc_y >= ERR && bc_z >= ERR {
                let z = 1.0 / (bc_x * inv_z1 + bc_y * inv_z2 + bc_z * inv_z3);
                if translucent {
                    if z < fb.zbuffer[y * fb.width + x] {
                        fb.set_pixel_alpha(x, y, surface.color, surface.alpha);
                    }
                } else {
                    fb.set_pixel_with_depth(x, y, z, surface.color);
                }
            }

            w0 += a0;
            w1 += a1;
        }

        w0_row += b0;
        w1_row += b1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{box_mesh, Light};

    fn lighting() -> Lighting {
        Lighting {
            ambient: Color::from_hex(0x404040),
            ambient_intensity: 1.0,
            lights: vec![Light::from_position(Vec3::new(5.0, 10.0, 7.0), 1.0)],
        }
    }

    fn camera() -> Camera {
        let mut cam = Camera::perspective(60.0, 1.0, 0.1, 1000.0);
        cam.look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        cam
    }

    #[test]
    fn test_clear_fills_every_pixel() {
        let mut fb = Framebuffer::new(4, 3);
        fb.clear(Color::from_hex(0x1a1a2e));
        assert_eq!(fb.get_pixel(3, 2), Some(Color::from_hex(0x1a1a2e)));
        assert!(fb.zbuffer.iter().all(|&z| z == f32::MAX));
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut fb = Framebuffer::new(2, 2);
        assert!(fb.set_pixel_with_depth(0, 0, 5.0, Color::WHITE));
        assert!(!fb.set_pixel_with_depth(0, 0, 6.0, Color::BLACK));
        assert_eq!(fb.get_pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn test_render_box_covers_center() {
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::BLACK);
        let mesh = box_mesh(2.0, 2.0, 2.0, Material::solid(Color::new(200, 50, 50)));
        let drawn = render_mesh(&mut fb, &mesh, &camera(), &lighting());
        // Only the front-facing faces survive culling
        assert!(drawn > 0 && drawn < mesh.triangle_count());
        assert_ne!(fb.get_pixel(32, 32), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_translucent_mesh_blends_without_depth_write() {
        let mut fb = Framebuffer::new(32, 32);
        fb.clear(Color::BLACK);
        let mesh = box_mesh(2.0, 2.0, 2.0, Material::glowing(Color::WHITE, 1.0, 0.5));
        render_mesh(&mut fb, &mesh, &camera(), &lighting());
        let px = fb.get_pixel(16, 16).unwrap();
        assert!(px.r > 0 && px.r < 255);
        assert_eq!(fb.zbuffer[16 * 32 + 16], f32::MAX);
    }

    #[test]
    fn test_line_clips_to_bounds() {
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(Color::BLACK);
        fb.draw_line_alpha(-5, 4, 20, 4, Color::WHITE, 255);
        assert_eq!(fb.get_pixel(0, 4), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(7, 4), Some(Color::WHITE));
    }

    #[test]
    fn test_far_offscreen_line_walks_only_visible_pixels() {
        let mut fb = Framebuffer::new(64, 48);
        fb.clear(Color::BLACK);
        let walked = fb.walk_line((-400_000.0, 10.0), (300_000.0, 30.0), |fb, x, y, _| {
            fb.set_pixel(x, y, Color::WHITE)
        });
        assert!(walked > 0 && walked <= 64 + 48, "walked {walked} pixels");
        assert_eq!(fb.get_pixel(0, 21), Some(Color::WHITE));
    }

    #[test]
    fn test_line_missing_framebuffer_walks_nothing() {
        let mut fb = Framebuffer::new(16, 16);
        assert_eq!(fb.walk_line((-50.0, -5.0), (80.0, -1.0), |_, _, _, _| {}), 0);
        assert_eq!(fb.walk_line((20.0, -30.0), (20.0, 40.0), |_, _, _, _| {}), 0);
    }

    #[test]
    fn test_clipped_depth_follows_whole_segment() {
        let mut fb = Framebuffer::new(10, 4);
        fb.clear(Color::BLACK);
        let mut first = None;
        fb.walk_line((-10.0, 1.0), (10.0, 1.0), |_, x, _, t| {
            if first.is_none() {
                first = Some((x, t));
            }
        });
        let (x, t) = first.unwrap();
        assert_eq!(x, 0);
        assert!((t - 0.5).abs() < 1e-3);
    }
}
