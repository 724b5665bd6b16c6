//! Drawing utilities for 3D rendering
//!
//! Standalone functions for clipped 3D lines and floor grids.

use super::camera::{project, Camera};
use super::math::{Vec3, NEAR_PLANE};
use super::render::Framebuffer;
use super::types::Color;

/// Draw a 3D line with near-plane clipping, depth-tested against the scene.
pub fn draw_3d_line_clipped(fb: &mut Framebuffer, camera: &Camera, p0: Vec3, p1: Vec3, color: Color) {
    let z0 = camera.to_camera_space(p0).z;
    let z1 = camera.to_camera_space(p1).z;

    // Both behind camera - skip entirely
    if z0 <= NEAR_PLANE && z1 <= NEAR_PLANE {
        return;
    }

    // Clip line to near plane if needed (nudged so the clipped end still projects)
    let near = NEAR_PLANE + 1e-3;
    let (p0, p1) = if z0 <= near {
        let t = (near - z0) / (z1 - z0);
        (p0 + (p1 - p0) * t, p1)
    } else if z1 <= near {
        let t = (near - z0) / (z1 - z0);
        (p0, p0 + (p1 - p0) * t)
    } else {
        (p0, p1)
    };

    let viewport = fb.viewport();
    if let (Some(s0), Some(s1)) = (project(p0, camera, viewport), project(p1, camera, viewport)) {
        fb.draw_line_3d(s0, s1, color);
    }
}

/// Draw a square floor grid on a horizontal plane.
/// Uses short segments for better near-plane clipping behavior.
///
/// # Arguments
/// * `y` - Y height of the grid plane
/// * `size` - Full width of the grid (centered on the origin)
/// * `divisions` - Number of cells along each side
/// * `center_color` - Color for the two lines through the origin
/// * `grid_color` - Color for every other line
pub fn draw_floor_grid(
    fb: &mut Framebuffer,
    camera: &Camera,
    y: f32,
    size: f32,
    divisions: usize,
    center_color: Color,
    grid_color: Color,
) {
    let half = size * 0.5;
    let step = size / divisions as f32;
    let segment = step;

    for i in 0..=divisions {
        let offset = -half + i as f32 * step;
        let is_center = i * 2 == divisions;
        let color = if is_center { center_color } else { grid_color };

        let mut t = -half;
        while t < half - 1e-4 {
            let next = (t + segment).min(half);
            // Line along X at z = offset
            draw_3d_line_clipped(fb, camera, Vec3::new(t, y, offset), Vec3::new(next, y, offset), color);
            // Line along Z at x = offset
            draw_3d_line_clipped(fb, camera, Vec3::new(offset, y, t), Vec3::new(offset, y, next), color);
            t = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_draws_center_line() {
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::BLACK);
        let mut cam = Camera::perspective(60.0, 1.0, 0.1, 1000.0);
        cam.look_at(Vec3::new(0.0, 10.0, 0.01), Vec3::ZERO);
        draw_floor_grid(&mut fb, &cam, 0.0, 10.0, 2, Color::WHITE, Color::new(68, 68, 68));
        // The X=0 center line passes through the middle column
        let hits = (0..64).filter(|&y| fb.get_pixel(32, y) == Some(Color::WHITE)).count();
        assert!(hits > 0);
    }

    #[test]
    fn test_line_fully_behind_is_skipped() {
        let mut fb = Framebuffer::new(16, 16);
        fb.clear(Color::BLACK);
        let mut cam = Camera::perspective(60.0, 1.0, 0.1, 1000.0);
        cam.look_at(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        draw_3d_line_clipped(&mut fb, &cam, Vec3::new(-1.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 5.0), Color::WHITE);
        assert!(fb.pixels.chunks_exact(4).all(|p| p[0] == 0));
    }
}
