//! Camera for 3D rendering
//!
//! Perspective look-at camera. The basis vectors are recomputed whenever the
//! eye, target or lens changes, so projection is a handful of dot products.

use super::math::{perspective_transform, Vec3, NEAR_PLANE};

/// Pixel dimensions of the render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A projected point in viewport pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Camera-space depth, positive in front of the camera
    pub depth: f32,
}

/// Camera state for 3D rendering
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    // Computed basis vectors
    pub basis_x: Vec3, // Right
    pub basis_y: Vec3, // Down (matches screen coordinates)
    pub basis_z: Vec3, // Forward
}

impl Camera {
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            fov_y,
            aspect,
            near,
            far,
            basis_x: Vec3::new(1.0, 0.0, 0.0),
            basis_y: Vec3::new(0.0, -1.0, 0.0),
            basis_z: Vec3::new(0.0, 0.0, -1.0),
        };
        cam.update_basis();
        cam
    }

    /// Move the eye and aim it at `target`
    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
        self.update_basis();
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn update_basis(&mut self) {
        let mut forward = (self.target - self.position).normalize();

        // Looking straight up or down: nudge so "right" stays defined.
        // World -Z ends up pointing to the top of the screen.
        if forward.cross(Vec3::UP).len() < 1e-6 {
            forward = (forward + Vec3::new(0.0, 0.0, -1e-4)).normalize();
        }

        self.basis_z = forward;
        self.basis_x = forward.cross(Vec3::UP).normalize();
        // Up = right x forward; store it negated so +y is down on screen
        self.basis_y = -self.basis_x.cross(forward);
    }

    /// World point to camera space (x right, y down, z forward)
    pub fn to_camera_space(&self, world: Vec3) -> Vec3 {
        perspective_transform(world - self.position, self.basis_x, self.basis_y, self.basis_z)
    }

    /// World point to normalized device coordinates (x right, y up, both in [-1, 1] on screen).
    /// None if the point is outside the near/far range.
    pub fn to_ndc(&self, world: Vec3) -> Option<(f32, f32)> {
        let cam = self.to_camera_space(world);
        if cam.z < self.near.max(NEAR_PLANE) || cam.z > self.far {
            return None;
        }
        let f = 1.0 / (self.fov_y.to_radians() * 0.5).tan();
        let ndc_x = (cam.x / cam.z) * f / self.aspect;
        let ndc_y = -(cam.y / cam.z) * f;
        Some((ndc_x, ndc_y))
    }
}

/// Project a world-space point through the camera to viewport pixels.
///
/// Pure: same inputs, same answer. Used for both rasterization and label
/// placement so overlay text lines up with the rendered geometry.
pub fn project(world: Vec3, camera: &Camera, viewport: Viewport) -> Option<ScreenPoint> {
    let (ndc_x, ndc_y) = camera.to_ndc(world)?;
    Some(ScreenPoint {
        x: (ndc_x * 0.5 + 0.5) * viewport.width as f32,
        y: (-(ndc_y * 0.5) + 0.5) * viewport.height as f32,
        depth: camera.to_camera_space(world).z,
    })
}
