//! Score indicator
//!
//! The floating marker that shows where the current score sits on the
//! skyline. Changing the score only moves the target; the marker glides
//! toward it one frame at a time.

use std::f32::consts::FRAC_PI_2;

use super::config::CityConfig;
use super::score::Score;
use crate::rasterizer::{cylinder_mesh, sphere_mesh, torus_mesh, Color, Material, Mesh, Vec3};

/// Readout text floats this far above the marker center
pub const READOUT_LIFT: f32 = 2.0;

const SPHERE_RADIUS: f32 = 1.0;
const RING_RADIUS: f32 = 1.5;
const RING_TUBE: f32 = 0.2;
const BEAM_TOP_RADIUS: f32 = 0.1;
const BEAM_BOTTOM_RADIUS: f32 = 0.5;
const BEAM_LENGTH: f32 = 5.0;

/// Motion parameters, taken from [`CityConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub smoothing: f32,
    pub float_base: f32,
    pub float_amplitude: f32,
    pub float_rate: f32,
    pub ring_spin: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Motion::from(&CityConfig::default())
    }
}

impl From<&CityConfig> for Motion {
    fn from(config: &CityConfig) -> Self {
        Self {
            smoothing: config.smoothing,
            float_base: config.float_base,
            float_amplitude: config.float_amplitude,
            float_rate: config.float_rate,
            ring_spin: config.ring_spin,
        }
    }
}

/// The single score marker of a mounted scene
#[derive(Debug, Clone)]
pub struct Indicator {
    score: Score,
    target_x: f32,
    current_x: f32,
    color: Color,
    /// Current height, including the float offset
    y: f32,
    /// Ring rotation around its own axis, radians
    ring_angle: f32,
    motion: Motion,
}

impl Indicator {
    /// A marker already resting at `score`
    pub fn new(score: Score, motion: Motion) -> Self {
        let x = score.x_position();
        Self {
            score,
            target_x: x,
            current_x: x,
            color: score.color(),
            y: motion.float_base,
            ring_angle: 0.0,
            motion,
        }
    }

    /// Retarget the marker. Updates target and color only; the render loop moves it.
    pub fn set_score(&mut self, score: Score) {
        self.score = score;
        self.target_x = score.x_position();
        self.color = score.color();
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Smoothed x position
    pub fn current_position(&self) -> f32 {
        self.current_x
    }

    pub fn target_position(&self) -> f32 {
        self.target_x
    }

    pub fn ring_angle(&self) -> f32 {
        self.ring_angle
    }

    /// Marker center in world space
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.current_x, self.y, 0.0)
    }

    /// World point the score readout is anchored to
    pub fn readout_anchor(&self) -> Vec3 {
        self.position() + Vec3::new(0.0, READOUT_LIFT, 0.0)
    }

    /// Smoothing step only
    pub fn step_position(&mut self) {
        self.current_x += (self.target_x - self.current_x) * self.motion.smoothing;
    }

    /// Bob height as a function of wall-clock seconds
    pub fn step_float(&mut self, time: f64) {
        let phase = (time * self.motion.float_rate as f64).sin() as f32;
        self.y = self.motion.float_base + phase * self.motion.float_amplitude;
    }

    pub fn step_ring(&mut self) {
        self.ring_angle = (self.ring_angle + self.motion.ring_spin) % std::f32::consts::TAU;
    }

    /// One frame of motion: smoothing, float, ring spin
    pub fn advance(&mut self, time: f64) {
        self.step_position();
        self.step_float(time);
        self.step_ring();
    }

    /// Sphere, ring and beam in world space, tinted with the current color.
    /// All three are translucent.
    pub fn meshes(&self) -> [Mesh; 3] {
        let center = self.position();

        let sphere = sphere_mesh(SPHERE_RADIUS, 16, 12, Material::glowing(self.color, 0.5, 0.8))
            .translate(center);

        let ring_material = Material {
            double_sided: true,
            ..Material::glowing(self.color, 0.7, 0.5)
        };
        let angle = self.ring_angle;
        let ring = torus_mesh(RING_RADIUS, RING_TUBE, 8, 24, ring_material)
            .transformed(|v| v.rotate_z(angle).rotate_x(FRAC_PI_2))
            .translate(center);

        let beam_material = Material {
            double_sided: true,
            ..Material::glowing(self.color, 0.7, 0.3)
        };
        let beam = cylinder_mesh(BEAM_TOP_RADIUS, BEAM_BOTTOM_RADIUS, BEAM_LENGTH, 12, beam_material)
            .translate(center + Vec3::new(0.0, -BEAM_LENGTH * 0.5, 0.0));

        [sphere, ring, beam]
    }
}
