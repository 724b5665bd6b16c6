//! Particle backdrop
//!
//! Slow drifting dots behind the side panel, with faint lines between
//! neighbours. Drawn into its own framebuffer with alpha blending.

use rand::Rng;

use crate::rasterizer::{Color, Framebuffer};

/// Number of particles in the field
pub const PARTICLE_COUNT: usize = 50;
/// Particles closer than this (pixels) are linked
pub const LINK_DISTANCE: f32 = 150.0;
/// Link alpha at zero distance, fading to 0 at `LINK_DISTANCE`
const LINK_ALPHA: f32 = 30.0;

pub const PARTICLE_COLOR: Color = Color::new(100, 150, 255);

/// A single drifting dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Diameter in pixels (2-5)
    pub size: f32,
    /// Velocity in pixels per frame
    pub vx: f32,
    pub vy: f32,
    /// Fill alpha (50-150)
    pub opacity: u8,
}

/// The whole particle field
#[derive(Debug, Clone)]
pub struct Backdrop {
    pub particles: Vec<Particle>,
    width: f32,
    height: f32,
}

impl Backdrop {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                x: rng.gen::<f32>() * width,
                y: rng.gen::<f32>() * height,
                size: rng.gen_range(2.0..5.0),
                vx: rng.gen_range(-0.5..0.5),
                vy: rng.gen_range(-0.5..0.5),
                opacity: rng.gen_range(50..150),
            })
            .collect();

        Self {
            particles,
            width,
            height,
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// New bounds; particles keep their positions and drift back in
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Move every particle one frame. A particle past an edge is always
    /// sent back toward the inside, so a shrink never strands it.
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;

            if p.x < 0.0 {
                p.vx = p.vx.abs();
            } else if p.x > self.width {
                p.vx = -p.vx.abs();
            }
            if p.y < 0.0 {
                p.vy = p.vy.abs();
            } else if p.y > self.height {
                p.vy = -p.vy.abs();
            }
        }
    }

    /// Linked pairs `(i, j, alpha)` with `i < j`
    pub fn links(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        let particles = &self.particles;
        (0..particles.len()).flat_map(move |i| {
            (i + 1..particles.len()).filter_map(move |j| {
                let (a, b) = (particles[i], particles[j]);
                let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                if d < LINK_DISTANCE {
                    Some((i, j, link_alpha(d)))
                } else {
                    None
                }
            })
        })
    }

    /// Links first, then dots on top
    pub fn draw(&self, fb: &mut Framebuffer) {
        for (i, j, alpha) in self.links() {
            let (a, b) = (self.particles[i], self.particles[j]);
            fb.draw_line_alpha(a.x as i32, a.y as i32, b.x as i32, b.y as i32, PARTICLE_COLOR, alpha);
        }
        for p in &self.particles {
            let radius = (p.size * 0.5).round().max(1.0) as i32;
            fb.draw_circle_alpha(p.x as i32, p.y as i32, radius, PARTICLE_COLOR, p.opacity);
        }
    }
}

/// Linear fade from `LINK_ALPHA` at distance 0 to 0 at `LINK_DISTANCE`
pub fn link_alpha(distance: f32) -> u8 {
    (LINK_ALPHA * (1.0 - distance / LINK_DISTANCE)).clamp(0.0, LINK_ALPHA) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field() -> Backdrop {
        Backdrop::new(&mut StdRng::seed_from_u64(7), 400.0, 300.0)
    }

    #[test]
    fn test_particle_ranges() {
        let backdrop = field();
        assert_eq!(backdrop.particles.len(), PARTICLE_COUNT);
        for p in &backdrop.particles {
            assert!((0.0..=400.0).contains(&p.x) && (0.0..=300.0).contains(&p.y));
            assert!((2.0..5.0).contains(&p.size));
            assert!(p.vx.abs() <= 0.5 && p.vy.abs() <= 0.5);
            assert!((50..150).contains(&p.opacity));
        }
    }

    #[test]
    fn test_bounce_reverses_velocity() {
        let mut backdrop = field();
        backdrop.particles[0] = Particle {
            x: 399.8,
            y: 10.0,
            size: 3.0,
            vx: 0.5,
            vy: 0.0,
            opacity: 100,
        };
        backdrop.update();
        assert_eq!(backdrop.particles[0].vx, -0.5);
        backdrop.update();
        assert!(backdrop.particles[0].x < 400.0);
    }

    #[test]
    fn test_link_alpha_fades() {
        assert_eq!(link_alpha(0.0), 30);
        assert_eq!(link_alpha(75.0), 15);
        assert_eq!(link_alpha(150.0), 0);
    }

    #[test]
    fn test_links_only_for_close_pairs() {
        let mut backdrop = field();
        backdrop.particles.truncate(3);
        backdrop.particles[0].x = 0.0;
        backdrop.particles[0].y = 0.0;
        backdrop.particles[1].x = 75.0;
        backdrop.particles[1].y = 0.0;
        backdrop.particles[2].x = 300.0;
        backdrop.particles[2].y = 0.0;
        let links: Vec<_> = backdrop.links().collect();
        assert_eq!(links, vec![(0, 1, 15)]);
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut backdrop = field();
        let before = backdrop.particles.clone();
        backdrop.resize(800.0, 600.0);
        assert_eq!(backdrop.particles, before);
        assert_eq!(backdrop.size(), (800.0, 600.0));
    }

    #[test]
    fn test_shrink_pulls_particles_back_inside() {
        let mut backdrop = Backdrop::new(&mut StdRng::seed_from_u64(3), 400.0, 600.0);
        for p in &mut backdrop.particles {
            p.vy = if p.vy < 0.0 { -0.5 } else { 0.5 };
        }
        backdrop.resize(400.0, 200.0);
        assert!(backdrop.particles.iter().any(|p| p.y > 200.0));

        // Worst case is 400px outside at 0.5px per frame
        for _ in 0..1000 {
            backdrop.update();
        }
        for p in &backdrop.particles {
            assert!((-0.5..=200.5).contains(&p.y), "particle stuck at y={}", p.y);
            assert!((-0.5..=400.5).contains(&p.x), "particle stuck at x={}", p.x);
        }
    }

    #[test]
    fn test_draw_blends_into_framebuffer() {
        let backdrop = field();
        let mut fb = Framebuffer::new(400, 300);
        fb.clear(Color::BLACK);
        backdrop.draw(&mut fb);
        let p = backdrop.particles[0];
        let pixel = fb.get_pixel(p.x as usize, p.y as usize).unwrap();
        assert!(pixel.b > 0);
    }
}
