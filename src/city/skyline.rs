//! Skyline construction
//!
//! Builds the static part of the scene once per mount: the floor, its grid,
//! and one group of buildings per score band. Building sizes are randomized,
//! so each mount looks a little different. Pass a seeded RNG to reproduce a
//! particular skyline.

use rand::Rng;

use super::score::{x_position, ScoreBand, BANDS};
use crate::rasterizer::{
    box_mesh, draw_floor_grid, plane_mesh, render_mesh, Camera, Color, Face, Framebuffer, Light,
    Lighting, Material, Mesh, Vec3,
};

/// Scene clear color
pub const BACKGROUND: Color = Color::from_hex(0x1a1a2e);

const FLOOR_COLOR: Color = Color::from_hex(0x0f3460);
const FLOOR_WIDTH: f32 = 100.0;
const FLOOR_DEPTH: f32 = 40.0;
const FLOOR_Y: f32 = -1.0;

const GRID_Y: f32 = -0.99;
const GRID_SIZE: f32 = 100.0;
const GRID_DIVISIONS: usize = 50;
const GRID_COLOR: Color = Color::from_hex(0x444444);

const WINDOW_COLOR: Color = Color::from_hex(0xffffcc);
const WINDOW_SIZE: f32 = 0.2;
const WINDOW_PITCH: f32 = WINDOW_SIZE * 1.5;
/// Windows float just off the wall so they win the depth test
const WINDOW_OFFSET: f32 = 0.01;

/// Placement jitter along X, in world units
const JITTER: f32 = 0.5;
/// Buildings are scattered over z in [-DEPTH_SPREAD/2, DEPTH_SPREAD/2]
const DEPTH_SPREAD: f32 = 10.0;

/// Height at which band range labels sit, just above the grid
pub const LABEL_Y: f32 = -0.98;
/// Labels are pulled toward the default camera so they clear the buildings
pub const LABEL_Z: f32 = 5.0;

/// One decorative building. Its base rests on y = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Building {
    /// Center of the footprint at ground level
    pub base: Vec3,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl Building {
    /// Draw one building for `band` in x-slot `slot` of `slots`
    fn random<R: Rng + ?Sized>(rng: &mut R, band: &ScoreBand, slot: usize, slots: usize) -> Self {
        let height = band.height * (0.7 + rng.gen::<f32>() * 0.3);
        let width = 1.0 + rng.gen::<f32>() * 1.5;
        let depth = 1.0 + rng.gen::<f32>() * 1.5;

        let (start, end) = band.x_range();
        let slot_width = (end - start) / slots as f32;
        let x = start + (slot as f32 + 0.5) * slot_width + (rng.gen::<f32>() - 0.5) * JITTER;
        let z = (rng.gen::<f32>() - 0.5) * DEPTH_SPREAD;

        Self {
            base: Vec3::new(x, 0.0, z),
            width,
            depth,
            height,
        }
    }

    pub fn windows_per_floor(&self) -> usize {
        (self.width / WINDOW_PITCH).floor() as usize
    }

    pub fn floors(&self) -> usize {
        (self.height / WINDOW_PITCH).floor() as usize
    }

    pub fn window_count(&self) -> usize {
        self.windows_per_floor() * self.floors() * 2
    }

    /// Translucent body tinted with the band color
    fn body(&self, color: Color) -> Mesh {
        let material = Material::glowing(color, 0.2, 0.9);
        box_mesh(self.width, self.height, self.depth, material)
            .translate(self.base + Vec3::new(0.0, self.height * 0.5, 0.0))
    }

    /// Append one quad per window on the front and back walls
    fn push_windows(&self, mesh: &mut Mesh) {
        let half = WINDOW_SIZE * 0.5;
        let front = self.base.z + self.depth * 0.5 + WINDOW_OFFSET;
        let back = self.base.z - self.depth * 0.5 - WINDOW_OFFSET;

        for floor in 0..self.floors() {
            let cy = self.base.y + floor as f32 * WINDOW_PITCH + WINDOW_SIZE * 2.0;
            for column in 0..self.windows_per_floor() {
                let cx = self.base.x + column as f32 * WINDOW_PITCH - self.width * 0.5 + WINDOW_SIZE;
                let (x0, x1) = (cx - half, cx + half);
                let (y0, y1) = (cy - half, cy + half);

                // Front faces +Z, back faces -Z
                push_quad(mesh, [
                    Vec3::new(x0, y0, front),
                    Vec3::new(x1, y0, front),
                    Vec3::new(x1, y1, front),
                    Vec3::new(x0, y1, front),
                ]);
                push_quad(mesh, [
                    Vec3::new(x1, y0, back),
                    Vec3::new(x0, y0, back),
                    Vec3::new(x0, y1, back),
                    Vec3::new(x1, y1, back),
                ]);
            }
        }
    }
}

fn push_quad(mesh: &mut Mesh, corners: [Vec3; 4]) {
    let base = mesh.vertices.len();
    mesh.vertices.extend_from_slice(&corners);
    mesh.faces.push(Face::new(base, base + 1, base + 2));
    mesh.faces.push(Face::new(base, base + 2, base + 3));
}

/// Buildings belonging to one score band
#[derive(Debug, Clone)]
pub struct SkylineGroup {
    pub band: &'static ScoreBand,
    pub buildings: Vec<Building>,
}

/// World-space anchor for a band's range label
pub fn band_label_anchor(band: &ScoreBand) -> Vec3 {
    Vec3::new(x_position(band.midpoint()), LABEL_Y, LABEL_Z)
}

/// The static scene: floor, grid, buildings and lights
pub struct Skyline {
    pub groups: Vec<SkylineGroup>,
    pub lighting: Lighting,
    floor: Mesh,
    windows: Mesh,
    bodies: Vec<Mesh>,
}

impl Skyline {
    /// Generate a skyline with `per_band` buildings in every band
    pub fn build<R: Rng + ?Sized>(rng: &mut R, per_band: usize) -> Self {
        let groups: Vec<SkylineGroup> = BANDS
            .iter()
            .map(|band| SkylineGroup {
                band,
                buildings: (0..per_band)
                    .map(|slot| Building::random(&mut *rng, band, slot, per_band))
                    .collect(),
            })
            .collect();

        let mut windows = Mesh::new(Material::glowing(WINDOW_COLOR, 0.5, 1.0));
        let mut bodies = Vec::with_capacity(BANDS.len() * per_band);
        for group in &groups {
            for building in &group.buildings {
                building.push_windows(&mut windows);
                bodies.push(building.body(group.band.color));
            }
        }

        let floor_material = Material {
            double_sided: true,
            ..Material::solid(FLOOR_COLOR)
        };
        let floor = plane_mesh(FLOOR_WIDTH, FLOOR_DEPTH, floor_material)
            .translate(Vec3::new(0.0, FLOOR_Y, 0.0));

        let lighting = Lighting {
            ambient: Color::from_hex(0x404040),
            ambient_intensity: 1.0,
            lights: vec![Light::from_position(Vec3::new(5.0, 10.0, 7.0), 1.0)],
        };

        Self {
            groups,
            lighting,
            floor,
            windows,
            bodies,
        }
    }

    pub fn building_count(&self) -> usize {
        self.groups.iter().map(|g| g.buildings.len()).sum()
    }

    /// Clear to the background and draw everything that writes depth:
    /// floor, grid and windows. Returns triangles drawn.
    pub fn draw_opaque(&self, fb: &mut Framebuffer, camera: &Camera) -> usize {
        fb.clear(BACKGROUND);
        let mut drawn = render_mesh(fb, &self.floor, camera, &self.lighting);
        draw_floor_grid(fb, camera, GRID_Y, GRID_SIZE, GRID_DIVISIONS, Color::WHITE, GRID_COLOR);
        drawn += render_mesh(fb, &self.windows, camera, &self.lighting);
        drawn
    }

    /// Blend the building bodies over the opaque pass
    pub fn draw_translucent(&self, fb: &mut Framebuffer, camera: &Camera) -> usize {
        self.bodies
            .iter()
            .map(|body| render_mesh(fb, body, camera, &self.lighting))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::score::{BandId, Score};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn skyline(seed: u64) -> Skyline {
        Skyline::build(&mut StdRng::seed_from_u64(seed), 5)
    }

    #[test]
    fn test_one_group_per_band() {
        let city = skyline(1);
        assert_eq!(city.groups.len(), 5);
        assert_eq!(city.building_count(), 25);
        for (group, band) in city.groups.iter().zip(BANDS.iter()) {
            assert_eq!(group.band.id, band.id);
            assert_eq!(group.buildings.len(), 5);
        }
    }

    #[test]
    fn test_building_dimensions_follow_band_height() {
        let city = skyline(2);
        for group in &city.groups {
            for b in &group.buildings {
                assert!(b.height >= group.band.height * 0.7 - 1e-4);
                assert!(b.height <= group.band.height + 1e-4);
                assert!((1.0..=2.5).contains(&b.width));
                assert!((1.0..=2.5).contains(&b.depth));
                assert!(b.base.z.abs() <= DEPTH_SPREAD * 0.5);
            }
        }
    }

    #[test]
    fn test_buildings_tile_their_band_range() {
        let city = skyline(3);
        for group in &city.groups {
            let (start, end) = group.band.x_range();
            let mut previous = f32::NEG_INFINITY;
            for b in &group.buildings {
                assert!(b.base.x >= start - JITTER && b.base.x <= end + JITTER);
                assert!(b.base.x > previous - JITTER);
                previous = b.base.x;
            }
        }
    }

    #[test]
    fn test_window_grid_counts() {
        let building = Building {
            base: Vec3::ZERO,
            width: 1.0,
            depth: 1.0,
            height: 3.1,
        };
        assert_eq!(building.windows_per_floor(), 3);
        assert_eq!(building.floors(), 10);
        assert_eq!(building.window_count(), 60);
    }

    #[test]
    fn test_window_mesh_matches_counts() {
        let city = skyline(4);
        let expected: usize = city
            .groups
            .iter()
            .flat_map(|g| g.buildings.iter())
            .map(|b| b.window_count())
            .sum();
        assert_eq!(city.windows.triangle_count(), expected * 2);
    }

    #[test]
    fn test_same_seed_same_skyline() {
        let a = skyline(9);
        let b = skyline(9);
        for (ga, gb) in a.groups.iter().zip(b.groups.iter()) {
            assert_eq!(ga.buildings, gb.buildings);
        }
    }

    #[test]
    fn test_band_label_anchor() {
        let anchor = band_label_anchor(BandId::Good.band());
        let expected = Score::new(704).x_position() + 0.5 * (80.0 / 550.0);
        assert!((anchor.x - expected).abs() < 1e-3);
        assert_eq!(anchor.y, LABEL_Y);
        assert_eq!(anchor.z, LABEL_Z);
    }

    #[test]
    fn test_opaque_pass_draws_floor() {
        let city = skyline(5);
        let mut fb = Framebuffer::new(160, 100);
        let mut camera = Camera::perspective(60.0, fb.viewport().aspect(), 0.1, 1000.0);
        camera.look_at(Vec3::new(0.0, 15.0, 30.0), Vec3::new(0.0, 5.0, 0.0));

        assert!(city.draw_opaque(&mut fb, &camera) > 0);
        // Bottom-center looks down at the floor, top-left at empty sky
        assert_ne!(fb.get_pixel(80, 98), Some(BACKGROUND));
        assert_eq!(fb.get_pixel(0, 0), Some(BACKGROUND));
        assert!(city.draw_translucent(&mut fb, &camera) > 0);
    }
}
