//! Software rasterizer
//!
//! Small flat-shaded renderer that draws the skyline into an RGBA
//! framebuffer the host uploads as a texture.
//!
//! # Module Organization
//!
//! - `types` - Color, Light, Lighting, Material, Face, Mesh
//! - `math` - Vec3 and camera-space transforms
//! - `camera` - perspective look-at Camera, Viewport, `project`
//! - `render` - Framebuffer and mesh rendering
//! - `draw` - clipped 3D lines and floor grids
//! - `primitives` - box, plane, sphere, torus and cylinder builders
//! - `constants` - render target limits

pub mod camera;
pub mod constants;
pub mod draw;
pub mod math;
pub mod primitives;
pub mod render;
pub mod types;

// =============================================================================
// Convenience re-exports for commonly used items
// =============================================================================

pub use types::{Color, Face, Light, Lighting, Material, Mesh};
pub use math::{Vec3, NEAR_PLANE, perspective_transform};
pub use camera::{project, Camera, ScreenPoint, Viewport};
pub use render::{render_mesh, Framebuffer};
pub use draw::{draw_3d_line_clipped, draw_floor_grid};
pub use primitives::{box_mesh, cylinder_mesh, plane_mesh, sphere_mesh, torus_mesh};
pub use constants::MAX_RENDER_WIDTH;
