//! Primitive mesh builders
//!
//! All shapes are centered on the origin with outward (counter-clockwise)
//! winding, so `render_mesh` can cull back faces from the geometric normal.

use std::f32::consts::PI;

use super::math::Vec3;
use super::types::{Face, Material, Mesh};

/// Push a quad as two triangles. Corners must be counter-clockwise seen from outside.
fn push_quad(mesh: &mut Mesh, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
    let base = mesh.vertices.len();
    mesh.vertices.extend_from_slice(&[a, b, c, d]);
    mesh.faces.push(Face::new(base, base + 1, base + 2));
    mesh.faces.push(Face::new(base, base + 2, base + 3));
}

/// Axis-aligned box of the given full extents
pub fn box_mesh(width: f32, height: f32, depth: f32, material: Material) -> Mesh {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);
    let mut mesh = Mesh::new(material);

    let v = Vec3::new;
    // +Z (front)
    push_quad(&mut mesh, v(-x, -y, z), v(x, -y, z), v(x, y, z), v(-x, y, z));
    // -Z (back)
    push_quad(&mut mesh, v(x, -y, -z), v(-x, -y, -z), v(-x, y, -z), v(x, y, -z));
    // +X
    push_quad(&mut mesh, v(x, -y, z), v(x, -y, -z), v(x, y, -z), v(x, y, z));
    // -X
    push_quad(&mut mesh, v(-x, -y, -z), v(-x, -y, z), v(-x, y, z), v(-x, y, -z));
    // +Y (top)
    push_quad(&mut mesh, v(-x, y, z), v(x, y, z), v(x, y, -z), v(-x, y, -z));
    // -Y (bottom)
    push_quad(&mut mesh, v(-x, -y, -z), v(x, -y, -z), v(x, -y, z), v(-x, -y, z));

    mesh
}

/// Horizontal plane on XZ facing +Y
pub fn plane_mesh(width: f32, depth: f32, material: Material) -> Mesh {
    let (x, z) = (width * 0.5, depth * 0.5);
    let mut mesh = Mesh::new(material);
    push_quad(
        &mut mesh,
        Vec3::new(-x, 0.0, z),
        Vec3::new(x, 0.0, z),
        Vec3::new(x, 0.0, -z),
        Vec3::new(-x, 0.0, -z),
    );
    mesh
}

/// Latitude/longitude sphere
pub fn sphere_mesh(radius: f32, segments: usize, rings: usize, material: Material) -> Mesh {
    let mut mesh = Mesh::new(material);
    let point = |ring: usize, seg: usize| {
        let theta = ring as f32 * PI / rings as f32;
        let phi = seg as f32 * 2.0 * PI / segments as f32;
        Vec3::new(
            radius * theta.sin() * phi.cos(),
            radius * theta.cos(),
            radius * theta.sin() * phi.sin(),
        )
    };

    for ring in 0..rings {
        for seg in 0..segments {
            let a = point(ring, seg);
            let b = point(ring + 1, seg);
            let c = point(ring + 1, seg + 1);
            let d = point(ring, seg + 1);
            push_quad(&mut mesh, a, d, c, b);
        }
    }

    mesh
}

/// Torus in the XY plane around the Z axis
pub fn torus_mesh(
    radius: f32,
    tube: f32,
    radial_segments: usize,
    tubular_segments: usize,
    material: Material,
) -> Mesh {
    let mut mesh = Mesh::new(material);
    let point = |tube_step: usize, around: usize| {
        let u = around as f32 * 2.0 * PI / tubular_segments as f32;
        let v = tube_step as f32 * 2.0 * PI / radial_segments as f32;
        Vec3::new(
            (radius + tube * v.cos()) * u.cos(),
            (radius + tube * v.cos()) * u.sin(),
            tube * v.sin(),
        )
    };

    for j in 0..radial_segments {
        for i in 0..tubular_segments {
            let a = point(j, i);
            let b = point(j, i + 1);
            let c = point(j + 1, i + 1);
            let d = point(j + 1, i);
            push_quad(&mut mesh, a, b, c, d);
        }
    }

    mesh
}

/// Open cone frustum along Y, centered on the origin
pub fn cylinder_mesh(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    segments: usize,
    material: Material,
) -> Mesh {
    let mut mesh = Mesh::new(material);
    let half = height * 0.5;
    let rim = |radius: f32, y: f32, seg: usize| {
        let phi = seg as f32 * 2.0 * PI / segments as f32;
        Vec3::new(radius * phi.cos(), y, radius * phi.sin())
    };

    for seg in 0..segments {
        let a = rim(radius_bottom, -half, seg);
        let b = rim(radius_bottom, -half, seg + 1);
        let c = rim(radius_top, half, seg + 1);
        let d = rim(radius_top, half, seg);
        push_quad(&mut mesh, a, d, c, b);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;

    fn face_normal(mesh: &Mesh, face: &Face) -> Vec3 {
        let a = mesh.vertices[face.v0];
        let b = mesh.vertices[face.v1];
        let c = mesh.vertices[face.v2];
        (b - a).cross(c - a)
    }

    #[test]
    fn test_box_faces_point_outward() {
        let mesh = box_mesh(2.0, 4.0, 6.0, Material::solid(Color::WHITE));
        assert_eq!(mesh.triangle_count(), 12);
        for face in &mesh.faces {
            let center = (mesh.vertices[face.v0] + mesh.vertices[face.v1] + mesh.vertices[face.v2]).scale(1.0 / 3.0);
            assert!(face_normal(&mesh, face).dot(center) > 0.0);
        }
    }

    #[test]
    fn test_sphere_faces_point_outward() {
        let mesh = sphere_mesh(1.0, 12, 8, Material::solid(Color::WHITE));
        for face in &mesh.faces {
            let n = face_normal(&mesh, face);
            if n.len() < 1e-6 {
                continue; // pole slivers
            }
            let center = (mesh.vertices[face.v0] + mesh.vertices[face.v1] + mesh.vertices[face.v2]).scale(1.0 / 3.0);
            assert!(n.dot(center) > 0.0);
        }
    }

    #[test]
    fn test_torus_stays_within_outer_radius() {
        let mesh = torus_mesh(1.5, 0.2, 8, 16, Material::solid(Color::WHITE));
        for v in &mesh.vertices {
            let planar = (v.x * v.x + v.y * v.y).sqrt();
            assert!(planar <= 1.7 + 1e-4);
            assert!(v.z.abs() <= 0.2 + 1e-4);
        }
    }

    #[test]
    fn test_cylinder_is_tapered() {
        let mesh = cylinder_mesh(0.1, 0.5, 5.0, 16, Material::solid(Color::WHITE));
        let top = mesh.vertices.iter().filter(|v| v.y > 0.0).map(|v| v.x.hypot(v.z)).fold(0.0, f32::max);
        let bottom = mesh.vertices.iter().filter(|v| v.y < 0.0).map(|v| v.x.hypot(v.z)).fold(0.0, f32::max);
        assert!((top - 0.1).abs() < 1e-4);
        assert!((bottom - 0.5).abs() < 1e-4);
    }
}
