//! Procedural geometry generators.
//!
//! The layouts (vertex order, seams duplicated at `u = 1`, counter-clockwise
//! front faces) follow the conventions of the common web 3D libraries so the
//! shapes look the same as their scripted counterparts.

use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3};

use crate::{
    data_structures::model::{FlatVertex, Geometry, GeometryKind, MeshVertex},
    palette::Color,
};

fn vertex(position: Vector3<f32>, normal: Vector3<f32>) -> MeshVertex {
    MeshVertex {
        position: position.into(),
        normal: normal.into(),
    }
}

/// A `(p, q)` torus knot wound around a torus of `radius` with a circular
/// `tube` cross-section.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> Geometry {
    let curve = |u: f32| {
        let quo_over_p = q as f32 / p as f32 * u;
        let cs = quo_over_p.cos();
        Vector3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * u.sin() * 0.5,
            radius * quo_over_p.sin() * 0.5,
        )
    };

    let mut vertices = Vec::with_capacity(((tubular_segments + 1) * (radial_segments + 1)) as usize);
    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * p as f32 * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Frenet-like frame along the curve
        let t = p2 - p1;
        let n = p2 + p1;
        let b = t.cross(n).normalize();
        let n = b.cross(t).normalize();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let position = p1 + n * cx + b * cy;
            vertices.push(vertex(position, (position - p1).normalize()));
        }
    }

    let mut indices = Vec::with_capacity((tubular_segments * radial_segments * 6) as usize);
    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = (radial_segments + 1) * (j - 1) + (i - 1);
            let b = (radial_segments + 1) * j + (i - 1);
            let c = (radial_segments + 1) * j + i;
            let d = (radial_segments + 1) * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Geometry::new(GeometryKind::TorusKnot, vertices, indices)
}

/// UV sphere centred at the origin.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut vertices = Vec::new();
    let mut grid = Vec::with_capacity(height_segments as usize + 1);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let position = Vector3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            let normal = if position.magnitude2() > 0.0 {
                position.normalize()
            } else {
                Vector3::unit_y()
            };
            row.push(vertices.len() as u32);
            vertices.push(vertex(position, normal));
        }
        grid.push(row);
    }

    let mut indices = Vec::new();
    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Geometry::new(GeometryKind::Sphere, vertices, indices)
}

/// Capped cylinder along the y axis, centred at the origin. A zero top radius
/// yields a cone.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Geometry {
    let kind = if radius_top == 0.0 {
        GeometryKind::Cone
    } else {
        GeometryKind::Cylinder
    };
    let radial_segments = radial_segments.max(3);
    let half_height = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // torso: a single band from top (v = 0) to bottom (v = 1)
    let mut rows: Vec<Vec<u32>> = Vec::with_capacity(2);
    for y in 0..=1u32 {
        let v = y as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let mut row = Vec::with_capacity(radial_segments as usize + 1);
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            row.push(vertices.len() as u32);
            vertices.push(vertex(
                Vector3::new(radius * sin, -v * height + half_height, radius * cos),
                Vector3::new(sin, slope, cos).normalize(),
            ));
        }
        rows.push(row);
    }
    for x in 0..radial_segments as usize {
        let a = rows[0][x];
        let b = rows[1][x];
        let c = rows[1][x + 1];
        let d = rows[0][x + 1];
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    if radius_top > 0.0 {
        push_cap(&mut vertices, &mut indices, radius_top, half_height, radial_segments, true);
    }
    if radius_bottom > 0.0 {
        push_cap(&mut vertices, &mut indices, radius_bottom, -half_height, radial_segments, false);
    }

    Geometry::new(kind, vertices, indices)
}

pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Geometry {
    cylinder(0.0, radius, height, radial_segments)
}

fn push_cap(
    vertices: &mut Vec<MeshVertex>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    radial_segments: u32,
    top: bool,
) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = Vector3::new(0.0, sign, 0.0);

    let center_start = vertices.len() as u32;
    for _ in 0..radial_segments {
        vertices.push(vertex(Vector3::new(0.0, y, 0.0), normal));
    }
    let ring_start = vertices.len() as u32;
    for x in 0..=radial_segments {
        let theta = x as f32 / radial_segments as f32 * TAU;
        vertices.push(vertex(
            Vector3::new(radius * theta.sin(), y, radius * theta.cos()),
            normal,
        ));
    }
    for x in 0..radial_segments {
        let center = center_start + x;
        let i = ring_start + x;
        if top {
            indices.extend_from_slice(&[i, i + 1, center]);
        } else {
            indices.extend_from_slice(&[i + 1, i, center]);
        }
    }
}

/// Torus in the xy plane around the z axis.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Geometry {
    let mut vertices = Vec::new();
    for j in 0..=radial_segments {
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let v = j as f32 / radial_segments as f32 * TAU;
            let position = Vector3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vector3::new(radius * u.cos(), radius * u.sin(), 0.0);
            vertices.push(vertex(position, (position - center).normalize()));
        }
    }

    let mut indices = Vec::new();
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = (tubular_segments + 1) * j + i - 1;
            let b = (tubular_segments + 1) * (j - 1) + i - 1;
            let c = (tubular_segments + 1) * (j - 1) + i;
            let d = (tubular_segments + 1) * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Geometry::new(GeometryKind::Torus, vertices, indices)
}

/// Axis-aligned box centred at the origin, four vertices per face.
pub fn cuboid(width: f32, height: f32, depth: f32) -> Geometry {
    let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
    // normal, then the face's u and v axes chosen so u x v = normal
    let faces = [
        (Vector3::unit_x(), -Vector3::unit_z(), Vector3::unit_y()),
        (-Vector3::unit_x(), Vector3::unit_z(), Vector3::unit_y()),
        (Vector3::unit_y(), Vector3::unit_x(), -Vector3::unit_z()),
        (-Vector3::unit_y(), Vector3::unit_x(), Vector3::unit_z()),
        (Vector3::unit_z(), Vector3::unit_x(), Vector3::unit_y()),
        (-Vector3::unit_z(), -Vector3::unit_x(), Vector3::unit_y()),
    ];
    let half = Vector3::new(hx, hy, hz);
    let scale = |v: Vector3<f32>| Vector3::new(v.x * half.x, v.y * half.y, v.z * half.z);

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let start = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = normal + u * su + v * sv;
            vertices.push(vertex(scale(corner), normal));
        }
        indices.extend_from_slice(&[start, start + 1, start + 2, start, start + 2, start + 3]);
    }

    Geometry::new(GeometryKind::Cuboid, vertices, indices)
}

/// Line-list vertices of a square floor grid in the xz plane.
pub fn grid_lines(size: f32, divisions: u32, center: Color, lines: Color) -> Vec<FlatVertex> {
    let divisions = divisions.max(1);
    let step = size / divisions as f32;
    let half = size / 2.0;
    let center_line = divisions / 2;
    let center = center.to_linear();
    let lines = lines.to_linear();

    let mut vertices = Vec::with_capacity((divisions as usize + 1) * 4);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if i == center_line { center } else { lines };
        for position in [[-half, 0.0, k], [half, 0.0, k], [k, 0.0, -half], [k, 0.0, half]] {
            vertices.push(FlatVertex { position, color });
        }
    }
    vertices
}
