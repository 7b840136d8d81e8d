//! Wireframe geometry for ships and the planet
//!
//! Everything is emitted as line-list vertex pairs in world space.

use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

use super::vertex::{LineVertex, colors};
use crate::sim::{Planet, Ship, ShipKind};

/// Meridians and parallels on the planet
const PLANET_MERIDIANS: u32 = 16;
const PLANET_PARALLELS: u32 = 10;
/// Segments per planet circle
const PLANET_SEGMENTS: u32 = 32;
/// Cockpit ball resolution on twin-wing ships
const COCKPIT_SEGMENTS: u32 = 8;

fn push_line(out: &mut Vec<LineVertex>, transform: &Mat4, a: Vec3, b: Vec3, color: [f32; 4]) {
    out.push(LineVertex::new(transform.transform_point3(a).to_array(), color));
    out.push(LineVertex::new(transform.transform_point3(b).to_array(), color));
}

/// Edges of an axis-aligned box centered on the local origin
pub fn wire_box(out: &mut Vec<LineVertex>, transform: &Mat4, size: Vec3, color: [f32; 4]) {
    let h = size * 0.5;
    let corner = |i: u32| {
        Vec3::new(
            if i & 1 == 0 { -h.x } else { h.x },
            if i & 2 == 0 { -h.y } else { h.y },
            if i & 4 == 0 { -h.z } else { h.z },
        )
    };
    // Corners that differ in exactly one bit share an edge
    for i in 0..8u32 {
        for bit in [1u32, 2, 4] {
            let j = i | bit;
            if j != i {
                push_line(out, transform, corner(i), corner(j), color);
            }
        }
    }
}

/// Latitude/longitude wire sphere centered on the local origin
pub fn wire_sphere(
    out: &mut Vec<LineVertex>,
    transform: &Mat4,
    radius: f32,
    meridians: u32,
    parallels: u32,
    segments: u32,
    color: [f32; 4],
) {
    let point = |theta: f32, phi: f32| {
        Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.cos(),
            radius * phi.sin() * theta.sin(),
        )
    };

    for m in 0..meridians {
        let theta = m as f32 / meridians as f32 * TAU;
        for s in 0..segments {
            let phi1 = s as f32 / segments as f32 * PI;
            let phi2 = (s + 1) as f32 / segments as f32 * PI;
            push_line(out, transform, point(theta, phi1), point(theta, phi2), color);
        }
    }

    for p in 1..parallels {
        let phi = p as f32 / parallels as f32 * PI;
        for s in 0..segments {
            let theta1 = s as f32 / segments as f32 * TAU;
            let theta2 = (s + 1) as f32 / segments as f32 * TAU;
            push_line(out, transform, point(theta1, phi), point(theta2, phi), color);
        }
    }
}

/// Wireframe for a decorative ship at its current position and bank
pub fn ship_lines(out: &mut Vec<LineVertex>, ship: &Ship) {
    let mut color = colors::WIREFRAME;
    color[3] = colors::SHIP_ALPHA;
    let base = Mat4::from_translation(ship.pos) * Mat4::from_rotation_z(ship.roll);

    match ship.kind {
        ShipKind::Interceptor => {
            wire_box(out, &base, Vec3::new(0.3, 0.3, 2.0), color);
            let wing = Vec3::new(1.5, 0.05, 0.6);
            for angle in [PI / 5.0, -PI / 5.0] {
                wire_box(out, &(base * Mat4::from_rotation_z(angle)), wing, color);
            }
        }
        ShipKind::TwinWing => {
            wire_sphere(out, &base, 0.35, COCKPIT_SEGMENTS, 4, COCKPIT_SEGMENTS, color);
            let panel = Vec3::new(0.05, 1.5, 1.2);
            for x in [0.6, -0.6] {
                wire_box(out, &(base * Mat4::from_translation(Vec3::X * x)), panel, color);
            }
        }
    }
}

/// Wireframe for the planet
pub fn planet_lines(out: &mut Vec<LineVertex>, planet: &Planet) {
    let mut color = colors::WIREFRAME;
    color[3] = planet.opacity.clamp(0.0, 1.0);
    let transform = Mat4::from_translation(planet.center) * Mat4::from_rotation_y(planet.spin);
    wire_sphere(
        out,
        &transform,
        planet.radius,
        PLANET_MERIDIANS,
        PLANET_PARALLELS,
        PLANET_SEGMENTS,
        color,
    );
}
