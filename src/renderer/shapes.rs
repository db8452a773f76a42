//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in pixel coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors, lerp_color, with_alpha};
use crate::sim::ParticleShape;

/// Color along the ECG gradient for horizontal position `t` in [0, 1]
pub fn ecg_gradient(t: f32, alpha: f32) -> [f32; 4] {
    let stops = &colors::ECG_GRADIENT;
    let span = (stops.len() - 1) as f32;
    let scaled = t.clamp(0.0, 1.0) * span;
    let i = (scaled.floor() as usize).min(stops.len() - 2);
    let c = lerp_color(stops[i], stops[i + 1], scaled - i as f32);
    with_alpha(c, alpha)
}

/// Generate vertices for a thick polyline.
///
/// Joints use the averaged normal of the two adjacent segments (a cheap
/// miter), which is plenty for a smooth, densely sampled trace. `color_at`
/// receives each point's index and returns its color.
pub fn polyline(points: &[Vec2], width: f32, color_at: impl Fn(usize) -> [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let half = width / 2.0;
    let normals: Vec<Vec2> = (0..points.len())
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(points.len() - 1)];
            let dir = (next - prev).normalize_or_zero();
            Vec2::new(-dir.y, dir.x)
        })
        .collect();

    let mut vertices = Vec::with_capacity((points.len() - 1) * 6);
    for i in 0..points.len() - 1 {
        let (p1, p2) = (points[i], points[i + 1]);
        let (c1, c2) = (color_at(i), color_at(i + 1));

        let v1a = p1 + normals[i] * half;
        let v1b = p1 - normals[i] * half;
        let v2a = p2 + normals[i + 1] * half;
        let v2b = p2 - normals[i + 1] * half;

        // Two triangles
        vertices.push(Vertex::new(v1a.x, v1a.y, c1));
        vertices.push(Vertex::new(v1b.x, v1b.y, c1));
        vertices.push(Vertex::new(v2a.x, v2a.y, c2));

        vertices.push(Vertex::new(v2a.x, v2a.y, c2));
        vertices.push(Vertex::new(v1b.x, v1b.y, c1));
        vertices.push(Vertex::new(v2b.x, v2b.y, c2));
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    radial_gradient(center, radius, color, color, segments)
}

/// Circle whose color fades from `inner` at the center to `outer` at the rim
pub fn radial_gradient(
    center: Vec2,
    radius: f32,
    inner: [f32; 4],
    outer: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, inner));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            outer,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            outer,
        ));
    }

    vertices
}

/// Convex polygon as a fan around `center`, with a lighter core
fn fan(center: Vec2, corners: &[Vec2], inner: [f32; 4], outer: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(corners.len() * 3);
    for (i, a) in corners.iter().enumerate() {
        let b = corners[(i + 1) % corners.len()];
        vertices.push(Vertex::new(center.x, center.y, inner));
        vertices.push(Vertex::new(a.x, a.y, outer));
        vertices.push(Vertex::new(b.x, b.y, outer));
    }
    vertices
}

/// Axis-aligned rectangle with per-corner colors (top-left, top-right, bottom-right, bottom-left)
pub fn rect(min: Vec2, max: Vec2, corner_colors: [[f32; 4]; 4]) -> Vec<Vertex> {
    let [tl, tr, br, bl] = corner_colors;
    vec![
        Vertex::new(min.x, min.y, tl),
        Vertex::new(max.x, min.y, tr),
        Vertex::new(min.x, max.y, bl),
        Vertex::new(min.x, max.y, bl),
        Vertex::new(max.x, min.y, tr),
        Vertex::new(max.x, max.y, br),
    ]
}

/// Generate vertices for one particle outline of the given kind.
///
/// `extent` is the full width of the shape's bounding box. Fill fades from
/// `color` at the center to 20% of its alpha at the edge.
pub fn particle_shape(
    kind: ParticleShape,
    center: Vec2,
    extent: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let half = extent / 2.0;
    let outer = with_alpha(color, color[3] * 0.2);
    match kind {
        ParticleShape::Circle => radial_gradient(center, half, color, outer, segments),
        ParticleShape::Square => {
            let corners = [
                center + Vec2::new(-half, -half),
                center + Vec2::new(half, -half),
                center + Vec2::new(half, half),
                center + Vec2::new(-half, half),
            ];
            fan(center, &corners, color, outer)
        }
        ParticleShape::Diamond => {
            let corners = [
                center + Vec2::new(0.0, -half),
                center + Vec2::new(half, 0.0),
                center + Vec2::new(0.0, half),
                center + Vec2::new(-half, 0.0),
            ];
            fan(center, &corners, color, outer)
        }
        ParticleShape::Hexagon => {
            // Pointy-top: first corner straight up
            let corners: Vec<Vec2> = (0..6)
                .map(|i| {
                    let angle = i as f32 * PI / 3.0 - PI / 2.0;
                    center + Vec2::new(half * angle.cos(), half * angle.sin())
                })
                .collect();
            fan(center, &corners, color, outer)
        }
    }
}

/// Generate vertices for a square grid of 1px lines covering `min..max`
pub fn grid(min: Vec2, max: Vec2, spacing: f32, color: [f32; 4]) -> Vec<Vertex> {
    if spacing <= 0.0 {
        return Vec::new();
    }
    let mut vertices = Vec::new();
    let half = 0.5;

    let mut x = min.x;
    while x <= max.x {
        vertices.extend(rect(
            Vec2::new(x - half, min.y),
            Vec2::new(x + half, max.y),
            [color; 4],
        ));
        x += spacing;
    }

    let mut y = min.y;
    while y <= max.y {
        vertices.extend(rect(
            Vec2::new(min.x, y - half),
            Vec2::new(max.x, y + half),
            [color; 4],
        ));
        y += spacing;
    }

    vertices
}
