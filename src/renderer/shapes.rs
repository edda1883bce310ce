//! Shape generation for 2D primitives
//!
//! All vertices are produced in world coordinates; the pipeline maps them to
//! NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{Bucket, Raindrop, Rect, World};

/// Segments used for the round part of a raindrop
const DROP_SEGMENTS: u32 = 20;

/// Two triangles covering a rectangle
pub fn quad(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (l, b, r, t) = (rect.pos.x, rect.pos.y, rect.right(), rect.top());
    vec![
        Vertex::new(l, b, color),
        Vertex::new(r, b, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(l, t, color),
    ]
}

/// Single triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Tapered bucket with a rim and a metal band, inside its bounding box
pub fn bucket(bucket: &Bucket) -> Vec<Vertex> {
    let Vec2 { x, y } = bucket.pos;
    let s = bucket.size;
    let mut vertices = Vec::with_capacity(24);

    // Body: trapezoid, narrower at the bottom
    let bl = Vec2::new(x + s * 0.18, y + s * 0.04);
    let br = Vec2::new(x + s * 0.82, y + s * 0.04);
    let tr = Vec2::new(x + s * 0.94, y + s * 0.8);
    let tl = Vec2::new(x + s * 0.06, y + s * 0.8);
    vertices.extend(triangle(bl, br, tr, colors::BUCKET_BODY));
    vertices.extend(triangle(bl, tr, tl, colors::BUCKET_BODY));

    vertices.extend(quad(
        &Rect::new(x + s * 0.12, y + s * 0.36, s * 0.76, s * 0.08),
        colors::BUCKET_BAND,
    ));
    vertices.extend(quad(&Rect::new(x, y + s * 0.8, s, s * 0.1), colors::BUCKET_RIM));

    vertices
}

/// Teardrop: round bottom with a pointed top, plus a small highlight
pub fn raindrop(drop: &Raindrop) -> Vec<Vertex> {
    let s = drop.size;
    let center = Vec2::new(drop.pos.x + s * 0.5, drop.pos.y + s * 0.38);
    let radius = s * 0.24;

    let mut vertices = circle(center, radius, colors::RAINDROP, DROP_SEGMENTS);
    vertices.extend(triangle(
        center + Vec2::new(-radius, 0.0),
        center + Vec2::new(radius, 0.0),
        Vec2::new(center.x, drop.pos.y + s * 0.92),
        colors::RAINDROP,
    ));
    vertices.extend(circle(
        center + Vec2::new(-radius * 0.35, radius * 0.25),
        radius * 0.25,
        colors::RAINDROP_SHINE,
        8,
    ));
    vertices
}

/// Everything the renderer draws for one frame
pub fn world_vertices(world: &World) -> Vec<Vertex> {
    let mut vertices = bucket(&world.bucket);
    for drop in &world.raindrops {
        vertices.extend(raindrop(drop));
    }
    vertices
}
