//! 2D polygon helpers for boundary shapes in a segment's horizontal plane.
//!
//! A boundary point `Vec2(x, y)` maps to local 3D `(x, _, y)`.

use glam::Vec2;
use std::f32::consts::TAU;

/// Signed shoelace area. Positive when vertices run counter-clockwise in (x, y),
/// i.e. with increasing angle for points `(cos θ, sin θ)`.
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        twice += a.x * b.y - b.x * a.y;
    }
    twice * 0.5
}

/// Area centroid. Falls back to the vertex average for degenerate (zero-area) input.
pub fn centroid(polygon: &[Vec2]) -> Vec2 {
    if polygon.is_empty() {
        return Vec2::ZERO;
    }
    let area = signed_area(polygon);
    if area.abs() < 1e-9 {
        return polygon.iter().copied().sum::<Vec2>() / polygon.len() as f32;
    }
    let mut c = Vec2::ZERO;
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        let cross = a.x * b.y - b.x * a.y;
        c += (*a + b) * cross;
    }
    c / (6.0 * area)
}

/// Regular polygon approximating a circle, counter-clockwise from angle 0.
pub fn circle_polygon(center: Vec2, radius: f32, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let angle = i as f32 * TAU / segments as f32;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Pie slice of a circle centred at the origin, from `start` to `end` radians.
/// Vertex 0 is the centre, followed by arc points in increasing angle, so a
/// fan from vertex 0 covers the slice even when it spans more than half the circle.
/// `arc_segments` is the resolution of a full circle.
pub fn sector_polygon(radius: f32, start: f32, end: f32, arc_segments: usize) -> Vec<Vec2> {
    let span = (end - start).clamp(0.0, TAU);
    let steps = ((span / TAU) * arc_segments.max(3) as f32).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(Vec2::ZERO);
    for i in 0..=steps {
        let angle = start + span * i as f32 / steps as f32;
        points.push(Vec2::new(angle.cos(), angle.sin()) * radius);
    }
    points
}

/// Reverse in place if the polygon winds clockwise. Returns true if it was reversed.
pub fn ensure_counter_clockwise(polygon: &mut [Vec2]) -> bool {
    if signed_area(polygon) < 0.0 {
        polygon.reverse();
        true
    } else {
        false
    }
}

/// Axis-aligned bounds `(min, max)`; `None` for an empty polygon.
pub fn bounds(polygon: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *polygon.first()?;
    Some(
        polygon
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
    )
}
