//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Fewest triangles used for any circle
const MIN_SEGMENTS: u32 = 6;
/// Most triangles used for any circle
const MAX_SEGMENTS: u32 = 32;

/// Segment count that keeps edges smooth at a given radius
pub fn segments_for_radius(radius: f32) -> u32 {
    ((radius * 2.0).ceil() as u32).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    push_circle(&mut vertices, center, radius, color, segments);
    vertices
}

/// Append a filled circle to `out`
pub fn push_circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Append a filled axis-aligned rectangle (two triangles)
pub fn push_quad(out: &mut Vec<Vertex>, rect: &Rect, color: [f32; 4]) {
    let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());
    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x0, y1, color));

    out.push(Vertex::new(x0, y1, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x1, y1, color));
}

/// Append a rectangle border of the given thickness, drawn inside `rect`
pub fn push_outline(out: &mut Vec<Vertex>, rect: &Rect, thickness: f32, color: [f32; 4]) {
    let t = thickness.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    let inner_h = rect.height - 2.0 * t;
    for edge in [
        Rect::new(rect.x, rect.y, rect.width, t),
        Rect::new(rect.x, rect.bottom() - t, rect.width, t),
        Rect::new(rect.x, rect.y + t, t, inner_h),
        Rect::new(rect.right() - t, rect.y + t, t, inner_h),
    ] {
        push_quad(out, &edge, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_triangle_count() {
        let verts = circle(Vec2::new(5.0, 5.0), 2.0, [1.0; 4], 8);
        assert_eq!(verts.len(), 24);
        for v in &verts {
            let d = Vec2::from(v.position).distance(Vec2::new(5.0, 5.0));
            assert!(d <= 2.0 + 1e-4);
        }
    }

    #[test]
    fn test_segments_clamped() {
        assert_eq!(segments_for_radius(0.5), MIN_SEGMENTS);
        assert_eq!(segments_for_radius(10.0), 20);
        assert_eq!(segments_for_radius(100.0), MAX_SEGMENTS);
    }

    #[test]
    fn test_quad_covers_rect() {
        let mut out = Vec::new();
        push_quad(&mut out, &Rect::new(1.0, 2.0, 3.0, 4.0), [1.0; 4]);
        assert_eq!(out.len(), 6);
        let xs: Vec<f32> = out.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().copied().fold(f32::MAX, f32::min), 1.0);
        assert_eq!(xs.iter().copied().fold(f32::MIN, f32::max), 4.0);
        assert_eq!(ys.iter().copied().fold(f32::MAX, f32::min), 2.0);
        assert_eq!(ys.iter().copied().fold(f32::MIN, f32::max), 6.0);
    }

    #[test]
    fn test_outline_is_four_quads() {
        let mut out = Vec::new();
        push_outline(&mut out, &Rect::new(0.0, 0.0, 70.0, 40.0), 2.0, [1.0; 4]);
        assert_eq!(out.len(), 24);
    }
}
