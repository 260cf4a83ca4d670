//! CPU-side frame preparation
//!
//! Turns a scene and the engine's particle stream into one triangle list.
//! Uploading and drawing it is up to the host.

pub mod shapes;
pub mod vertex;

pub use vertex::{Vertex, as_floats, colors};

use glam::Vec2;

use crate::engine::{PARTICLE_STRIDE, particles};
use crate::sim::{BoxChoice, Rect, SceneState};

/// Radius of a revealed text dot
pub const REVEAL_DOT_RADIUS: f32 = 1.5;
/// Radius of the glow behind each dot
pub const REVEAL_GLOW_RADIUS: f32 = 3.0;
/// Border drawn around a hovered box
const HOVER_BORDER: f32 = 2.0;

/// Build the triangle list for one frame.
///
/// Draw order: background, particles, revealed text, boxes.
pub fn build_frame(scene: &SceneState, particle_data: &[f32]) -> Vec<Vertex> {
    let revealed = scene.reveal.revealed().points();
    let dot_segments = shapes::segments_for_radius(REVEAL_DOT_RADIUS);
    let glow_segments = shapes::segments_for_radius(REVEAL_GLOW_RADIUS);
    let mut out = Vec::with_capacity(
        6 + particle_data.len() / PARTICLE_STRIDE * 3 * 8
            + revealed.len() * 3 * (dot_segments + glow_segments) as usize
            + 6 * 10,
    );

    let world = Rect::new(0.0, 0.0, scene.world.x, scene.world.y);
    shapes::push_quad(&mut out, &world, colors::BACKGROUND);

    for (center, radius, rgba) in particles(particle_data) {
        if !center.is_finite() || radius.is_nan() || radius <= 0.0 {
            continue;
        }
        shapes::push_circle(&mut out, center, radius, rgba, shapes::segments_for_radius(radius));
    }

    for p in revealed {
        let center = Vec2::new(p.x, p.y);
        shapes::push_circle(&mut out, center, REVEAL_GLOW_RADIUS, colors::REVEAL_GLOW, glow_segments);
        shapes::push_circle(&mut out, center, REVEAL_DOT_RADIUS, colors::REVEAL, dot_segments);
    }

    let hovered = scene.pointer.and_then(|p| scene.hit_test(p));
    let boxes = [
        (scene.yes_box, colors::YES_BOX, colors::YES_BOX_HOVER, BoxChoice::Yes),
        (scene.no_box(), colors::NO_BOX, colors::NO_BOX_HOVER, BoxChoice::No),
    ];
    for (rect, color, hover_color, choice) in boxes {
        if hovered == Some(choice) {
            shapes::push_quad(&mut out, &rect, hover_color);
            shapes::push_outline(&mut out, &rect, HOVER_BORDER, colors::REVEAL);
        } else {
            shapes::push_quad(&mut out, &rect, color);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BlockRasterizer;
    use crate::sim::TextStyle;

    fn scene() -> SceneState {
        let style = TextStyle {
            lines: vec!["ok".to_string()],
            font_size: 40.0,
            line_spacing: 50.0,
            stroke_width: 4.0,
        };
        SceneState::new(&mut BlockRasterizer::new(), style, 800.0, 600.0, 3)
    }

    #[test]
    fn test_empty_frame_has_background_and_boxes() {
        let verts = build_frame(&scene(), &[]);
        assert_eq!(verts.len(), 6 * 3);
        assert_eq!(verts[0].color, colors::BACKGROUND);
        assert_eq!(verts[6].color, colors::YES_BOX);
        assert_eq!(verts[12].color, colors::NO_BOX);
    }

    #[test]
    fn test_particles_and_reveals_are_drawn() {
        let mut scene = scene();
        let p = scene.layout.points[0];
        scene.reveal.absorb(&[p.x, p.y], &scene.layout, &mut scene.rng);
        let revealed = scene.reveal.revealed().len();
        assert!(revealed > 0);

        let data = [100.0, 100.0, 2.0, 1.0, 0.5, 0.5, 0.8];
        let verts = build_frame(&scene, &data);

        let particle = shapes::segments_for_radius(2.0) as usize * 3;
        let per_reveal = (shapes::segments_for_radius(REVEAL_DOT_RADIUS)
            + shapes::segments_for_radius(REVEAL_GLOW_RADIUS)) as usize
            * 3;
        assert_eq!(verts.len(), 6 + particle + revealed * per_reveal + 12);
        assert_eq!(verts[6].color, [1.0, 0.5, 0.5, 0.8]);
    }

    #[test]
    fn test_hovered_box_gets_border() {
        let mut scene = scene();
        scene.pointer = Some(scene.yes_box.center());
        let verts = build_frame(&scene, &[]);
        assert_eq!(verts.len(), 6 + 6 + 24 + 6);
        assert_eq!(verts[6].color, colors::YES_BOX_HOVER);
    }

    #[test]
    fn test_bad_particle_records_skipped() {
        let data = [f32::NAN, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0, 5.0, 5.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        assert_eq!(build_frame(&scene(), &data).len(), 18);
    }
}
