//! Font-free rasterizer
//!
//! Every visible character is a stroked rectangle with a fixed advance. Used
//! when no font is available and wherever output must not depend on the host.

use glam::Vec2;

use super::{AlphaSurface, GlyphRasterizer};

/// Advance width as a fraction of font size
const ADVANCE: f32 = 0.6;
/// Glyph box width as a fraction of font size
const BOX_WIDTH: f32 = 0.5;
/// Glyph box height as a fraction of font size
const BOX_HEIGHT: f32 = 0.7;

#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRasterizer;

impl BlockRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl GlyphRasterizer for BlockRasterizer {
    fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * ADVANCE
    }

    fn draw_glyph(
        &mut self,
        ch: char,
        font_size: f32,
        stroke_width: f32,
        center: Vec2,
        surface: &mut AlphaSurface,
    ) {
        if ch.is_whitespace() {
            return;
        }

        let half = Vec2::new(font_size * BOX_WIDTH, font_size * BOX_HEIGHT) * 0.5;
        let outer_min = (center - half).round();
        let outer_max = (center + half).round();
        let inner_min = outer_min + Vec2::splat(stroke_width);
        let inner_max = outer_max - Vec2::splat(stroke_width);

        for y in outer_min.y as i32..outer_max.y as i32 {
            for x in outer_min.x as i32..outer_max.x as i32 {
                let (fx, fy) = (x as f32, y as f32);
                let in_hole =
                    fx >= inner_min.x && fx < inner_max.x && fy >= inner_min.y && fy < inner_max.y;
                if !in_hole {
                    surface.plot(x, y, 255);
                }
            }
        }
    }
}
