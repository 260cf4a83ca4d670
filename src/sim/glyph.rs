//! Glyph sampler
//!
//! Rasterizes every character of the configured lines on its own and keeps a
//! sparse grid of the pixels it covers. Coordinates are absolute surface
//! pixels, so the whole layout is rebuilt whenever the surface is resized.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::index::{PointIndex, quantize};
use crate::consts::{ALPHA_THRESHOLD, SAMPLE_STRIDE};
use crate::raster::{AlphaSurface, GlyphRasterizer};

/// One sampled pixel of a glyph outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f32,
    pub y: f32,
}

impl SamplePoint {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn distance_squared(self, other: SamplePoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// All points of one character occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterGroup {
    pub character: char,
    /// Position across all lines; unique and contiguous within one layout
    pub ordinal: usize,
    pub line: usize,
    /// Empty for characters with no visible pixels (spaces)
    pub points: Vec<SamplePoint>,
}

/// Inputs to one sampling pass
#[derive(Debug, Clone, Copy)]
pub struct SampleParams<'a> {
    pub lines: &'a [String],
    pub font_size: f32,
    pub line_spacing: f32,
    pub stroke_width: f32,
    pub surface_width: usize,
    pub surface_height: usize,
}

/// Output of one sampling pass
#[derive(Debug, Clone, Default)]
pub struct GlyphLayout {
    /// Every point of every character, in character order
    pub points: Vec<SamplePoint>,
    /// One group per character, indexed by ordinal
    pub groups: Vec<CharacterGroup>,
    pub index: PointIndex,
}

impl GlyphLayout {
    #[inline]
    pub fn group(&self, ordinal: usize) -> Option<&CharacterGroup> {
        self.groups.get(ordinal)
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Vertical center of each line
///
/// The block of lines is centered on the surface; each line sits in the
/// middle of its own `line_spacing` band.
pub fn line_centers(line_count: usize, line_spacing: f32, surface_height: f32) -> Vec<f32> {
    let total_height = line_count as f32 * line_spacing;
    let start_y = (surface_height - total_height) / 2.0 + line_spacing / 2.0;
    (0..line_count)
        .map(|i| start_y + i as f32 * line_spacing)
        .collect()
}

/// Sample every character of `params.lines`.
pub fn sample_text<R: GlyphRasterizer + ?Sized>(
    rasterizer: &mut R,
    params: &SampleParams<'_>,
) -> GlyphLayout {
    let mut layout = GlyphLayout::default();
    let mut surface = AlphaSurface::new(params.surface_width, params.surface_height);
    let centers = line_centers(
        params.lines.len(),
        params.line_spacing,
        params.surface_height as f32,
    );

    for (line_index, (line, &center_y)) in params.lines.iter().zip(&centers).enumerate() {
        let full_width = rasterizer.measure(line, params.font_size);
        let mut cursor_x = (params.surface_width as f32 - full_width) / 2.0;

        for character in line.chars() {
            let mut buf = [0u8; 4];
            let char_width = rasterizer.measure(character.encode_utf8(&mut buf), params.font_size);
            let ordinal = layout.groups.len();

            surface.clear();
            rasterizer.draw_glyph(
                character,
                params.font_size,
                params.stroke_width,
                Vec2::new(cursor_x + char_width / 2.0, center_y),
                &mut surface,
            );

            let mut points = Vec::new();
            surface.for_each_sample(SAMPLE_STRIDE, ALPHA_THRESHOLD, |x, y| {
                let point = SamplePoint::new(x as f32, y as f32);
                if let Some(key) = quantize(point.x, point.y) {
                    layout.index.insert(key, ordinal);
                }
                points.push(point);
            });
            layout.points.extend_from_slice(&points);

            layout.groups.push(CharacterGroup {
                character,
                ordinal,
                line: line_index,
                points,
            });

            cursor_x += char_width;
        }
    }

    log::info!(
        "Sampled {} characters on {} lines: {} points, {} index keys",
        layout.groups.len(),
        params.lines.len(),
        layout.points.len(),
        layout.index.len()
    );
    layout
}
