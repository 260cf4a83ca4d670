//! Font-backed rasterizer using cosmic-text
//!
//! Glyphs are shaped bold, rasterized to a coverage mask through the swash
//! cache, then turned into an outline stroke.

use std::path::Path;
use std::sync::Arc;

use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent, Weight, fontdb,
};
use glam::Vec2;

use super::{AlphaSurface, GlyphRasterizer, stroke_outline};
use crate::error::RevealError;

pub struct CosmicRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    /// Family to request; generic sans-serif when `None`
    family: Option<String>,
}

impl CosmicRasterizer {
    /// Rasterizer over the installed system fonts
    pub fn with_system_fonts() -> Self {
        let font_system = FontSystem::new();
        if font_system.db().is_empty() {
            log::warn!("No system fonts found; glyphs will rasterize empty");
        }
        Self {
            font_system,
            swash_cache: SwashCache::new(),
            family: None,
        }
    }

    /// Rasterizer over a single font file
    pub fn from_font_file(path: &Path) -> Result<Self, RevealError> {
        let data = std::fs::read(path)
            .map_err(|e| RevealError::FontLoad(format!("{}: {}", path.display(), e)))?;
        let rasterizer = Self::from_font_data(data)
            .map_err(|e| RevealError::FontLoad(format!("{}: {}", path.display(), e)))?;
        log::info!("Loaded font from {}", path.display());
        Ok(rasterizer)
    }

    /// Rasterizer over in-memory font bytes (TTF/OTF)
    pub fn from_font_data(data: Vec<u8>) -> Result<Self, RevealError> {
        let mut db = fontdb::Database::new();
        db.load_font_source(fontdb::Source::Binary(Arc::new(data)));
        let family = db
            .faces()
            .next()
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .ok_or_else(|| RevealError::FontLoad("no usable font faces".into()))?;
        log::info!("Using font family '{}'", family);

        Ok(Self {
            font_system: FontSystem::new_with_locale_and_db("en-US".to_string(), db),
            swash_cache: SwashCache::new(),
            family: Some(family),
        })
    }

    /// Whether any font is available to rasterize with
    pub fn has_fonts(&self) -> bool {
        !self.font_system.db().is_empty()
    }

    fn shape(&mut self, text: &str, font_size: f32) -> Buffer {
        // Line height equals font size so the em box spans the whole line
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(font_size, font_size));
        buffer.set_size(&mut self.font_system, None, None);
        let family = match &self.family {
            Some(name) => Family::Name(name.as_str()),
            None => Family::SansSerif,
        };
        let attrs = Attrs::new().family(family).weight(Weight::BOLD);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }
}

impl GlyphRasterizer for CosmicRasterizer {
    fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        let buffer = self.shape(text, font_size);
        buffer.layout_runs().map(|run| run.line_w).fold(0.0, f32::max)
    }

    fn draw_glyph(
        &mut self,
        ch: char,
        font_size: f32,
        stroke_width: f32,
        center: Vec2,
        surface: &mut AlphaSurface,
    ) {
        let mut text = [0u8; 4];
        let buffer = self.shape(ch.encode_utf8(&mut text), font_size);

        for run in buffer.layout_runs() {
            let origin_x = center.x - run.line_w / 2.0;
            let line_top = center.y - font_size / 2.0;

            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((origin_x, line_top + run.line_y), 1.0);
                let Some(image) = self.swash_cache.get_image(&mut self.font_system, physical.cache_key)
                else {
                    continue;
                };

                let width = image.placement.width as usize;
                let height = image.placement.height as usize;
                if width == 0 || height == 0 {
                    continue;
                }

                let coverage: Vec<u8> = match image.content {
                    SwashContent::Mask => image.data.clone(),
                    SwashContent::Color => image.data.chunks_exact(4).map(|px| px[3]).collect(),
                    SwashContent::SubpixelMask => image
                        .data
                        .chunks_exact(4)
                        .map(|px| px[0].max(px[1]).max(px[2]))
                        .collect(),
                };
                if coverage.len() < width * height {
                    continue;
                }

                let (outline, pad) = stroke_outline(&coverage, width, height, stroke_width);
                let left = physical.x + image.placement.left - pad as i32;
                let top = physical.y - image.placement.top - pad as i32;
                surface.stamp(left, top, width + 2 * pad, height + 2 * pad, &outline);
            }
        }
    }
}
