//! Glyph rasterization
//!
//! A rasterizer draws one stroked glyph at a time into an [`AlphaSurface`],
//! the offscreen scratch buffer the glyph sampler reads back.

pub mod block;
pub mod cosmic;

pub use block::BlockRasterizer;
pub use cosmic::CosmicRasterizer;

use glam::Vec2;

/// Draws stroked, bold glyphs into an alpha surface.
pub trait GlyphRasterizer {
    /// Advance width of `text` set at `font_size`
    fn measure(&mut self, text: &str, font_size: f32) -> f32;

    /// Stroke the outline of `ch` centered on `center`.
    ///
    /// Horizontal centering is on the advance box, vertical on the middle of
    /// the em box. Pixels already on the surface are kept (max blend).
    fn draw_glyph(
        &mut self,
        ch: char,
        font_size: f32,
        stroke_width: f32,
        center: Vec2,
        surface: &mut AlphaSurface,
    );
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for Box<R> {
    fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        (**self).measure(text, font_size)
    }

    fn draw_glyph(
        &mut self,
        ch: char,
        font_size: f32,
        stroke_width: f32,
        center: Vec2,
        surface: &mut AlphaSurface,
    ) {
        (**self).draw_glyph(ch, font_size, stroke_width, center, surface)
    }
}

/// Inclusive pixel bounds touched since the last clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

/// Single-channel offscreen surface
#[derive(Debug, Clone)]
pub struct AlphaSurface {
    width: usize,
    height: usize,
    data: Vec<u8>,
    dirty: Option<DirtyRect>,
}

impl AlphaSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
            dirty: None,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Alpha at a pixel (0 outside the surface)
    #[inline]
    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.data[y * self.width + x]
        } else {
            0
        }
    }

    /// Zero everything drawn since the last clear
    pub fn clear(&mut self) {
        if let Some(rect) = self.dirty.take() {
            for y in rect.min_y..=rect.max_y {
                let row = y * self.width;
                self.data[row + rect.min_x..=row + rect.max_x].fill(0);
            }
        }
    }

    /// Max-blend one pixel, clipped to the surface
    pub fn plot(&mut self, x: i32, y: i32, alpha: u8) {
        if alpha == 0 || x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let px = &mut self.data[y * self.width + x];
        *px = (*px).max(alpha);
        self.mark_dirty(x, y);
    }

    /// Max-blend a `width`×`height` row-major mask with its top-left at (`left`, `top`)
    pub fn stamp(&mut self, left: i32, top: i32, width: usize, height: usize, mask: &[u8]) {
        debug_assert!(mask.len() >= width * height);
        for my in 0..height {
            for mx in 0..width {
                let alpha = mask[my * width + mx];
                if alpha > 0 {
                    self.plot(left + mx as i32, top + my as i32, alpha);
                }
            }
        }
    }

    /// Visit every pixel on the global `stride` grid whose alpha exceeds `threshold`.
    ///
    /// Only the dirty region is scanned; the grid stays anchored at (0, 0).
    pub fn for_each_sample(&self, stride: usize, threshold: u8, mut f: impl FnMut(usize, usize)) {
        let Some(rect) = self.dirty else {
            return;
        };
        let stride = stride.max(1);
        let first_x = rect.min_x.div_ceil(stride) * stride;
        let first_y = rect.min_y.div_ceil(stride) * stride;
        for y in (first_y..=rect.max_y).step_by(stride) {
            for x in (first_x..=rect.max_x).step_by(stride) {
                if self.data[y * self.width + x] > threshold {
                    f(x, y);
                }
            }
        }
    }

    fn mark_dirty(&mut self, x: usize, y: usize) {
        self.dirty = Some(match self.dirty {
            None => DirtyRect {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            },
            Some(r) => DirtyRect {
                min_x: r.min_x.min(x),
                min_y: r.min_y.min(y),
                max_x: r.max_x.max(x),
                max_y: r.max_y.max(y),
            },
        });
    }
}

/// Turn a filled coverage mask into an outline stroke.
///
/// A pixel is on the stroke when some pixel within `stroke_width / 2` lies on
/// the other side of the fill boundary. The result is padded on every side so
/// the outer half of the stroke fits; returns the mask and the padding.
pub fn stroke_outline(fill: &[u8], width: usize, height: usize, stroke_width: f32) -> (Vec<u8>, usize) {
    let half = (stroke_width * 0.5).max(0.5);
    let pad = half.ceil() as usize;
    let out_w = width + 2 * pad;
    let out_h = height + 2 * pad;

    let reach = pad as i32;
    let offsets: Vec<(i32, i32)> = (-reach..=reach)
        .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| ((dx * dx + dy * dy) as f32) <= half * half)
        .collect();

    // Coordinates are in padded space
    let inside = |x: i32, y: i32| -> bool {
        let sx = x - pad as i32;
        let sy = y - pad as i32;
        if sx < 0 || sy < 0 || sx >= width as i32 || sy >= height as i32 {
            return false;
        }
        fill[sy as usize * width + sx as usize] > 128
    };

    let mut out = vec![0u8; out_w * out_h];
    for y in 0..out_h as i32 {
        for x in 0..out_w as i32 {
            let here = inside(x, y);
            if offsets.iter().any(|&(dx, dy)| inside(x + dx, y + dy) != here) {
                out[y as usize * out_w + x as usize] = 255;
            }
        }
    }
    (out, pad)
}
