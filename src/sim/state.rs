//! Scene state and core simulation types
//!
//! Everything one frame reads or writes lives in [`SceneState`], owned by the
//! session and handed to [`super::tick`] by mutable reference.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::evader::{EvaderBody, EvaderPhase};
use super::glyph::{GlyphLayout, SampleParams, SamplePoint, sample_text};
use super::reveal::RevealTracker;
use crate::consts::*;
use crate::raster::GlyphRasterizer;
use crate::settings::Settings;

/// Which box a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxChoice {
    Yes,
    No,
}

impl BoxChoice {
    pub fn label(self) -> &'static str {
        match self {
            BoxChoice::Yes => "Yes",
            BoxChoice::No => "No",
        }
    }
}

/// How the hidden text is drawn before sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub lines: Vec<String>,
    pub font_size: f32,
    pub line_spacing: f32,
    pub stroke_width: f32,
}

impl TextStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            lines: settings.text_lines.clone(),
            font_size: settings.font_size,
            line_spacing: settings.line_spacing,
            stroke_width: settings.stroke_width,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Initial box placement for a world of the given size
///
/// Both boxes sit [`BOX_BOTTOM_MARGIN`] above the bottom edge, the static box
/// ending [`BOX_SPACING`] left of center and the evader starting the same
/// distance right of it.
pub fn layout_boxes(width: f32, height: f32) -> (Rect, Rect) {
    let center_x = width / 2.0;
    let yes = Rect::new(
        center_x - BOX_SPACING - YES_BOX_WIDTH,
        height - BOX_BOTTOM_MARGIN - YES_BOX_HEIGHT,
        YES_BOX_WIDTH,
        YES_BOX_HEIGHT,
    );
    let no = Rect::new(
        center_x + BOX_SPACING,
        height - BOX_BOTTOM_MARGIN - NO_BOX_HEIGHT,
        NO_BOX_WIDTH,
        NO_BOX_HEIGHT,
    );
    (yes, no)
}

/// Simulation context for one session
#[derive(Debug, Clone)]
pub struct SceneState {
    /// World size in surface pixels
    pub world: Vec2,
    pub style: TextStyle,
    /// Sampled text; rebuilt on every resize
    pub layout: GlyphLayout,
    /// Bumped whenever `layout` is resampled
    pub layout_generation: u64,
    pub reveal: RevealTracker,
    /// Static box
    pub yes_box: Rect,
    /// Evading box
    pub evader: EvaderBody,
    /// Latest pointer position; `None` until the pointer first moves
    pub pointer: Option<Vec2>,
    /// Frames ticked since creation
    pub frame: u64,
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl SceneState {
    /// Sample the text and lay out both boxes for a `width` × `height` world
    pub fn new<R: GlyphRasterizer + ?Sized>(
        rasterizer: &mut R,
        style: TextStyle,
        width: f32,
        height: f32,
        seed: u64,
    ) -> Self {
        let (yes_box, no_box) = layout_boxes(width, height);
        let mut state = Self {
            world: Vec2::new(width, height),
            style,
            layout: GlyphLayout::default(),
            layout_generation: 0,
            reveal: RevealTracker::default(),
            yes_box,
            evader: EvaderBody::new(no_box),
            pointer: None,
            frame: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.resample(rasterizer);
        state
    }

    /// Rebuild everything that depends on absolute surface coordinates.
    ///
    /// Reveals are cleared and both boxes return to their initial spots.
    pub fn resize<R: GlyphRasterizer + ?Sized>(&mut self, rasterizer: &mut R, width: f32, height: f32) {
        log::info!("Resizing scene to {}x{}", width, height);
        self.world = Vec2::new(width, height);
        let (yes_box, no_box) = layout_boxes(width, height);
        self.yes_box = yes_box;
        self.evader = EvaderBody::new(no_box);
        self.resample(rasterizer);
    }

    /// Sample the text again at the current world size and clear reveals
    pub fn resample<R: GlyphRasterizer + ?Sized>(&mut self, rasterizer: &mut R) {
        let params = SampleParams {
            lines: &self.style.lines,
            font_size: self.style.font_size,
            line_spacing: self.style.line_spacing,
            stroke_width: self.style.stroke_width,
            surface_width: self.world.x.max(0.0) as usize,
            surface_height: self.world.y.max(0.0) as usize,
        };
        self.layout = sample_text(rasterizer, &params);
        self.layout_generation += 1;
        self.reveal.reset(&self.layout);
    }

    /// Where the evader's center drifts when nothing chases it
    pub fn rest_target(&self) -> Vec2 {
        Vec2::new(
            self.world.x / 2.0 + REST_OFFSET_X,
            self.world.y - REST_OFFSET_FROM_BOTTOM,
        )
    }

    /// Current evader rectangle
    #[inline]
    pub fn no_box(&self) -> Rect {
        self.evader.rect
    }

    /// Box under `point`, edges inclusive; the static box wins overlaps
    pub fn hit_test(&self, point: Vec2) -> Option<BoxChoice> {
        if self.yes_box.contains(point) {
            Some(BoxChoice::Yes)
        } else if self.evader.rect.contains(point) {
            Some(BoxChoice::No)
        } else {
            None
        }
    }

    /// Whether the pointer is over either box
    pub fn hovering(&self) -> bool {
        self.pointer.is_some_and(|p| self.hit_test(p).is_some())
    }

    /// Surface points handed to the particle engine
    #[inline]
    pub fn text_points(&self) -> &[SamplePoint] {
        &self.layout.points
    }

    #[inline]
    pub fn evader_phase(&self) -> EvaderPhase {
        self.evader.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BlockRasterizer;

    fn style() -> TextStyle {
        TextStyle {
            lines: vec!["hi".to_string()],
            font_size: 40.0,
            line_spacing: 50.0,
            stroke_width: 4.0,
        }
    }

    #[test]
    fn test_layout_boxes_geometry() {
        let (yes, no) = layout_boxes(1280.0, 720.0);
        assert_eq!(yes, Rect::new(290.0, 540.0, 150.0, 80.0));
        assert_eq!(no, Rect::new(840.0, 580.0, 70.0, 40.0));
        // Bottoms line up 100 px above the edge
        assert_eq!(yes.bottom(), 620.0);
        assert_eq!(no.bottom(), 620.0);
    }

    #[test]
    fn test_rest_target() {
        let scene = SceneState::new(&mut BlockRasterizer::new(), style(), 1280.0, 720.0, 1);
        assert_eq!(scene.rest_target(), Vec2::new(840.0, 540.0));
    }

    #[test]
    fn test_new_scene_samples_text() {
        let scene = SceneState::new(&mut BlockRasterizer::new(), style(), 400.0, 200.0, 1);
        assert_eq!(scene.layout.groups.len(), 2);
        assert!(!scene.text_points().is_empty());
        assert!(scene.reveal.revealed().is_empty());
        assert!(scene.pointer.is_none());
    }

    #[test]
    fn test_resize_clears_reveals_and_rebuilds_index() {
        let mut raster = BlockRasterizer::new();
        let mut scene = SceneState::new(&mut raster, style(), 400.0, 200.0, 1);
        let p = scene.layout.points[0];
        let mut rng = Pcg32::seed_from_u64(9);
        let added = scene.reveal.absorb(&[p.x, p.y], &scene.layout, &mut rng);
        assert!(added > 0);

        assert_eq!(scene.layout_generation, 1);
        scene.evader.rect.x = 5.0;
        scene.resize(&mut raster, 600.0, 300.0);

        assert_eq!(scene.layout_generation, 2);
        assert!(scene.reveal.revealed().is_empty());
        assert_eq!(scene.world, Vec2::new(600.0, 300.0));
        assert_eq!(scene.no_box(), layout_boxes(600.0, 300.0).1);
        for group in &scene.layout.groups {
            for q in &group.points {
                assert_eq!(scene.layout.index.lookup(q.x, q.y), Some(group.ordinal));
            }
        }
    }

    #[test]
    fn test_hit_test_and_hover() {
        let mut scene = SceneState::new(&mut BlockRasterizer::new(), style(), 1280.0, 720.0, 1);
        assert_eq!(scene.hit_test(Vec2::new(300.0, 560.0)), Some(BoxChoice::Yes));
        assert_eq!(scene.hit_test(Vec2::new(440.0, 620.0)), Some(BoxChoice::Yes));
        assert_eq!(scene.hit_test(Vec2::new(850.0, 600.0)), Some(BoxChoice::No));
        assert_eq!(scene.hit_test(Vec2::new(640.0, 360.0)), None);

        assert!(!scene.hovering());
        scene.pointer = Some(Vec2::new(850.0, 600.0));
        assert!(scene.hovering());
        scene.pointer = Some(Vec2::new(10.0, 10.0));
        assert!(!scene.hovering());
    }

    #[test]
    fn test_yes_wins_overlapping_hit() {
        let mut scene = SceneState::new(&mut BlockRasterizer::new(), style(), 1280.0, 720.0, 1);
        scene.evader.rect = Rect::new(300.0, 550.0, 70.0, 40.0);
        assert_eq!(scene.hit_test(Vec2::new(310.0, 560.0)), Some(BoxChoice::Yes));
    }

    #[test]
    fn test_zero_sized_world_is_valid() {
        let scene = SceneState::new(&mut BlockRasterizer::new(), style(), 0.0, 0.0, 1);
        assert!(scene.layout.is_empty());
        assert_eq!(scene.layout.groups.len(), 2);
    }
}
