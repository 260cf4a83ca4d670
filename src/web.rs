//! Browser bindings
//!
//! The page owns the canvas, the event listeners and the animation loop; it
//! forwards pointer input here and calls [`WebSession::frame`] once per
//! `requestAnimationFrame`.

use wasm_bindgen::prelude::*;

use crate::engine::{ParticleEngine, ParticleSwarm};
use crate::raster::{BlockRasterizer, CosmicRasterizer, GlyphRasterizer};
use crate::renderer;
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::BoxChoice;

type BrowserSession = Session<Box<dyn GlyphRasterizer>, ParticleSwarm>;

fn init_logging() {
    console_error_panic_hook::set_once();
    // A second session on the same page finds the logger already set
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WebSession {
    inner: BrowserSession,
    last_choice: Option<BoxChoice>,
}

#[wasm_bindgen]
impl WebSession {
    /// Start a session.
    ///
    /// `settings_json` overrides defaults field by field. `font` is the raw
    /// bytes of a TTF/OTF file; without it glyphs fall back to plain blocks.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f32,
        height: f32,
        seed: u32,
        settings_json: Option<String>,
        font: Option<Vec<u8>>,
    ) -> Result<WebSession, JsError> {
        init_logging();
        log::info!("Glyph Reveal starting...");

        let settings = match settings_json {
            Some(json) => serde_json::from_str::<Settings>(&json)?,
            None => Settings::default(),
        };

        let rasterizer: Box<dyn GlyphRasterizer> = match font {
            Some(bytes) => Box::new(CosmicRasterizer::from_font_data(bytes)?),
            None => {
                log::warn!("No font supplied, using block glyphs");
                Box::new(BlockRasterizer::new())
            }
        };

        let seed = settings.seed.unwrap_or(u64::from(seed));
        let engine = ParticleSwarm::new(seed.wrapping_add(1));
        let inner = Session::new(settings, rasterizer, engine, width, height, seed)?;
        Ok(WebSession {
            inner,
            last_choice: None,
        })
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsError> {
        self.inner.resize(width, height)?;
        Ok(())
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.inner.pointer_move(x, y);
    }

    pub fn click(&mut self, x: f32, y: f32) {
        self.inner.click(x, y);
    }

    /// Run one frame at `now_ms` (`performance.now()`).
    ///
    /// Returns `false` once the session is stopped; the page should stop
    /// scheduling frames.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        match self.inner.drive_frame(now_ms / 1000.0) {
            Some(report) => {
                if report.choice.is_some() {
                    self.last_choice = report.choice;
                }
                true
            }
            None => false,
        }
    }

    /// Particle-only frame for the sandbox page; clicks spawn particles.
    ///
    /// Returns `false` once the session is stopped.
    pub fn sandbox_frame(&mut self, now_ms: f64) -> bool {
        self.inner.drive_sandbox_frame(now_ms / 1000.0).is_some()
    }

    /// "Yes" or "No" for the latest box click, cleared on read
    pub fn take_choice(&mut self) -> Option<String> {
        self.last_choice.take().map(|c| c.label().to_string())
    }

    pub fn hovering(&self) -> bool {
        self.inner.hovering()
    }

    /// 7 floats per particle: x, y, radius, r, g, b, alpha
    pub fn particle_data(&self) -> Vec<f32> {
        self.inner.particle_data().to_vec()
    }

    /// Flat x, y pairs of every revealed point
    pub fn revealed_points(&self) -> Vec<f32> {
        self.inner
            .revealed_points()
            .iter()
            .flat_map(|p| [p.x, p.y])
            .collect()
    }

    /// Triangle list, 6 floats per vertex: x, y, r, g, b, a
    pub fn vertices(&self) -> Vec<f32> {
        renderer::as_floats(&self.inner.vertices()).to_vec()
    }

    /// Current box rectangles: yes x, y, w, h then no x, y, w, h
    pub fn boxes(&self) -> Vec<f32> {
        let scene = self.inner.scene();
        let (yes, no) = (scene.yes_box, scene.no_box());
        vec![yes.x, yes.y, yes.width, yes.height, no.x, no.y, no.width, no.height]
    }

    pub fn progress(&self) -> f32 {
        self.inner.progress()
    }

    pub fn fps(&self) -> u32 {
        self.inner.stats().fps()
    }

    pub fn average_frame_ms(&self) -> f64 {
        self.inner.stats().average_frame_ms()
    }

    pub fn particle_count(&self) -> u32 {
        self.inner.engine().particle_count() as u32
    }

    pub fn set_particle_count(&mut self, count: u32) {
        self.inner.set_particle_count(count as usize);
    }

    pub fn add_particles(&mut self, count: u32) {
        self.inner.add_particles(count as usize);
    }

    pub fn add_particle(&mut self, x: f32, y: f32) {
        self.inner.add_particle_at(x, y);
    }

    pub fn clear_particles(&mut self) {
        self.inner.clear_particles();
    }

    pub fn set_attraction_strength(&mut self, strength: f32) {
        self.inner.set_attraction_strength(strength);
    }

    pub fn set_mouse_enabled(&mut self, enabled: bool) {
        self.inner.set_mouse_enabled(enabled);
    }

    pub fn set_collisions_enabled(&mut self, enabled: bool) {
        self.inner.set_collisions_enabled(enabled);
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }
}
