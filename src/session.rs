//! One running reveal session
//!
//! A [`Session`] owns the scene, the particle engine and the rasterizer and
//! exposes a single "drive one frame" entry point. Hosts decide how often to
//! call it (vsync callback, timer, or a plain loop with sleep).

use glam::Vec2;

use crate::consts::FIRST_FRAME_DT;
use crate::engine::ParticleEngine;
use crate::error::RevealError;
use crate::perf::FrameStats;
use crate::raster::GlyphRasterizer;
use crate::renderer::{self, Vertex};
use crate::settings::Settings;
use crate::sim::{FrameInput, FrameReport, SamplePoint, SceneState, TextStyle, clamp_dt, tick};

pub struct Session<R: GlyphRasterizer, E: ParticleEngine> {
    scene: SceneState,
    engine: E,
    rasterizer: R,
    settings: Settings,
    stats: FrameStats,
    running: bool,
    /// Host timestamp of the previous frame (seconds)
    last_frame: Option<f64>,
    /// Input collected since the previous frame
    pending: FrameInput,
}

impl<R: GlyphRasterizer, E: ParticleEngine> Session<R, E> {
    /// Validate settings, bring up the engine and sample the text.
    ///
    /// Any error here is fatal for the session.
    pub fn new(
        settings: Settings,
        mut rasterizer: R,
        mut engine: E,
        width: f32,
        height: f32,
        seed: u64,
    ) -> Result<Self, RevealError> {
        settings.validate()?;

        engine.init(width, height)?;
        engine.set_attraction_strength(settings.attraction_strength);
        engine.set_mouse_enabled(settings.mouse_enabled);
        engine.set_collisions_enabled(settings.collisions_enabled);
        engine.add_particles(settings.particle_count);

        let scene = SceneState::new(
            &mut rasterizer,
            TextStyle::from_settings(&settings),
            width,
            height,
            seed,
        );

        log::info!(
            "Session started: {}x{}, {} particles, {} text points, seed {}",
            width,
            height,
            engine.particle_count(),
            scene.layout.point_count(),
            seed
        );

        Ok(Self {
            scene,
            engine,
            rasterizer,
            settings,
            stats: FrameStats::new(),
            running: true,
            last_frame: None,
            pending: FrameInput::default(),
        })
    }

    /// Run one frame at host time `now_secs`.
    ///
    /// Returns `None` once the session has been stopped.
    pub fn drive_frame(&mut self, now_secs: f64) -> Option<FrameReport> {
        if !self.running {
            return None;
        }

        let dt = match self.last_frame {
            Some(prev) => (now_secs - prev) as f32,
            None => FIRST_FRAME_DT,
        };
        self.last_frame = Some(now_secs);

        let input = std::mem::take(&mut self.pending);
        let report = tick(&mut self.scene, &mut self.engine, &input, dt);
        self.stats.record(f64::from(dt) * 1000.0);
        Some(report)
    }

    /// Run one particle-only frame at host time `now_secs`.
    ///
    /// Text, boxes and reveals stand still. The pointer attracts particles
    /// when mouse attraction is on, and a queued click spawns a particle.
    /// Returns the clamped frame time, or `None` once stopped.
    pub fn drive_sandbox_frame(&mut self, now_secs: f64) -> Option<f32> {
        if !self.running {
            return None;
        }

        let raw = match self.last_frame {
            Some(prev) => (now_secs - prev) as f32,
            None => FIRST_FRAME_DT,
        };
        self.last_frame = Some(now_secs);
        let dt = clamp_dt(raw);

        let input = std::mem::take(&mut self.pending);
        if let Some(pointer) = input.pointer {
            self.scene.pointer = Some(pointer);
        }
        if let Some(at) = input.click {
            self.add_particle_at(at.x, at.y);
        }
        self.engine.update(dt, self.scene.pointer);
        self.stats.record(f64::from(raw) * 1000.0);
        Some(dt)
    }

    /// Rebuild everything for a new surface size; reveals are lost
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), RevealError> {
        if let Err(e) = self.engine.init(width, height) {
            log::error!("Engine rejected resize: {}", e);
            self.stop();
            return Err(e);
        }
        self.scene.resize(&mut self.rasterizer, width, height);
        Ok(())
    }

    /// Stop producing frames
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Session stopped after {} frames", self.scene.frame);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pending.pointer = Some(Vec2::new(x, y));
    }

    /// Queue a click; the frame report says which box it hit
    pub fn click(&mut self, x: f32, y: f32) {
        self.pending.click = Some(Vec2::new(x, y));
    }

    /// Whether the pointer is over a box (cursor hint)
    pub fn hovering(&self) -> bool {
        self.scene.hovering()
    }

    // === Population ===

    /// Grow by adding, shrink by clearing and respawning
    pub fn set_particle_count(&mut self, count: usize) {
        let current = self.engine.particle_count();
        if count > current {
            self.engine.add_particles(count - current);
        } else if count < current {
            self.engine.clear_particles();
            self.engine.add_particles(count);
        }
        self.settings.particle_count = count;
    }

    pub fn add_particles(&mut self, count: usize) {
        self.engine.add_particles(count);
        self.settings.particle_count = self.engine.particle_count();
    }

    pub fn clear_particles(&mut self) {
        self.engine.clear_particles();
        self.settings.particle_count = 0;
    }

    pub fn add_particle_at(&mut self, x: f32, y: f32) {
        self.engine.add_particle(x, y);
        self.settings.particle_count = self.engine.particle_count();
    }

    // === Engine toggles ===

    pub fn set_attraction_strength(&mut self, strength: f32) {
        self.engine.set_attraction_strength(strength);
        self.settings.attraction_strength = strength;
    }

    pub fn set_mouse_enabled(&mut self, enabled: bool) {
        self.engine.set_mouse_enabled(enabled);
        self.settings.mouse_enabled = enabled;
    }

    pub fn set_collisions_enabled(&mut self, enabled: bool) {
        self.engine.set_collisions_enabled(enabled);
        self.settings.collisions_enabled = enabled;
    }

    // === Read side ===

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Current settings, including runtime changes
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn particle_data(&self) -> &[f32] {
        self.engine.particle_data()
    }

    pub fn revealed_points(&self) -> &[SamplePoint] {
        self.scene.reveal.revealed().points()
    }

    pub fn progress(&self) -> f32 {
        self.scene.reveal.progress()
    }

    /// Triangle list for the current frame
    pub fn vertices(&self) -> Vec<Vertex> {
        renderer::build_frame(&self.scene, self.engine.particle_data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_FRAME_DT;
    use crate::engine::scripted::{Call, ScriptedEngine};
    use crate::raster::BlockRasterizer;

    fn settings() -> Settings {
        Settings {
            text_lines: vec!["yes".to_string()],
            font_size: 40.0,
            line_spacing: 50.0,
            particle_count: 3,
            ..Settings::default()
        }
    }

    fn session() -> Session<BlockRasterizer, ScriptedEngine> {
        Session::new(
            settings(),
            BlockRasterizer::new(),
            ScriptedEngine::new(),
            800.0,
            600.0,
            11,
        )
        .unwrap()
    }

    #[test]
    fn test_new_configures_engine() {
        let session = session();
        assert_eq!(
            session.engine().calls,
            vec![
                Call::Init(800.0, 600.0),
                Call::Attraction(0.0),
                Call::Mouse(false),
                Call::Collisions(true),
                Call::AddParticles(3),
            ]
        );
        assert_eq!(session.scene().layout.groups.len(), 3);
        assert!(session.is_running());
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let bad = Settings {
            text_lines: Vec::new(),
            ..Settings::default()
        };
        let result = Session::new(
            bad,
            BlockRasterizer::new(),
            ScriptedEngine::new(),
            800.0,
            600.0,
            1,
        );
        assert!(matches!(result, Err(RevealError::InvalidSettings(_))));
    }

    #[test]
    fn test_engine_load_failure_is_fatal() {
        let mut engine = ScriptedEngine::new();
        engine.fail_init = true;
        let result = Session::new(settings(), BlockRasterizer::new(), engine, 800.0, 600.0, 1);
        assert!(matches!(result, Err(RevealError::EngineLoad(_))));
    }

    #[test]
    fn test_frame_clock() {
        let mut session = session();
        let first = session.drive_frame(10.0).unwrap();
        assert_eq!(first.dt, FIRST_FRAME_DT);

        let second = session.drive_frame(10.05).unwrap();
        assert!((second.dt - 0.05).abs() < 1e-4);

        // A stall is clamped
        let third = session.drive_frame(14.0).unwrap();
        assert_eq!(third.dt, MAX_FRAME_DT);
        assert_eq!(session.stats().len(), 3);
        assert_eq!(session.engine().updates(), 3);
    }

    #[test]
    fn test_sandbox_frame_moves_particles_only() {
        let mut session = session();
        session.pointer_move(40.0, 50.0);
        session.click(7.0, 8.0);

        assert_eq!(session.drive_sandbox_frame(2.0), Some(FIRST_FRAME_DT));
        assert_eq!(session.drive_sandbox_frame(9.0), Some(MAX_FRAME_DT));

        let calls = &session.engine().calls;
        assert_eq!(
            &calls[calls.len() - 3..],
            &[
                Call::AddParticle(7.0, 8.0),
                Call::Update(FIRST_FRAME_DT),
                Call::Update(MAX_FRAME_DT),
            ]
        );
        assert_eq!(session.engine().updates(), 0);
        assert_eq!(session.scene().pointer, Some(Vec2::new(40.0, 50.0)));
        assert_eq!(session.settings().particle_count, 4);
        assert_eq!(session.stats().len(), 2);

        session.stop();
        assert_eq!(session.drive_sandbox_frame(9.1), None);
    }

    #[test]
    fn test_stop_halts_frames() {
        let mut session = session();
        session.drive_frame(0.0);
        session.stop();
        assert!(!session.is_running());
        assert!(session.drive_frame(0.016).is_none());
        assert_eq!(session.engine().updates(), 1);
    }

    #[test]
    fn test_input_is_consumed_once() {
        let mut session = session();
        let yes = session.scene().yes_box.center();
        session.pointer_move(100.0, 100.0);
        session.click(yes.x, yes.y);

        let report = session.drive_frame(0.0).unwrap();
        assert_eq!(report.choice, Some(crate::sim::BoxChoice::Yes));
        assert_eq!(session.scene().pointer, Some(Vec2::new(100.0, 100.0)));

        let report = session.drive_frame(0.016).unwrap();
        assert_eq!(report.choice, None);
    }

    #[test]
    fn test_set_particle_count() {
        let mut session = session();
        session.set_particle_count(10);
        assert_eq!(session.engine().particle_count(), 10);
        assert_eq!(session.engine().calls.last(), Some(&Call::AddParticles(7)));

        session.set_particle_count(4);
        let calls = &session.engine().calls;
        assert_eq!(&calls[calls.len() - 2..], &[Call::Clear, Call::AddParticles(4)]);
        assert_eq!(session.engine().particle_count(), 4);

        let before = session.engine().calls.len();
        session.set_particle_count(4);
        assert_eq!(session.engine().calls.len(), before);
        assert_eq!(session.settings().particle_count, 4);
    }

    #[test]
    fn test_population_helpers() {
        let mut session = session();
        session.add_particle_at(5.0, 6.0);
        assert_eq!(session.engine().particle_count(), 4);
        session.add_particles(2);
        assert_eq!(session.particle_data().len(), 6 * 7);
        session.clear_particles();
        assert_eq!(session.engine().particle_count(), 0);
    }

    #[test]
    fn test_resize_resamples_and_reinits() {
        let mut session = session();
        let p = session.scene().layout.points[0];
        session.engine.script = vec![p.x, p.y];
        session.drive_frame(0.0);
        assert!(!session.revealed_points().is_empty());

        session.resize(1024.0, 768.0).unwrap();
        assert!(session.revealed_points().is_empty());
        assert_eq!(session.scene().world, Vec2::new(1024.0, 768.0));
        assert_eq!(session.engine().calls.last(), Some(&Call::Init(1024.0, 768.0)));
    }

    #[test]
    fn test_failed_resize_stops_session() {
        let mut session = session();
        session.engine.fail_init = true;
        assert!(session.resize(10.0, 10.0).is_err());
        assert!(!session.is_running());
    }

    #[test]
    fn test_toggles_forward_and_persist() {
        let mut session = session();
        session.set_attraction_strength(0.5);
        session.set_mouse_enabled(true);
        session.set_collisions_enabled(false);
        let calls = &session.engine().calls;
        assert_eq!(
            &calls[calls.len() - 3..],
            &[Call::Attraction(0.5), Call::Mouse(true), Call::Collisions(false)]
        );
        assert!(session.settings().mouse_enabled);
        assert!(!session.settings().collisions_enabled);
    }
}
