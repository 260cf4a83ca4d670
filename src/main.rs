//! Glyph Reveal entry point
//!
//! Native builds run headless: a scripted pointer sweeps the world while
//! frames are driven from a sleep loop, with progress going to the log.
//! Browser builds start from `WebSession` in the library instead.
//!
//! Usage: `glyph-reveal [settings.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use glam::Vec2;
    use glyph_reveal::engine::{ParticleEngine, ParticleSwarm};
    use glyph_reveal::raster::{BlockRasterizer, CosmicRasterizer, GlyphRasterizer};
    use glyph_reveal::sim::EvaderPhase;
    use glyph_reveal::{RevealError, Session, Settings};

    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;
    const DEFAULT_FRAMES: u64 = 600;
    /// Roughly 60 Hz
    const FRAME_SLEEP: Duration = Duration::from_millis(16);
    /// Frames between progress lines
    const REPORT_EVERY: u64 = 60;

    pub fn run() -> Result<(), RevealError> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load(Path::new(&path))?,
            None => Settings::default(),
        };
        let frames = match args.next() {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                RevealError::InvalidSettings(format!("frame count '{}': {}", raw, e))
            })?,
            None => DEFAULT_FRAMES,
        };

        let seed = settings.seed.unwrap_or_else(clock_seed);
        let rasterizer = pick_rasterizer(&settings)?;
        let engine = ParticleSwarm::new(seed.wrapping_add(1));
        let mut session = Session::new(settings, rasterizer, engine, WIDTH, HEIGHT, seed)?;

        let start = Instant::now();
        let mut teleports = 0u32;
        for frame in 0..frames {
            let pointer = scripted_pointer(frame);
            session.pointer_move(pointer.x, pointer.y);
            if frame + 1 == frames {
                let yes = session.scene().yes_box.center();
                session.click(yes.x, yes.y);
            }

            let Some(report) = session.drive_frame(start.elapsed().as_secs_f64()) else {
                break;
            };
            if report.evader.phase == EvaderPhase::Teleporting {
                teleports += 1;
            }
            if let Some(choice) = report.choice {
                log::info!("Answer: {}", choice.label());
            }

            if frame % REPORT_EVERY == 0 {
                let stats = session.stats();
                log::info!(
                    "frame {:>5}: {:>3} fps ({:.1} ms), {} particles, {} revealed ({:.1}%)",
                    frame,
                    stats.fps(),
                    stats.average_frame_ms(),
                    session.engine().particle_count(),
                    session.revealed_points().len(),
                    session.progress() * 100.0
                );
            }

            std::thread::sleep(FRAME_SLEEP);
        }

        session.stop();
        log::info!(
            "Finished: {} revealed points ({:.1}%), {} teleports",
            session.revealed_points().len(),
            session.progress() * 100.0,
            teleports
        );
        Ok(())
    }

    /// An explicit font path must load; otherwise system fonts, then blocks
    fn pick_rasterizer(settings: &Settings) -> Result<Box<dyn GlyphRasterizer>, RevealError> {
        if let Some(path) = &settings.font_path {
            return Ok(Box::new(CosmicRasterizer::from_font_file(path)?));
        }
        let cosmic = CosmicRasterizer::with_system_fonts();
        if cosmic.has_fonts() {
            Ok(Box::new(cosmic))
        } else {
            log::warn!("Falling back to block glyphs");
            Ok(Box::new(BlockRasterizer::new()))
        }
    }

    /// Lissajous sweep over most of the world
    fn scripted_pointer(frame: u64) -> Vec2 {
        let t = frame as f32 * 0.016;
        Vec2::new(
            WIDTH / 2.0 + WIDTH * 0.45 * (t * 0.7).sin(),
            HEIGHT / 2.0 + HEIGHT * 0.4 * (t * 1.1).sin(),
        )
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Glyph Reveal (native) starting...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WebSession, this is just to satisfy the compiler
}
