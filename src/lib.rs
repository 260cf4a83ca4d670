//! Glyph Reveal - particles strike hidden text and light it up, one point at a time
//!
//! Core modules:
//! - `sim`: Simulation (glyph sampling, reveal tracking, evader physics, frame orchestration)
//! - `raster`: Glyph rasterization into an offscreen alpha surface
//! - `engine`: Particle engine contract and a reference implementation
//! - `session`: Owns one running session and drives it a frame at a time
//! - `renderer`: CPU-side vertex preparation (no GPU code)
//! - `settings`: Data-driven configuration

pub mod engine;
pub mod error;
pub mod perf;
pub mod raster;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::RevealError;
pub use session::Session;
pub use settings::Settings;

/// Simulation configuration constants
pub mod consts {
    /// Elapsed time is clamped to this after a stall (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Elapsed time assumed for the very first frame (seconds)
    pub const FIRST_FRAME_DT: f32 = 0.016;

    /// Glyph sampling grid stride (pixels, both axes)
    pub const SAMPLE_STRIDE: usize = 3;
    /// Alpha a pixel must exceed to become a sample point
    pub const ALPHA_THRESHOLD: u8 = 128;

    /// Minimum spacing between two revealed points (pixels)
    pub const REVEAL_EPSILON: f32 = 2.0;
    /// Random points lit per text collision
    pub const REVEAL_PICKS: usize = 3;

    /// Pointer closer than this to the evader center triggers a teleport
    pub const TELEPORT_TRIGGER_RADIUS: f32 = 30.0;
    /// A teleport candidate must land farther than this from the pointer
    pub const TELEPORT_MIN_DISTANCE: f32 = 400.0;
    /// Candidates tried before the last one is accepted regardless
    pub const TELEPORT_MAX_ATTEMPTS: u32 = 10;

    /// Repulsion applies while the pointer is within this distance
    pub const REPULSION_RANGE: f32 = 10_000.0;
    /// Inverse-square repulsion numerator (px³/s²)
    pub const REPULSION_STRENGTH: f32 = 1.0e7;
    /// Spring factor pulling the evader toward its rest position
    pub const SETTLE_STIFFNESS: f32 = 0.5;
    /// Velocity multiplier applied every step
    pub const EVADER_DAMPING: f32 = 0.98;
    /// Evader speed cap (px/s)
    pub const EVADER_MAX_SPEED: f32 = 2000.0;
    /// Speed boost when bouncing off the static box
    pub const BOUNCE_BOOST: f32 = 1.2;
    /// Gap left between the boxes after separation (pixels)
    pub const BOUNCE_CLEARANCE: f32 = 1.0;

    /// Static "yes" box size
    pub const YES_BOX_WIDTH: f32 = 150.0;
    pub const YES_BOX_HEIGHT: f32 = 80.0;
    /// Evading "no" box size (deliberately tiny)
    pub const NO_BOX_WIDTH: f32 = 70.0;
    pub const NO_BOX_HEIGHT: f32 = 40.0;
    /// Distance from the bottom edge to the bottom of both boxes
    pub const BOX_BOTTOM_MARGIN: f32 = 100.0;
    /// Horizontal gap from the world center to each box
    pub const BOX_SPACING: f32 = 200.0;
    /// Evader rest position, relative to world center-x and bottom edge
    pub const REST_OFFSET_X: f32 = 200.0;
    pub const REST_OFFSET_FROM_BOTTOM: f32 = 180.0;
}
