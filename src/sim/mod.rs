//! Simulation module
//!
//! Text sampling, reveal tracking and the evading box. Nothing in here
//! draws or touches the platform:
//! - Seeded RNG only
//! - Surface coordinates in pixels, origin top-left
//! - One owner per piece of state per frame phase

pub mod collision;
pub mod evader;
pub mod glyph;
pub mod index;
pub mod reveal;
pub mod state;
pub mod tick;

pub use collision::{
    Penetration, Rect, Side, aabb_penetration, reflect_velocity, resolve_aabb, wrap_toroidal,
};
pub use evader::{EvaderBody, EvaderEnv, EvaderPhase, EvaderStep, step_evader};
pub use glyph::{CharacterGroup, GlyphLayout, SampleParams, SamplePoint, line_centers, sample_text};
pub use index::{PointIndex, PointKey, quantize};
pub use reveal::{RevealSet, RevealTracker};
pub use state::{BoxChoice, SceneState, TextStyle, layout_boxes};
pub use tick::{FrameInput, FrameReport, clamp_dt, tick};
