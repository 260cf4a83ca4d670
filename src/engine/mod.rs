//! Particle engine seam
//!
//! The frame loop only ever talks to particles through [`ParticleEngine`].
//! [`ParticleSwarm`] is the bundled implementation; hosts may plug in their
//! own.

pub mod swarm;

pub use swarm::ParticleSwarm;

use glam::Vec2;

use crate::error::RevealError;
use crate::sim::{Rect, SamplePoint};

/// Floats per particle in [`ParticleEngine::particle_data`]:
/// x, y, radius, r, g, b, alpha (colour channels in [0, 1])
pub const PARTICLE_STRIDE: usize = 7;

/// Contract between the frame loop and a particle simulation
pub trait ParticleEngine {
    /// (Re)initialize world bounds; called on creation and every resize
    fn init(&mut self, width: f32, height: f32) -> Result<(), RevealError>;

    /// Advance one frame with optional pointer attraction
    fn update(&mut self, dt: f32, pointer: Option<Vec2>);

    /// Advance one frame treating `points` as collidable surface.
    ///
    /// `generation` changes whenever `points` does, so surface data may be
    /// cached per generation.
    fn update_with_text_collision(&mut self, dt: f32, points: &[SamplePoint], generation: u64);

    /// Spawn one particle at a point
    fn add_particle(&mut self, x: f32, y: f32);

    /// Spawn `count` particles at random positions
    fn add_particles(&mut self, count: usize);

    fn clear_particles(&mut self);

    /// [`PARTICLE_STRIDE`] floats per particle
    fn particle_data(&self) -> &[f32];

    fn particle_count(&self) -> usize;

    /// Flat (x, y) pairs of text contacts from the most recent update
    fn collision_points(&self) -> &[f32];

    /// Flat (x, y) pairs of box contacts since the most recent update.
    /// Kept apart from [`collision_points`](Self::collision_points) so box
    /// hits never light text.
    fn box_contacts(&self) -> &[f32];

    /// Treat `rect` as an obstacle for this frame
    fn handle_box_collision(&mut self, rect: &Rect);

    fn set_attraction_strength(&mut self, strength: f32);

    fn set_mouse_enabled(&mut self, enabled: bool);

    fn set_collisions_enabled(&mut self, enabled: bool);
}

/// Iterate particle records as (position, radius, rgba)
pub fn particles(data: &[f32]) -> impl Iterator<Item = (Vec2, f32, [f32; 4])> + '_ {
    data.chunks_exact(PARTICLE_STRIDE)
        .map(|p| (Vec2::new(p[0], p[1]), p[2], [p[3], p[4], p[5], p[6]]))
}

/// Engine double that records every call, for frame-loop tests
#[cfg(test)]
pub(crate) mod scripted {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Init(f32, f32),
        Update(f32),
        UpdateText { dt: f32, points: usize, generation: u64 },
        AddParticle(f32, f32),
        AddParticles(usize),
        Clear,
        Box(Rect),
        Attraction(f32),
        Mouse(bool),
        Collisions(bool),
    }

    #[derive(Debug, Default)]
    pub struct ScriptedEngine {
        pub calls: Vec<Call>,
        /// Returned from `collision_points` after each update
        pub script: Vec<f32>,
        pub fail_init: bool,
        collisions: Vec<f32>,
        data: Vec<f32>,
    }

    impl ScriptedEngine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn updates(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::UpdateText { .. }))
                .count()
        }
    }

    impl ParticleEngine for ScriptedEngine {
        fn init(&mut self, width: f32, height: f32) -> Result<(), RevealError> {
            self.calls.push(Call::Init(width, height));
            if self.fail_init {
                return Err(RevealError::EngineLoad("scripted failure".into()));
            }
            Ok(())
        }

        fn update(&mut self, dt: f32, _pointer: Option<Vec2>) {
            self.calls.push(Call::Update(dt));
            self.collisions = self.script.clone();
        }

        fn update_with_text_collision(&mut self, dt: f32, points: &[SamplePoint], generation: u64) {
            self.calls.push(Call::UpdateText {
                dt,
                points: points.len(),
                generation,
            });
            self.collisions = self.script.clone();
        }

        fn add_particle(&mut self, x: f32, y: f32) {
            self.calls.push(Call::AddParticle(x, y));
            self.data.extend_from_slice(&[x, y, 2.0, 1.0, 0.5, 0.5, 1.0]);
        }

        fn add_particles(&mut self, count: usize) {
            self.calls.push(Call::AddParticles(count));
            for _ in 0..count {
                self.data.extend_from_slice(&[0.0, 0.0, 2.0, 1.0, 0.5, 0.5, 1.0]);
            }
        }

        fn clear_particles(&mut self) {
            self.calls.push(Call::Clear);
            self.data.clear();
        }

        fn particle_data(&self) -> &[f32] {
            &self.data
        }

        fn particle_count(&self) -> usize {
            self.data.len() / PARTICLE_STRIDE
        }

        fn collision_points(&self) -> &[f32] {
            &self.collisions
        }

        fn box_contacts(&self) -> &[f32] {
            &[]
        }

        fn handle_box_collision(&mut self, rect: &Rect) {
            self.calls.push(Call::Box(*rect));
        }

        fn set_attraction_strength(&mut self, strength: f32) {
            self.calls.push(Call::Attraction(strength));
        }

        fn set_mouse_enabled(&mut self, enabled: bool) {
            self.calls.push(Call::Mouse(enabled));
        }

        fn set_collisions_enabled(&mut self, enabled: bool) {
            self.calls.push(Call::Collisions(enabled));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particles_skips_partial_record() {
        let data = [1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 0.9, 5.0, 5.0];
        let all: Vec<_> = particles(&data).collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, Vec2::new(1.0, 2.0));
        assert_eq!(all[0].1, 3.0);
        assert_eq!(all[0].2, [0.1, 0.2, 0.3, 0.9]);
    }
}
