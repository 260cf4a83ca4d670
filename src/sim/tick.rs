//! Per-frame orchestration
//!
//! Order within a frame is fixed: evader, particle update, box contacts,
//! reveals. Rendering reads the scene afterwards, so a reveal made this
//! frame is visible this frame.

use glam::Vec2;

use super::evader::{EvaderEnv, EvaderStep, step_evader};
use super::state::{BoxChoice, SceneState};
use crate::consts::MAX_FRAME_DT;
use crate::engine::ParticleEngine;

/// Host input gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Latest pointer position, if it moved
    pub pointer: Option<Vec2>,
    /// Click position, if any
    pub click: Option<Vec2>,
}

/// Summary of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Elapsed time after clamping
    pub dt: f32,
    pub evader: EvaderStep,
    /// Text collision pairs the engine reported
    pub collisions: usize,
    /// Box contact pairs; these never reveal text
    pub box_contacts: usize,
    /// Points newly revealed this frame
    pub revealed: usize,
    /// Box clicked this frame
    pub choice: Option<BoxChoice>,
}

/// Clamp a raw frame delta; stalls and clock jumps become a bounded step
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Advance the scene and the engine by one frame
pub fn tick<E: ParticleEngine + ?Sized>(
    scene: &mut SceneState,
    engine: &mut E,
    input: &FrameInput,
    dt: f32,
) -> FrameReport {
    let dt = clamp_dt(dt);

    if let Some(pointer) = input.pointer {
        scene.pointer = Some(pointer);
    }

    let choice = input.click.and_then(|at| scene.hit_test(at));
    if let Some(choice) = choice {
        log::info!("{} clicked at frame {}", choice.label(), scene.frame);
    }

    // Evader
    let rest = scene.rest_target();
    let env = EvaderEnv {
        obstacle: &scene.yes_box,
        pointer: scene.pointer,
        rest,
        world: scene.world,
    };
    let evader = step_evader(&mut scene.evader, &env, dt, &mut scene.rng);

    // Particles against text, then both boxes
    engine.update_with_text_collision(dt, &scene.layout.points, scene.layout_generation);
    engine.handle_box_collision(&scene.yes_box);
    engine.handle_box_collision(&scene.evader.rect);

    // Reveals, from text contacts only
    let stream = engine.collision_points();
    let revealed = scene.reveal.absorb(stream, &scene.layout, &mut scene.rng);

    scene.frame += 1;

    FrameReport {
        dt,
        evader,
        collisions: stream.len() / 2,
        box_contacts: engine.box_contacts().len() / 2,
        revealed,
        choice,
    }
}
