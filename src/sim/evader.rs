//! Evader dynamics
//!
//! The "no" box runs from the pointer. Three regimes, re-chosen every step:
//! - Teleporting: pointer within 30 px of the center, jump somewhere far away
//! - Fleeing: inverse-square push away from the pointer
//! - Settling: no pointer in range, spring back toward the rest position
//!
//! After integration the box bounces off the static box and wraps at the
//! world edges.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, Side, resolve_aabb, wrap_toroidal};
use crate::consts::*;

/// Which regime drove the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvaderPhase {
    #[default]
    Settling,
    Fleeing,
    Teleporting,
}

/// The pointer-shy box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaderBody {
    pub rect: Rect,
    pub vel: Vec2,
    pub accel: Vec2,
    pub phase: EvaderPhase,
}

impl EvaderBody {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            phase: EvaderPhase::Settling,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.rect.x, self.rect.y)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// What happened during one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaderStep {
    pub phase: EvaderPhase,
    /// Candidates tried; 0 unless teleporting
    pub teleport_attempts: u32,
    /// Side of the static box that was struck
    pub bounced: Option<Side>,
    pub wrapped: bool,
}

/// Shared inputs for a step
#[derive(Debug, Clone, Copy)]
pub struct EvaderEnv<'a> {
    /// Static box to bounce off
    pub obstacle: &'a Rect,
    pub pointer: Option<Vec2>,
    /// Point the center springs toward when nothing is chasing it
    pub rest: Vec2,
    /// World size (origin at top-left)
    pub world: Vec2,
}

/// Advance the evader by `dt` seconds
pub fn step_evader<R: Rng>(body: &mut EvaderBody, env: &EvaderEnv<'_>, dt: f32, rng: &mut R) -> EvaderStep {
    let center = body.rect.center();

    if let Some(pointer) = env.pointer {
        let away = center - pointer;
        let distance = away.length();

        // A zero distance lands here too, so the unit vector below is safe
        if distance < TELEPORT_TRIGGER_RADIUS {
            let attempts = teleport(body, pointer, env.world, rng);
            body.vel = Vec2::ZERO;
            body.accel = Vec2::ZERO;
            body.phase = EvaderPhase::Teleporting;
            log::debug!(
                "Evader teleported to ({:.0}, {:.0}) after {} attempts",
                body.rect.x,
                body.rect.y,
                attempts
            );
            return EvaderStep {
                phase: EvaderPhase::Teleporting,
                teleport_attempts: attempts,
                bounced: None,
                wrapped: false,
            };
        }

        if distance < REPULSION_RANGE {
            body.accel = repulsion(away, distance);
            body.phase = EvaderPhase::Fleeing;
        } else {
            body.accel = settle_force(center, env.rest);
            body.phase = EvaderPhase::Settling;
        }
    } else {
        body.accel = settle_force(center, env.rest);
        body.phase = EvaderPhase::Settling;
    }

    integrate(body, dt);

    let bounced = resolve_aabb(
        &mut body.rect,
        &mut body.vel,
        env.obstacle,
        BOUNCE_CLEARANCE,
        BOUNCE_BOOST,
    );
    let wrapped = wrap_toroidal(&mut body.rect, env.world.x, env.world.y);

    EvaderStep {
        phase: body.phase,
        teleport_attempts: 0,
        bounced,
        wrapped,
    }
}

/// Inverse-square push along `away` (pointer → body), `distance` > 0
#[inline]
pub fn repulsion(away: Vec2, distance: f32) -> Vec2 {
    let force = REPULSION_STRENGTH / (distance * distance + 1.0);
    away / distance * force
}

/// Spring pull of the center toward `rest`
#[inline]
pub fn settle_force(center: Vec2, rest: Vec2) -> Vec2 {
    (rest - center) * SETTLE_STIFFNESS
}

/// Semi-implicit Euler with damping and a hard speed cap
pub fn integrate(body: &mut EvaderBody, dt: f32) {
    body.vel += body.accel * dt;
    body.vel *= EVADER_DAMPING;
    body.vel = body.vel.clamp_length_max(EVADER_MAX_SPEED);
    body.rect.x += body.vel.x * dt;
    body.rect.y += body.vel.y * dt;
}

/// Move the body to a random spot far from `pointer`.
///
/// Positions are drawn so the box stays inside the world. The first
/// candidate farther than [`TELEPORT_MIN_DISTANCE`] wins; after
/// [`TELEPORT_MAX_ATTEMPTS`] the last candidate is taken as is.
/// Returns the number of candidates drawn.
fn teleport<R: Rng>(body: &mut EvaderBody, pointer: Vec2, world: Vec2, rng: &mut R) -> u32 {
    let span = Vec2::new(
        (world.x - body.rect.width).max(0.0),
        (world.y - body.rect.height).max(0.0),
    );

    let mut attempts = 0;
    let candidate = loop {
        attempts += 1;
        let candidate = Vec2::new(rng.random::<f32>() * span.x, rng.random::<f32>() * span.y);
        if candidate.distance(pointer) > TELEPORT_MIN_DISTANCE || attempts >= TELEPORT_MAX_ATTEMPTS {
            break candidate;
        }
    };

    body.rect.x = candidate.x;
    body.rect.y = candidate.y;
    attempts
}
