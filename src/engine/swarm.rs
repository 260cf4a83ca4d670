//! Bundled particle engine
//!
//! A small 2D swarm: particles drift, bounce off the world edges and each
//! other, and report every contact with text so the frame loop can turn them
//! into reveals. Box contacts go to a separate buffer.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rustc_hash::FxHashMap;

use super::{PARTICLE_STRIDE, ParticleEngine};
use crate::error::RevealError;
use crate::sim::{Rect, SamplePoint, aabb_penetration, reflect_velocity, resolve_aabb};

const MIN_RADIUS: f32 = 1.5;
const MAX_RADIUS: f32 = 3.5;
const MIN_ALPHA: f32 = 0.6;
/// Launch speed range (px/s)
const MIN_SPEED: f32 = 40.0;
const MAX_SPEED: f32 = 160.0;
/// Attraction acceleration per unit of strength (px/s²)
const ATTRACTION_SCALE: f32 = 400.0;
/// Bucket size for text surface lookups
const SURFACE_CELL: f32 = 24.0;
/// Bucket size for particle pairs; covers the largest contact distance
const PAIR_CELL: f32 = MAX_RADIUS * 2.0;

/// Valentine palette (normalized RGB)
const PALETTE: [[f32; 3]; 4] = [
    [1.0, 0.412, 0.706], // hot pink
    [1.0, 0.714, 0.757], // light pink
    [1.0, 0.078, 0.576], // deep pink
    [0.859, 0.439, 0.576], // pale violet red
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: [f32; 3],
    pub alpha: f32,
}

/// Reference [`ParticleEngine`]
#[derive(Debug, Clone)]
pub struct ParticleSwarm {
    world: Vec2,
    particles: Vec<Particle>,
    /// Flat render stream, rebuilt after every mutation
    data: Vec<f32>,
    /// Text contacts from the latest update
    collisions: Vec<f32>,
    /// Box contacts since the latest update
    box_contacts: Vec<f32>,
    attraction_strength: f32,
    mouse_enabled: bool,
    collisions_enabled: bool,
    /// Text points bucketed by [`SURFACE_CELL`]
    surface: FxHashMap<(i32, i32), Vec<SamplePoint>>,
    /// Layout generation `surface` was built from
    surface_generation: Option<u64>,
    pairs: FxHashMap<(i32, i32), Vec<usize>>,
    rng: Pcg32,
}

impl ParticleSwarm {
    pub fn new(seed: u64) -> Self {
        Self {
            world: Vec2::ZERO,
            particles: Vec::new(),
            data: Vec::new(),
            collisions: Vec::new(),
            box_contacts: Vec::new(),
            attraction_strength: 0.0,
            mouse_enabled: false,
            collisions_enabled: true,
            surface: FxHashMap::default(),
            surface_generation: None,
            pairs: FxHashMap::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[cfg(test)]
    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    fn spawn(&mut self, pos: Vec2) -> Particle {
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let speed = self.rng.random_range(MIN_SPEED..MAX_SPEED);
        Particle {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            radius: self.rng.random_range(MIN_RADIUS..MAX_RADIUS),
            color: PALETTE[self.rng.random_range(0..PALETTE.len())],
            alpha: self.rng.random_range(MIN_ALPHA..=1.0),
        }
    }

    fn sync_data(&mut self) {
        self.data.clear();
        self.data.reserve(self.particles.len() * PARTICLE_STRIDE);
        for p in &self.particles {
            self.data.extend_from_slice(&[
                p.pos.x, p.pos.y, p.radius, p.color[0], p.color[1], p.color[2], p.alpha,
            ]);
        }
    }

    fn integrate(&mut self, dt: f32) {
        let world = self.world;
        for p in &mut self.particles {
            p.pos += p.vel * dt;

            if p.pos.x - p.radius < 0.0 {
                p.pos.x = p.radius;
                p.vel.x = p.vel.x.abs();
            } else if p.pos.x + p.radius > world.x {
                p.pos.x = (world.x - p.radius).max(p.radius);
                p.vel.x = -p.vel.x.abs();
            }
            if p.pos.y - p.radius < 0.0 {
                p.pos.y = p.radius;
                p.vel.y = p.vel.y.abs();
            } else if p.pos.y + p.radius > world.y {
                p.pos.y = (world.y - p.radius).max(p.radius);
                p.vel.y = -p.vel.y.abs();
            }
        }
    }

    /// Equal-mass elastic collisions between overlapping particles
    fn collide_particles(&mut self) {
        self.pairs.clear();
        for (i, p) in self.particles.iter().enumerate() {
            self.pairs.entry(pair_cell(p.pos)).or_default().push(i);
        }

        let particles = &mut self.particles;
        for i in 0..particles.len() {
            let (cx, cy) = pair_cell(particles[i].pos);
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let cell = (cx.saturating_add(dx), cy.saturating_add(dy));
                    let Some(members) = self.pairs.get(&cell) else {
                        continue;
                    };
                    for &j in members {
                        if j <= i {
                            continue;
                        }
                        let (mut a, mut b) = (particles[i], particles[j]);
                        if bounce_pair(&mut a, &mut b) {
                            particles[i] = a;
                            particles[j] = b;
                        }
                    }
                }
            }
        }
    }

    fn refresh_surface(&mut self, points: &[SamplePoint], generation: u64) {
        if self.surface_generation == Some(generation) {
            return;
        }
        self.surface.clear();
        for &p in points {
            if p.x.is_finite() && p.y.is_finite() {
                self.surface.entry(surface_cell(p.as_vec2())).or_default().push(p);
            }
        }
        self.surface_generation = Some(generation);
    }

    /// Closest surface point within one bucket ring of `pos`
    fn nearest_surface(&self, pos: Vec2) -> Option<(SamplePoint, f32)> {
        let (cx, cy) = surface_cell(pos);
        let mut best: Option<(SamplePoint, f32)> = None;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let cell = (cx.saturating_add(dx), cy.saturating_add(dy));
                let Some(bucket) = self.surface.get(&cell) else {
                    continue;
                };
                for &p in bucket {
                    let d2 = p.as_vec2().distance_squared(pos);
                    if best.is_none_or(|(_, b)| d2 < b) {
                        best = Some((p, d2));
                    }
                }
            }
        }
        best
    }

    fn attract(&mut self, dt: f32, target: impl Fn(&Self, Vec2) -> Option<Vec2>) {
        let pull = self.attraction_strength * ATTRACTION_SCALE * dt;
        for i in 0..self.particles.len() {
            let pos = self.particles[i].pos;
            if let Some(goal) = target(self, pos) {
                let dir = (goal - pos).normalize_or_zero();
                self.particles[i].vel += dir * pull;
            }
        }
    }

    /// Bounce particles off text points and record each contact
    fn collide_surface(&mut self) {
        for i in 0..self.particles.len() {
            let p = self.particles[i];
            let Some((hit, d2)) = self.nearest_surface(p.pos) else {
                continue;
            };
            if d2 > p.radius * p.radius {
                continue;
            }

            let normal = (p.pos - hit.as_vec2()).normalize_or(-p.vel.normalize_or(Vec2::Y));
            let particle = &mut self.particles[i];
            if particle.vel.dot(normal) < 0.0 {
                particle.vel = reflect_velocity(particle.vel, normal);
            }
            particle.pos = hit.as_vec2() + normal * particle.radius;
            self.collisions.push(hit.x);
            self.collisions.push(hit.y);
        }
    }
}

impl Default for ParticleSwarm {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ParticleEngine for ParticleSwarm {
    fn init(&mut self, width: f32, height: f32) -> Result<(), RevealError> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(RevealError::EngineLoad(format!(
                "invalid world size {}x{}",
                width, height
            )));
        }
        self.world = Vec2::new(width, height);
        for p in &mut self.particles {
            p.pos = p.pos.clamp(Vec2::ZERO, self.world);
        }
        self.collisions.clear();
        self.box_contacts.clear();
        self.sync_data();
        Ok(())
    }

    fn update(&mut self, dt: f32, pointer: Option<Vec2>) {
        self.collisions.clear();
        self.box_contacts.clear();
        if self.mouse_enabled && self.attraction_strength != 0.0 {
            if let Some(pointer) = pointer {
                self.attract(dt, |_, _| Some(pointer));
            }
        }
        if self.collisions_enabled {
            self.collide_particles();
        }
        self.integrate(dt);
        self.sync_data();
    }

    fn update_with_text_collision(&mut self, dt: f32, points: &[SamplePoint], generation: u64) {
        self.collisions.clear();
        self.box_contacts.clear();
        self.refresh_surface(points, generation);
        if self.attraction_strength > 0.0 {
            self.attract(dt, |swarm, pos| swarm.nearest_surface(pos).map(|(p, _)| p.as_vec2()));
        }
        if self.collisions_enabled {
            self.collide_particles();
        }
        self.integrate(dt);
        self.collide_surface();
        self.sync_data();
    }

    /// Non-finite coordinates land at the origin; others are clamped to the world
    fn add_particle(&mut self, x: f32, y: f32) {
        let pos = Vec2::new(x, y);
        let pos = if pos.is_finite() {
            pos.clamp(Vec2::ZERO, self.world)
        } else {
            Vec2::ZERO
        };
        let particle = self.spawn(pos);
        self.particles.push(particle);
        self.sync_data();
    }

    fn add_particles(&mut self, count: usize) {
        self.particles.reserve(count);
        for _ in 0..count {
            let pos = Vec2::new(
                self.rng.random::<f32>() * self.world.x,
                self.rng.random::<f32>() * self.world.y,
            );
            let particle = self.spawn(pos);
            self.particles.push(particle);
        }
        self.sync_data();
    }

    fn clear_particles(&mut self) {
        self.particles.clear();
        self.sync_data();
    }

    fn particle_data(&self) -> &[f32] {
        &self.data
    }

    fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn collision_points(&self) -> &[f32] {
        &self.collisions
    }

    fn box_contacts(&self) -> &[f32] {
        &self.box_contacts
    }

    fn handle_box_collision(&mut self, rect: &Rect) {
        let mut touched = false;
        for p in &mut self.particles {
            let mut bounds = Rect::new(
                p.pos.x - p.radius,
                p.pos.y - p.radius,
                p.radius * 2.0,
                p.radius * 2.0,
            );
            if aabb_penetration(&bounds, rect).is_none() {
                continue;
            }
            if resolve_aabb(&mut bounds, &mut p.vel, rect, 0.0, 1.0).is_some() {
                p.pos = bounds.center();
                let contact = p.pos.clamp(
                    Vec2::new(rect.x, rect.y),
                    Vec2::new(rect.right(), rect.bottom()),
                );
                self.box_contacts.push(contact.x);
                self.box_contacts.push(contact.y);
                touched = true;
            }
        }
        if touched {
            self.sync_data();
        }
    }

    fn set_attraction_strength(&mut self, strength: f32) {
        self.attraction_strength = strength;
    }

    fn set_mouse_enabled(&mut self, enabled: bool) {
        self.mouse_enabled = enabled;
    }

    fn set_collisions_enabled(&mut self, enabled: bool) {
        self.collisions_enabled = enabled;
    }
}

#[inline]
fn pair_cell(pos: Vec2) -> (i32, i32) {
    ((pos.x / PAIR_CELL).floor() as i32, (pos.y / PAIR_CELL).floor() as i32)
}

#[inline]
fn surface_cell(pos: Vec2) -> (i32, i32) {
    ((pos.x / SURFACE_CELL).floor() as i32, (pos.y / SURFACE_CELL).floor() as i32)
}

/// Resolve one overlapping pair; returns whether anything changed
fn bounce_pair(a: &mut Particle, b: &mut Particle) -> bool {
    let delta = b.pos - a.pos;
    let reach = a.radius + b.radius;
    let dist_sq = delta.length_squared();
    if dist_sq >= reach * reach {
        return false;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::X };

    // Separate halfway each
    let overlap = reach - dist;
    a.pos -= normal * (overlap / 2.0);
    b.pos += normal * (overlap / 2.0);

    // Swap normal components when approaching
    let approach = (a.vel - b.vel).dot(normal);
    if approach > 0.0 {
        a.vel -= normal * approach;
        b.vel += normal * approach;
    }
    true
}
