//! Reveal tracking
//!
//! Collisions reported by the particle engine are mapped back to the
//! character they struck. Each hit lights a few random points of that
//! character, so letters ink in gradually. Lit points are never removed.

use rand::Rng;
use rustc_hash::FxHashMap;

use super::glyph::{GlyphLayout, SamplePoint};
use crate::consts::{REVEAL_EPSILON, REVEAL_PICKS};

/// Append-only set of lit points, no two closer than [`REVEAL_EPSILON`]
#[derive(Debug, Clone, Default)]
pub struct RevealSet {
    points: Vec<SamplePoint>,
    /// Epsilon-sized cells → indices into `points`
    cells: FxHashMap<(i32, i32), Vec<usize>>,
}

impl RevealSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn cell_of(p: SamplePoint) -> (i32, i32) {
        (
            (p.x / REVEAL_EPSILON).floor() as i32,
            (p.y / REVEAL_EPSILON).floor() as i32,
        )
    }

    /// Whether some member lies strictly within epsilon of `p`
    pub fn has_near(&self, p: SamplePoint) -> bool {
        let (cx, cy) = Self::cell_of(p);
        let limit = REVEAL_EPSILON * REVEAL_EPSILON;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let cell = (cx.saturating_add(dx), cy.saturating_add(dy));
                if let Some(members) = self.cells.get(&cell) {
                    if members
                        .iter()
                        .any(|&i| self.points[i].distance_squared(p) < limit)
                    {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Insert `p` unless it is non-finite or too close to a member.
    /// Returns whether the set grew.
    pub fn insert(&mut self, p: SamplePoint) -> bool {
        if !p.x.is_finite() || !p.y.is_finite() || self.has_near(p) {
            return false;
        }
        let index = self.points.len();
        self.points.push(p);
        self.cells.entry(Self::cell_of(p)).or_default().push(index);
        true
    }

    /// Members in insertion order
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.points.clear();
        self.cells.clear();
    }
}

/// Turns collision coordinates into revealed points
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    set: RevealSet,
    /// Lit points per character ordinal
    per_character: Vec<usize>,
    total_points: usize,
}

impl RevealTracker {
    pub fn new(layout: &GlyphLayout) -> Self {
        let mut tracker = Self::default();
        tracker.reset(layout);
        tracker
    }

    /// Forget every reveal and size counters for a fresh layout
    pub fn reset(&mut self, layout: &GlyphLayout) {
        self.set.clear();
        self.per_character = vec![0; layout.groups.len()];
        self.total_points = layout.point_count();
    }

    /// Process one frame's collision stream (flat x, y pairs).
    ///
    /// Coordinates that miss the index belong to something other than text
    /// and are skipped, as is a dangling odd value. Returns the number of
    /// points newly revealed.
    pub fn absorb<R: Rng>(
        &mut self,
        collisions: &[f32],
        layout: &GlyphLayout,
        rng: &mut R,
    ) -> usize {
        let mut revealed = 0;
        for pair in collisions.chunks_exact(2) {
            let Some(ordinal) = layout.index.lookup(pair[0], pair[1]) else {
                continue;
            };
            let Some(group) = layout.group(ordinal) else {
                continue;
            };
            if group.points.is_empty() {
                continue;
            }

            for _ in 0..REVEAL_PICKS {
                let candidate = group.points[rng.random_range(0..group.points.len())];
                if self.set.insert(candidate) {
                    if let Some(count) = self.per_character.get_mut(ordinal) {
                        *count += 1;
                    }
                    revealed += 1;
                }
            }
        }
        revealed
    }

    pub fn revealed(&self) -> &RevealSet {
        &self.set
    }

    /// Lit points belonging to one character
    pub fn revealed_in(&self, ordinal: usize) -> usize {
        self.per_character.get(ordinal).copied().unwrap_or(0)
    }

    /// Fraction of all sample points lit, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.total_points == 0 {
            0.0
        } else {
            (self.set.len() as f32 / self.total_points as f32).min(1.0)
        }
    }
}
