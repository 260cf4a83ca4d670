//! Reverse lookup from surface coordinates to the character that owns them
//!
//! The sampler and the reveal tracker must agree on how a float coordinate
//! becomes a key, so both go through [`quantize`].

use rustc_hash::FxHashMap;

/// Two 32-bit quantized coordinates packed into one integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey(u64);

impl PointKey {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self(((x as u32 as u64) << 32) | (y as u32 as u64))
    }

    #[inline]
    pub fn x(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    #[inline]
    pub fn y(self) -> i32 {
        self.0 as u32 as i32
    }
}

/// Round half up (ties go toward +∞), then pack
///
/// Returns `None` for non-finite input.
#[inline]
pub fn quantize(x: f32, y: f32) -> Option<PointKey> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let qx = (x + 0.5).floor();
    let qy = (y + 0.5).floor();
    if qx < i32::MIN as f32 || qx > i32::MAX as f32 || qy < i32::MIN as f32 || qy > i32::MAX as f32 {
        return None;
    }
    Some(PointKey::new(qx as i32, qy as i32))
}

/// Quantized coordinate → owning character ordinal
///
/// Built once per sampling pass and never patched; a resize builds a new one.
#[derive(Debug, Clone, Default)]
pub struct PointIndex {
    owners: FxHashMap<PointKey, usize>,
}

impl PointIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `ordinal` owns the point at `key`.
    ///
    /// Where two glyph outlines touch the same pixel the later character wins.
    pub(crate) fn insert(&mut self, key: PointKey, ordinal: usize) {
        self.owners.insert(key, ordinal);
    }

    /// Owner of the point nearest (`x`, `y`) after quantization
    #[inline]
    pub fn lookup(&self, x: f32, y: f32) -> Option<usize> {
        quantize(x, y).and_then(|key| self.get(key))
    }

    #[inline]
    pub fn get(&self, key: PointKey) -> Option<usize> {
        self.owners.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = PointKey> + '_ {
        self.owners.keys().copied()
    }
}
