#![allow(dead_code)]
//! Random sprite series for noise-textured parts.
//!
//! A part in random extent mode fills its tiles from a 4-sprite pool. Each
//! tile's pick comes from a shared series that is drawn lazily and only
//! rotated when the driving sprite track changes value, so the noise
//! pattern holds still between frames instead of flickering.

use crate::config::RANDOM_SLOT_COUNT;

#[derive(Debug, Clone)]
pub struct RandSeries {
    entries: Vec<i32>,
    rng: fastrand::Rng,
}

impl RandSeries {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            rng: fastrand::Rng::new(),
        }
    }

    /// Deterministic series for tests and replay captures.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            entries: Vec::new(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Pool slot for tile `i`. Fresh entries are drawn on demand so any
    /// tile count works; draws land in the first three slots, rotation
    /// reaches the fourth.
    pub fn pick(&mut self, i: usize) -> usize {
        while self.entries.len() <= i {
            self.entries.push(self.rng.i32(0..3));
        }
        self.entries[i] as usize
    }

    /// Rotate every known slot to the next sprite in the pool.
    pub fn advance(&mut self) {
        for e in &mut self.entries {
            *e = (*e + 1) % RANDOM_SLOT_COUNT as i32;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RandSeries {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_are_stable() {
        let mut s = RandSeries::with_seed(7);
        let first: Vec<usize> = (0..8).map(|i| s.pick(i)).collect();
        let second: Vec<usize> = (0..8).map(|i| s.pick(i)).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|&v| v < 3));
    }

    #[test]
    fn advance_rotates_through_the_pool() {
        let mut s = RandSeries::with_seed(7);
        let before: Vec<usize> = (0..8).map(|i| s.pick(i)).collect();
        s.advance();
        let after: Vec<usize> = (0..8).map(|i| s.pick(i)).collect();
        for (b, a) in before.iter().zip(&after) {
            assert_eq!((b + 1) % RANDOM_SLOT_COUNT, *a);
        }
        // four rotations come back around
        for _ in 0..3 {
            s.advance();
        }
        let wrapped: Vec<usize> = (0..8).map(|i| s.pick(i)).collect();
        assert_eq!(before, wrapped);
    }
}
