//! Deterministic random number generation.
//!
//! Random discards and deck shuffles draw from a seeded ChaCha8 stream so
//! that a game replays identically from its seed.
//!
//! ```
//! use keyforge_pipeline::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.gen_index(10), b.gen_index(10));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded RNG owned by `GameState`.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Pick up to `count` distinct elements.
    pub fn sample<T: Copy>(&mut self, items: &[T], count: usize) -> Vec<T> {
        use rand::seq::SliceRandom;
        items
            .choose_multiple(&mut self.inner, count.min(items.len()))
            .copied()
            .collect()
    }
}
