//! Random draws behind the catch and release gates.
//!
//! Handlers never call a global generator; they draw from a [`RandomSource`]
//! handed to the router so that games can be seeded or scripted.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Exclusive upper bound of a release draw.
pub const RELEASE_DRAW_BOUND: u32 = 100;

/// Source of the two random draws the game rules consume.
pub trait RandomSource: Send + Sync {
    /// A uniform value in `[0, 1)` used to decide a catch attempt.
    fn catch_roll(&self) -> f64;

    /// A uniform integer in `[0, RELEASE_DRAW_BOUND)` used to decide a release attempt.
    fn release_draw(&self) -> u32;
}

/// A [`RandomSource`] backed by a standard seedable generator.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Creates a generator seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates a generator whose draws are fully determined by `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned lock still holds a usable generator.
        let mut rng = match self.rng.lock() {
            Ok(rng) => rng,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut rng)
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SeededRandom {
    fn catch_roll(&self) -> f64 {
        self.with_rng(|rng| rng.random::<f64>())
    }

    fn release_draw(&self) -> u32 {
        self.with_rng(|rng| rng.random_range(0..RELEASE_DRAW_BOUND))
    }
}
