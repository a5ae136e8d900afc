//! The randomness capability shared by every component that rolls dice.
//!
//! One seeded stream drives a whole run; reproducibility depends on the
//! fixed per-day call order, so components receive the source by injection
//! and never construct their own.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Capability trait over the shared pseudo-random stream.
pub trait RandomSource {
    /// Uniform roll in `0..=100`.
    fn roll_percent(&mut self) -> u32;

    /// Uniform integer in `min..=max`; degenerate ranges return `min`.
    fn next_in(&mut self, min: i32, max: i32) -> i32;

    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

/// Production source backed by a seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct GameRandom {
    rng: ChaCha8Rng,
}

impl GameRandom {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for GameRandom {
    fn roll_percent(&mut self) -> u32 {
        self.rng.gen_range(0..=100)
    }

    fn next_in(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            min
        } else {
            self.rng.gen_range(min..=max)
        }
    }

    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Scripted source for tests. Each method pops from its own queue and
/// falls back to an inert default when the queue runs dry: percent rolls
/// return 100 (no chance fires), ranged draws return `min`, and floats
/// return 0.5 (zero noise around a centered spread).
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    percents: VecDeque<u32>,
    ints: VecDeque<i32>,
    floats: VecDeque<f64>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_percents(mut self, rolls: impl IntoIterator<Item = u32>) -> Self {
        self.percents.extend(rolls);
        self
    }

    pub fn with_ints(mut self, draws: impl IntoIterator<Item = i32>) -> Self {
        self.ints.extend(draws);
        self
    }

    pub fn with_floats(mut self, draws: impl IntoIterator<Item = f64>) -> Self {
        self.floats.extend(draws);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn roll_percent(&mut self) -> u32 {
        self.percents.pop_front().unwrap_or(100)
    }

    fn next_in(&mut self, min: i32, _max: i32) -> i32 {
        self.ints.pop_front().unwrap_or(min)
    }

    fn next_f64(&mut self) -> f64 {
        self.floats.pop_front().unwrap_or(0.5)
    }
}
