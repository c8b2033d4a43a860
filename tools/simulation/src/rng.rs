//! Random sources for the market simulator
//!
//! All stochastic decisions (daily shuffle, trade/skip draws, side choice,
//! size jitter) go through [`RandomSource`] so runs can be replayed from a
//! seed or driven by a fixed script in tests.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Source of uniform draws.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, upper)`. `upper` must be non-zero.
    fn next_index(&mut self, upper: usize) -> usize {
        let idx = (self.next_f64() * upper as f64) as usize;
        idx.min(upper.saturating_sub(1))
    }

    /// In-place Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Deterministic ChaCha8 generator.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the stream from the original seed.
    pub fn reseed(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn next_index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// An empty script always yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    script: Vec<f64>,
    queue: VecDeque<f64>,
}

impl ScriptedRandom {
    pub fn new(script: impl Into<Vec<f64>>) -> Self {
        let script: Vec<f64> = script.into();
        Self {
            queue: script.iter().copied().collect(),
            script,
        }
    }

    /// Source that always returns the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.queue.is_empty() {
            self.queue.extend(self.script.iter().copied());
        }
        self.queue.pop_front().unwrap_or(0.0)
    }
}
