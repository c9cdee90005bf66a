//! Seeded random source for archive generation.
//!
//! A small linear congruential generator whose output sequence is part of
//! the archive's contract: the same seed always yields the same responses,
//! so the draw sequence must never change.

/// Seed used for the published archive.
pub const DEFAULT_SEED: u64 = 12345;

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233280;

/// Anything that yields uniform draws in [0, 1).
///
/// Samplers are written against this trait so tests can script exact draws.
pub trait DrawSource {
    /// Advance and return the next value in [0, 1).
    fn draw(&mut self) -> f64;
}

/// Deterministic LCG: `seed = (seed * 9301 + 49297) mod 233280`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRandom {
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { seed: seed % MODULUS }
    }

    /// Restart the sequence from `seed`.
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed % MODULUS;
    }

    /// Current internal state.
    pub fn state(&self) -> u64 {
        self.seed
    }

    pub fn next(&mut self) -> f64 {
        self.seed = (self.seed * MULTIPLIER + INCREMENT) % MODULUS;
        self.seed as f64 / MODULUS as f64
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl DrawSource for SeededRandom {
    fn draw(&mut self) -> f64 {
        self.next()
    }
}

/// Replays a fixed list of draws and counts how many were taken.
#[cfg(test)]
pub(crate) struct ScriptedDraws {
    values: Vec<f64>,
    pub taken: usize,
}

#[cfg(test)]
impl ScriptedDraws {
    pub(crate) fn new(values: &[f64]) -> Self {
        Self { values: values.to_vec(), taken: 0 }
    }
}

#[cfg(test)]
impl DrawSource for ScriptedDraws {
    fn draw(&mut self) -> f64 {
        let value = self.values[self.taken];
        self.taken += 1;
        value
    }
}
