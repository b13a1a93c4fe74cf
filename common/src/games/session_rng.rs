use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::snake::{FieldSize, Point};

/// Seeded RNG owned by one game controller; a fixed seed replays the same
/// food sequence.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform over the whole field.
    pub fn random_point(&mut self, field_size: &FieldSize) -> Point {
        Point::new(
            self.rng.random_range(0..field_size.width),
            self.rng.random_range(0..field_size.height),
        )
    }

    pub fn random_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}
