//! Random level selection.
//!
//! Node levels follow a geometric distribution: a node reaches level `n+1`
//! with probability `p` given that it reached level `n`. Randomness comes from
//! whatever `RngCore` the container was constructed with.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::options::Options;

/// Draw a level in `0..=max_level`.
pub fn draw_level<R: RngCore + ?Sized>(max_level: usize, probability: f64, rng: &mut R) -> usize {
    let mut level = 0;
    while level < max_level && rng.gen::<f64>() < probability {
        level += 1;
    }
    level
}

/// The RNG every container uses unless one is supplied. Seeded from the OS;
/// use one of the `with_rng` constructors for reproducible structure.
pub fn default_rng() -> SmallRng {
    SmallRng::from_entropy()
}

/// Owns the RNG and the distribution parameters of one container.
#[derive(Debug, Clone)]
pub struct LevelGenerator<R> {
    options: Options,
    rng: R,
}

impl<R> LevelGenerator<R> {
    pub fn new(options: Options, rng: R) -> Self {
        LevelGenerator { options, rng }
    }

    /// The highest level this generator will produce.
    pub fn max_level(&self) -> usize {
        self.options.max_level()
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}

impl<R: RngCore> LevelGenerator<R> {
    pub fn random(&mut self) -> usize {
        draw_level(self.options.max_level(), self.options.probability(), &mut self.rng)
    }

    /// One independent level per ordering.
    pub(crate) fn random_tower(&mut self, orderings: usize) -> Vec<usize> {
        (0..orderings).map(|_| self.random()).collect()
    }
}
