//! Owned generator behind [`UnaryOp::Rand`](crate::UnaryOp::Rand).
//!
//! The source is held by whatever drives elementwise application and passed
//! by `&mut`. It is `Send` but carries no lock, so sharing it across threads
//! means wrapping it on the caller's side.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::RandomSettings;
use crate::Scalar;

#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    seed: Option<u64>,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        tracing::debug!(seed, "seeding random source");
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        tracing::debug!("seeding random source from entropy");
        Self {
            rng: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    pub fn from_settings(settings: &RandomSettings) -> Self {
        match settings.effective_seed() {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Restarts the sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        tracing::debug!(seed, previous = ?self.seed, "reseeding random source");
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.seed = Some(seed);
    }

    /// Seed of the current sequence; `None` when seeded from entropy.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Next uniform value in `[0, 1)`, drawn directly at the build's precision.
    #[inline]
    pub fn next_unit(&mut self) -> Scalar {
        self.rng.gen::<Scalar>()
    }

    /// Unary-shaped draw: ignores `x` and returns [`next_unit`](Self::next_unit).
    #[inline]
    pub fn rand(&mut self, _x: Scalar) -> Scalar {
        self.next_unit()
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_settings(&RandomSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SEED;

    #[test]
    fn draws_stay_in_unit_interval() {
        let mut source = RandomSource::seeded(0xDEADBEEF);
        for _ in 0..1000 {
            let v = source.next_unit();
            assert!((0.0..1.0).contains(&v), "draw {v} outside [0, 1)");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomSource::seeded(42);
        let mut b = RandomSource::seeded(42);
        for _ in 0..256 {
            assert_eq!(a.next_unit().to_bits(), b.next_unit().to_bits());
        }
    }

    #[test]
    fn reseed_restarts_the_sequence() {
        let mut source = RandomSource::seeded(5);
        let first: Vec<Scalar> = (0..8).map(|_| source.next_unit()).collect();
        source.reseed(5);
        let again: Vec<Scalar> = (0..8).map(|_| source.next_unit()).collect();
        assert_eq!(first, again);
        assert_eq!(source.seed(), Some(5));
    }

    #[test]
    fn rand_ignores_its_input() {
        let mut a = RandomSource::seeded(11);
        let mut b = RandomSource::seeded(11);
        assert_eq!(a.rand(Scalar::NAN), b.rand(123.0));
    }

    #[test]
    fn default_uses_default_seed() {
        assert_eq!(RandomSource::default().seed(), Some(DEFAULT_SEED));
        assert_eq!(RandomSource::from_entropy().seed(), None);
    }
}
