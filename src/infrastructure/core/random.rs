use crate::domain::ports::RandomSource;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Fresh OS-seeded generator per call
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyRandomSource;

impl RandomSource for EntropyRandomSource {
    fn rng(&self) -> StdRng {
        StdRng::from_os_rng()
    }
}

/// Every call returns a generator with the same seed, so repeated runs
/// produce identical synthetic series and fallback directions.
#[derive(Debug, Clone, Copy)]
pub struct SeededRandomSource {
    seed: u64,
}

impl SeededRandomSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl RandomSource for SeededRandomSource {
    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}
