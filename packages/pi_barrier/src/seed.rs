use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Golden-ratio increment used by SplitMix64; spreads consecutive worker indexes far apart.
const WORKER_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed shared by all workers of one benchmark run.
///
/// Derived from the current time, so two runs almost never share a seed. There is intentionally no
/// way to choose it from the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RunSeed(u64);

impl RunSeed {
    #[cfg_attr(test, mutants::skip)] // Any value is a valid seed, nothing to observe.
    pub(crate) fn from_current_time() -> Self {
        // A clock set before 1970 is not worth failing over; any value is a valid seed.
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since_epoch| since_epoch.as_nanos());

        #[expect(
            clippy::cast_possible_truncation,
            reason = "folding the high bits in below keeps them from being lost"
        )]
        let folded = (nanos as u64) ^ ((nanos >> 64) as u64);

        Self(folded)
    }

    #[cfg(test)]
    pub(crate) const fn fixed(value: u64) -> Self {
        Self(value)
    }

    /// Combines the run seed with the worker index into a seed that is distinct for every worker.
    ///
    /// This is one step of SplitMix64 over `run_seed + (index + 1) * stride`, so neighbouring
    /// workers get unrelated seeds rather than seeds that differ in one bit.
    #[must_use]
    pub(crate) fn for_worker(self, worker_index: usize) -> u64 {
        let index = u64::try_from(worker_index)
            .expect("worker index always fits in u64 on supported platforms");

        let mut z = self
            .0
            .wrapping_add(index.wrapping_add(1).wrapping_mul(WORKER_STRIDE));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Creates the generator owned by one worker.
    #[must_use]
    pub(crate) fn worker_rng(self, worker_index: usize) -> SmallRng {
        SmallRng::seed_from_u64(self.for_worker(worker_index))
    }
}
