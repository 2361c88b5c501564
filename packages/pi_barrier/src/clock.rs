use std::fmt::Debug;
use std::time::Instant;

/// Source of timestamps for measuring iteration time.
///
/// Implementations must be monotonic: a later call never returns an earlier instant and wall
/// clock adjustments have no effect on the result.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait MonotonicClock: Debug + Send {
    fn now(&mut self) -> Instant;
}

/// The operating system's monotonic clock, via [`std::time::Instant`].
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct OsMonotonicClock;

impl MonotonicClock for OsMonotonicClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn os_clock_never_goes_backwards() {
        let mut clock = OsMonotonicClock;

        let mut previous = clock.now();

        for _ in 0..1_000 {
            let current = clock.now();
            assert!(current >= previous);
            previous = current;
        }
    }
}
