use std::fmt::Display;
use std::num::NonZero;
use std::str::FromStr;

use num_integer::Integer;
use tracing::debug;

/// Thread count used when none is given or the given value is not a positive integer.
pub const DEFAULT_THREAD_COUNT: NonZero<usize> = NonZero::new(1).unwrap();

/// Total sample count per iteration used when none is given or the given value is not a positive
/// integer.
pub const DEFAULT_SAMPLE_COUNT: NonZero<u64> = NonZero::new(40_000_000).unwrap();

/// Number of timed iterations in a run unless overridden.
pub const DEFAULT_ITERATIONS: NonZero<u32> = NonZero::new(10).unwrap();

/// Number of untimed warm-up iterations before the timed ones unless overridden.
pub const DEFAULT_WARMUP_ITERATIONS: u32 = 0;

/// How the total sample count of an iteration is divided between the workers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum SamplePartition {
    /// Every worker draws `samples / threads` points. Up to `threads - 1` samples of the nominal
    /// total are never drawn.
    #[default]
    Truncate,

    /// The first `samples % threads` workers draw one extra point each, so an iteration draws
    /// exactly the nominal total.
    DistributeRemainder,
}

/// Immutable parameters of one benchmark run.
///
/// Zero workers, zero samples and zero iterations are not representable.
///
/// # Examples
///
/// ```
/// use pi_barrier::Config;
///
/// // Malformed values fall back to the defaults instead of failing.
/// let config = Config::from_raw_args(Some("4"), Some("lots"));
///
/// assert_eq!(config.thread_count().get(), 4);
/// assert_eq!(config.sample_count().get(), 40_000_000);
/// assert_eq!(config.samples_for_worker(0), 10_000_000);
/// ```
#[derive(Clone, Copy, Debug, derive_more::Display, Eq, PartialEq)]
#[display("{thread_count} threads, pi with {sample_count} samples")]
pub struct Config {
    thread_count: NonZero<usize>,
    sample_count: NonZero<u64>,
    iterations: NonZero<u32>,
    warmup_iterations: u32,
    partition: SamplePartition,
}

impl Config {
    /// Creates a configuration with all defaults: 1 thread, 40 000 000 samples, 10 iterations and
    /// truncating partition.
    #[must_use]
    pub fn new() -> Self {
        Self {
            thread_count: DEFAULT_THREAD_COUNT,
            sample_count: DEFAULT_SAMPLE_COUNT,
            iterations: DEFAULT_ITERATIONS,
            warmup_iterations: DEFAULT_WARMUP_ITERATIONS,
            partition: SamplePartition::Truncate,
        }
    }

    /// Builds a configuration from the raw positional command line values.
    ///
    /// Missing values, values that are not integers and zero all silently select the default.
    #[must_use]
    pub fn from_raw_args(thread_count: Option<&str>, sample_count: Option<&str>) -> Self {
        Self::new()
            .with_thread_count(parse_or_default(
                "thread count",
                thread_count,
                DEFAULT_THREAD_COUNT,
            ))
            .with_sample_count(parse_or_default(
                "sample count",
                sample_count,
                DEFAULT_SAMPLE_COUNT,
            ))
    }

    /// Overrides the iteration count from a raw command line value, keeping the current value if
    /// the raw value is not a positive integer.
    #[must_use]
    pub fn with_raw_iterations(self, iterations: Option<&str>) -> Self {
        let current = self.iterations;
        self.with_iterations(parse_or_default("iterations", iterations, current))
    }

    /// Overrides the warm-up iteration count from a raw command line value, keeping the current
    /// value if the raw value is not a non-negative integer.
    #[must_use]
    pub fn with_raw_warmup_iterations(self, warmup_iterations: Option<&str>) -> Self {
        let current = self.warmup_iterations;
        self.with_warmup_iterations(parse_or_default(
            "warm-up iterations",
            warmup_iterations,
            current,
        ))
    }

    /// Sets the number of worker threads.
    #[must_use]
    pub fn with_thread_count(mut self, thread_count: NonZero<usize>) -> Self {
        self.thread_count = thread_count;
        self
    }

    /// Sets the nominal number of samples drawn per iteration, across all workers.
    #[must_use]
    pub fn with_sample_count(mut self, sample_count: NonZero<u64>) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Sets the number of timed iterations.
    #[must_use]
    pub fn with_iterations(mut self, iterations: NonZero<u32>) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the number of untimed iterations that run before the timed ones.
    ///
    /// Warm-up iterations go through the same barrier protocol as timed ones but are neither timed
    /// nor reported.
    #[must_use]
    pub fn with_warmup_iterations(mut self, warmup_iterations: u32) -> Self {
        self.warmup_iterations = warmup_iterations;
        self
    }

    /// Sets how samples are divided between workers.
    #[must_use]
    pub fn with_partition(mut self, partition: SamplePartition) -> Self {
        self.partition = partition;
        self
    }

    /// Number of worker threads that draw samples.
    #[must_use]
    pub fn thread_count(&self) -> NonZero<usize> {
        self.thread_count
    }

    /// Nominal number of samples per iteration, across all workers.
    #[must_use]
    pub fn sample_count(&self) -> NonZero<u64> {
        self.sample_count
    }

    /// Number of timed iterations.
    #[must_use]
    pub fn iterations(&self) -> NonZero<u32> {
        self.iterations
    }

    /// Number of untimed warm-up iterations.
    #[must_use]
    pub fn warmup_iterations(&self) -> u32 {
        self.warmup_iterations
    }

    /// Warm-up plus timed iterations: how many times every participant crosses the barrier pair.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        u64::from(self.warmup_iterations).saturating_add(u64::from(self.iterations.get()))
    }

    /// How samples are divided between workers.
    #[must_use]
    pub fn partition(&self) -> SamplePartition {
        self.partition
    }

    /// Number of threads meeting at the phase barrier: every worker plus the coordinator.
    ///
    /// # Panics
    ///
    /// Panics if the thread count is `usize::MAX`, which could never be spawned anyway.
    #[must_use]
    pub fn barrier_participants(&self) -> NonZero<usize> {
        self.thread_count
            .checked_add(1)
            .expect("thread count is far below usize::MAX on any real machine")
    }

    /// The number of samples the worker with the given index draws in every iteration.
    #[must_use]
    pub fn samples_for_worker(&self, worker_index: usize) -> u64 {
        let (per_worker, remainder) = self.sample_count.get().div_rem(&self.threads_u64());

        match self.partition {
            SamplePartition::Truncate => per_worker,
            SamplePartition::DistributeRemainder => {
                let gets_extra = u64::try_from(worker_index).is_ok_and(|index| index < remainder);

                // Cannot overflow: the sum is at most `sample_count`.
                per_worker.wrapping_add(u64::from(gets_extra))
            }
        }
    }

    /// The number of samples actually drawn per iteration, summed over all workers.
    ///
    /// With [`SamplePartition::Truncate`] this may be less than [`sample_count()`][Self::sample_count].
    #[must_use]
    pub fn samples_per_iteration(&self) -> u64 {
        match self.partition {
            SamplePartition::Truncate => {
                let (per_worker, _) = self.sample_count.get().div_rem(&self.threads_u64());

                // Cannot overflow: truncation only ever rounds down from `sample_count`.
                per_worker.wrapping_mul(self.threads_u64())
            }
            SamplePartition::DistributeRemainder => self.sample_count.get(),
        }
    }

    fn threads_u64(&self) -> u64 {
        u64::try_from(self.thread_count.get())
            .expect("thread count always fits in u64 on supported platforms")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_or_default<T>(name: &'static str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + Copy + Display,
{
    let Some(raw) = raw else {
        return default;
    };

    if let Ok(value) = raw.trim().parse::<T>() {
        value
    } else {
        debug!(name, raw, %default, "ignoring value that is not a positive integer");
        default
    }
}
