use std::f64::consts::PI;
use std::fmt;
use std::time::Duration;

/// Outcome of one timed iteration of a benchmark run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationReport {
    index: u32,
    pi_estimate: f64,
    elapsed: Duration,
}

impl IterationReport {
    pub(crate) fn new(index: u32, pi_estimate: f64, elapsed: Duration) -> Self {
        Self {
            index,
            pi_estimate,
            elapsed,
        }
    }

    /// Zero-based position of the iteration within the run.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The π estimate aggregated from all workers' results of this iteration.
    #[must_use]
    pub fn pi_estimate(&self) -> f64 {
        self.pi_estimate
    }

    /// Time between all threads entering the iteration and all threads finishing it.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl fmt::Display for IterationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pi ~= {:.6}; Took {} ms",
            self.pi_estimate,
            self.elapsed.as_millis()
        )
    }
}

/// All iterations of a completed benchmark run, with summary statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    iterations: Vec<IterationReport>,
}

impl RunSummary {
    pub(crate) fn new(iterations: Vec<IterationReport>) -> Self {
        Self { iterations }
    }

    /// Every iteration, in execution order.
    #[must_use]
    pub fn iterations(&self) -> &[IterationReport] {
        &self.iterations
    }

    /// Mean time per iteration, or zero if there were no iterations.
    #[must_use]
    pub fn mean_duration(&self) -> Duration {
        let total = self
            .iterations
            .iter()
            .map(IterationReport::elapsed)
            .sum::<Duration>();

        u32::try_from(self.iterations.len())
            .ok()
            .and_then(|count| total.checked_div(count))
            .unwrap_or_default()
    }

    /// Fastest iteration, or zero if there were no iterations.
    #[must_use]
    pub fn min_duration(&self) -> Duration {
        self.iterations
            .iter()
            .map(IterationReport::elapsed)
            .min()
            .unwrap_or_default()
    }

    /// Slowest iteration, or zero if there were no iterations.
    #[must_use]
    pub fn max_duration(&self) -> Duration {
        self.iterations
            .iter()
            .map(IterationReport::elapsed)
            .max()
            .unwrap_or_default()
    }

    /// Mean of all per-iteration π estimates, or zero if there were no iterations.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "iteration counts are tiny compared to f64 precision"
    )]
    pub fn mean_pi_estimate(&self) -> f64 {
        if self.iterations.is_empty() {
            return 0.0;
        }

        let sum = self
            .iterations
            .iter()
            .map(IterationReport::pi_estimate)
            .sum::<f64>();

        sum / self.iterations.len() as f64
    }

    /// Distance of [`mean_pi_estimate()`][Self::mean_pi_estimate] from the true value of π.
    #[must_use]
    pub fn mean_abs_error(&self) -> f64 {
        (self.mean_pi_estimate() - PI).abs()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean pi ~= {:.6} (off by {:.6}); mean {} ms, min {} ms, max {} ms over {} iterations",
            self.mean_pi_estimate(),
            self.mean_abs_error(),
            self.mean_duration().as_millis(),
            self.min_duration().as_millis(),
            self.max_duration().as_millis(),
            self.iterations.len()
        )
    }
}
