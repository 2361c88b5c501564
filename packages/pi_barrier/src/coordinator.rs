use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::clock::{MonotonicClock, OsMonotonicClock};
use crate::seed::RunSeed;
use crate::worker::{self, SharedState, WorkerContext};
use crate::{BenchmarkError, Config, IterationReport, RunSummary, SamplePartition};

/// Runs the benchmark described by `config` and returns the results of every iteration.
///
/// `config.thread_count()` worker threads are started, each drawing its share of the samples in
/// every iteration. The calling thread acts as the coordinator: it meets the workers at the phase
/// barrier before and after every iteration, times the interval between the two meetings with a
/// monotonic clock and aggregates the workers' results into a π estimate. `on_iteration` is called
/// with each iteration's report as soon as it is available.
///
/// Any warm-up iterations run first. They follow the same protocol but are neither timed nor
/// reported.
///
/// Worker generators are seeded from the current time, so results differ from run to run.
///
/// # Errors
///
/// Returns [`BenchmarkError::SpawnWorker`] if a worker thread cannot be started. Workers started
/// before the failure stay blocked at the barrier; the caller is expected to end the process.
///
/// Returns [`BenchmarkError::WorkerPanicked`] if a worker thread panicked after its last barrier
/// wait.
///
/// If the phase barrier fails or a worker panics mid-run, the process is aborted.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
///
/// use pi_barrier::Config;
///
/// let config = Config::new()
///     .with_thread_count(NonZero::new(2).unwrap())
///     .with_sample_count(NonZero::new(10_000).unwrap())
///     .with_iterations(NonZero::new(3).unwrap());
///
/// let summary = pi_barrier::run(&config, |report| println!("{report}")).unwrap();
///
/// assert_eq!(summary.iterations().len(), 3);
/// ```
pub fn run<F>(config: &Config, on_iteration: F) -> Result<RunSummary, BenchmarkError>
where
    F: FnMut(&IterationReport),
{
    run_with(
        config,
        RunSeed::from_current_time(),
        &mut OsMonotonicClock,
        on_iteration,
    )
}

pub(crate) fn run_with<C, F>(
    config: &Config,
    seed: RunSeed,
    clock: &mut C,
    mut on_iteration: F,
) -> Result<RunSummary, BenchmarkError>
where
    C: MonotonicClock,
    F: FnMut(&IterationReport),
{
    info!(
        threads = config.thread_count().get(),
        samples = config.sample_count().get(),
        samples_drawn = config.samples_per_iteration(),
        iterations = config.iterations().get(),
        warmup_iterations = config.warmup_iterations(),
        "starting benchmark"
    );

    let shared = Arc::new(SharedState::new(config));
    let workers = spawn_workers(config, seed, &shared)?;

    let mut reports =
        Vec::with_capacity(usize::try_from(config.iterations().get()).unwrap_or_default());

    for warmup in 0..config.warmup_iterations() {
        shared.barrier.wait_or_abort();
        shared.barrier.wait_or_abort();

        debug!(warmup, "warm-up iteration completed");
    }

    for index in 0..config.iterations().get() {
        shared.barrier.wait_or_abort();
        let started = clock.now();

        shared.barrier.wait_or_abort();
        let finished = clock.now();

        // Every worker has stored its ratio before arriving at the second wait, and none will
        // store again until after the next first wait.
        let partial_ratios = shared.results.snapshot();

        let pi_estimate = match config.partition() {
            SamplePartition::Truncate => aggregate_pi(&partial_ratios),
            SamplePartition::DistributeRemainder => {
                aggregate_pi_weighted(&partial_ratios, &shared.sample_shares)
            }
        };

        let report = IterationReport::new(
            index,
            pi_estimate,
            finished.saturating_duration_since(started),
        );

        debug!(
            iteration = index,
            pi_estimate = report.pi_estimate(),
            elapsed_ms = report.elapsed().as_millis(),
            "iteration completed"
        );

        on_iteration(&report);
        reports.push(report);
    }

    for (index, handle) in workers.into_iter().enumerate() {
        handle
            .join()
            .map_err(|_panic| BenchmarkError::WorkerPanicked { index })?;
    }

    let summary = RunSummary::new(reports);

    info!(
        mean_pi_estimate = summary.mean_pi_estimate(),
        mean_ms = summary.mean_duration().as_millis(),
        "benchmark completed"
    );

    Ok(summary)
}

fn spawn_workers(
    config: &Config,
    seed: RunSeed,
    shared: &Arc<SharedState>,
) -> Result<Vec<JoinHandle<()>>, BenchmarkError> {
    let thread_count = config.thread_count().get();
    let mut handles = Vec::with_capacity(thread_count);

    for index in 0..thread_count {
        let context = WorkerContext::new(index, config, seed);

        debug!(
            worker = context.index(),
            samples_per_iteration = context.samples_per_iteration(),
            "spawning worker"
        );

        let handle = thread::Builder::new()
            .name(format!("pi-worker-{index}"))
            .spawn({
                let shared = Arc::clone(shared);
                move || worker::run(context, &shared)
            })
            .map_err(|source| BenchmarkError::SpawnWorker { index, source })?;

        handles.push(handle);
    }

    Ok(handles)
}

/// Turns the hit ratios of all workers into an estimate of π.
///
/// The quarter circle covers π/4 of the unit square, so the estimate is four times the mean
/// ratio. This assumes every worker drew the same number of samples, as under
/// [`SamplePartition::Truncate`]; see [`aggregate_pi_weighted()`] otherwise. Returns `0.0` for an
/// empty slice.
///
/// # Examples
///
/// ```
/// let pi = pi_barrier::aggregate_pi(&[0.80, 0.78]);
///
/// assert!((pi - 3.16).abs() < 1e-12);
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "worker counts are tiny compared to f64 precision"
)]
pub fn aggregate_pi(partial_ratios: &[f64]) -> f64 {
    if partial_ratios.is_empty() {
        return 0.0;
    }

    let sum = partial_ratios.iter().sum::<f64>();

    sum / partial_ratios.len() as f64 * 4.0
}

/// Turns the hit ratios of workers that drew different numbers of samples into an estimate of π.
///
/// Each ratio is weighted by the number of samples behind it, so the estimate is four times the
/// hit ratio over all samples drawn. Workers that drew nothing do not pull the estimate down.
/// `partial_ratios` and `sample_counts` are paired by position; surplus entries in either are
/// ignored. Returns `0.0` if no samples were drawn.
///
/// # Examples
///
/// ```
/// // 2 of 2 samples hit, 1 of 2 samples hit and one worker that drew nothing.
/// let pi = pi_barrier::aggregate_pi_weighted(&[1.0, 0.5, 0.0], &[2, 2, 0]);
///
/// assert!((pi - 3.0).abs() < 1e-12);
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "sample counts beyond 2^53 are not a realistic benchmark input"
)]
pub fn aggregate_pi_weighted(partial_ratios: &[f64], sample_counts: &[u64]) -> f64 {
    let (hits, total_samples) = partial_ratios.iter().zip(sample_counts).fold(
        (0.0, 0_u64),
        |(hits, total_samples), (&ratio, &count)| {
            (hits + ratio * count as f64, total_samples.saturating_add(count))
        },
    );

    if total_samples == 0 {
        return 0.0;
    }

    hits / total_samples as f64 * 4.0
}
