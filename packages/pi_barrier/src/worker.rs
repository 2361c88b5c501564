use std::process;
use std::thread;

use rand::rngs::SmallRng;
use tracing::{debug, debug_span, error};

use crate::seed::RunSeed;
use crate::{Config, PhaseBarrier, ResultSlots, estimate_hit_ratio};

/// State shared by the coordinator and every worker of a run.
///
/// Created once before any worker starts and kept alive until the last worker has been joined.
#[derive(Debug)]
pub(crate) struct SharedState {
    pub(crate) barrier: PhaseBarrier,
    pub(crate) results: ResultSlots,

    /// Samples drawn per iteration by each worker, in worker index order.
    pub(crate) sample_shares: Box<[u64]>,
}

impl SharedState {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            barrier: PhaseBarrier::new(config.barrier_participants()),
            results: ResultSlots::new(config.thread_count()),
            sample_shares: (0..config.thread_count().get())
                .map(|index| config.samples_for_worker(index))
                .collect(),
        }
    }
}

/// Everything one worker thread owns.
#[derive(derive_more::Debug)]
pub(crate) struct WorkerContext {
    index: usize,
    samples_per_iteration: u64,
    cycles: u64,

    #[debug(ignore)]
    rng: SmallRng,
}

impl WorkerContext {
    pub(crate) fn new(index: usize, config: &Config, seed: RunSeed) -> Self {
        Self {
            index,
            samples_per_iteration: config.samples_for_worker(index),
            cycles: config.total_cycles(),
            rng: seed.worker_rng(index),
        }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn samples_per_iteration(&self) -> u64 {
        self.samples_per_iteration
    }
}

/// Body of a worker thread.
///
/// Every iteration (warm-up ones included) is bracketed by two barrier waits. The result slot of
/// this worker is written strictly between them, which is what allows the coordinator to read it
/// after the second wait without any further synchronization.
///
/// A panic anywhere in here aborts the process: the other participants would wait for this worker
/// at the barrier forever.
pub(crate) fn run(mut context: WorkerContext, shared: &SharedState) {
    let _span = debug_span!("worker", index = context.index).entered();
    let _abort_on_panic = AbortOnPanic {
        worker_index: context.index,
    };

    debug!(
        samples_per_iteration = context.samples_per_iteration,
        cycles = context.cycles,
        "worker started"
    );

    for _ in 0..context.cycles {
        shared.barrier.wait_or_abort();

        let ratio = estimate_hit_ratio(&mut context.rng, context.samples_per_iteration);
        shared.results.store(context.index, ratio);

        shared.barrier.wait_or_abort();
    }

    debug!("worker exiting");
}

/// Aborts the process if dropped while the worker thread is unwinding.
#[derive(Debug)]
struct AbortOnPanic {
    worker_index: usize,
}

impl Drop for AbortOnPanic {
    #[cfg_attr(test, mutants::skip)] // Aborting takes the test process down with it.
    fn drop(&mut self) {
        if thread::panicking() {
            error!(
                worker = self.worker_index,
                "worker panicked mid-run, aborting"
            );
            process::abort();
        }
    }
}
