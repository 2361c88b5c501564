use std::io;

use thiserror::Error;

/// Errors reported by [`PhaseBarrier::wait()`][crate::PhaseBarrier::wait].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BarrierError {
    /// A participant panicked while holding the barrier's internal lock. The participants can no
    /// longer be assumed to be at the same phase.
    #[error("barrier is poisoned: a participant panicked while waiting on it")]
    Poisoned,
}

/// Errors that end a benchmark run early.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchmarkError {
    /// The operating system refused to start a worker thread.
    #[error("failed to spawn worker thread {index}")]
    SpawnWorker {
        /// Index of the worker that could not be started.
        index: usize,

        /// The error reported by the operating system.
        #[source]
        source: io::Error,
    },

    /// A worker thread panicked instead of completing its iterations.
    #[error("worker thread {index} panicked")]
    WorkerPanicked {
        /// Index of the worker that panicked.
        index: usize,
    },
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::error::Error as _;
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(BarrierError: Send, Sync, Debug);
    assert_impl_all!(BenchmarkError: Send, Sync, Debug);

    #[test]
    fn spawn_failure_keeps_source() {
        let error = BenchmarkError::SpawnWorker {
            index: 3,
            source: io::Error::new(io::ErrorKind::OutOfMemory, "no threads left"),
        };

        assert_eq!(error.to_string(), "failed to spawn worker thread 3");
        assert!(error.source().is_some());
    }

    #[test]
    fn poisoned_barrier_message() {
        assert_eq!(
            BarrierError::Poisoned.to_string(),
            "barrier is poisoned: a participant panicked while waiting on it"
        );
    }
}
