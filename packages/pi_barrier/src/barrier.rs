use std::num::NonZero;
use std::process;
use std::sync::{Condvar, Mutex};

use tracing::error;

use crate::BarrierError;

/// A reusable rendezvous point for a fixed number of threads.
///
/// Every call to [`wait()`][Self::wait] blocks until `participants` calls have been made since the
/// barrier was created or last released. The last arrival releases everyone at once and the
/// barrier immediately starts collecting the next generation, so the same instance can bracket
/// any number of benchmark phases.
///
/// Unlike [`std::sync::Barrier`], a broken barrier is reported to the caller: if a participant
/// panicked while holding the internal lock, every subsequent wait returns
/// [`BarrierError::Poisoned`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use pi_barrier::PhaseBarrier;
///
/// let barrier = Arc::new(PhaseBarrier::new(2.try_into().unwrap()));
///
/// let other = thread::spawn({
///     let barrier = Arc::clone(&barrier);
///     move || barrier.wait().unwrap()
/// });
///
/// let mine = barrier.wait().unwrap();
/// let theirs = other.join().unwrap();
///
/// // Exactly one of the two is the leader of the generation.
/// assert!(mine.is_leader() != theirs.is_leader());
/// ```
#[derive(Debug)]
pub struct PhaseBarrier {
    participants: NonZero<usize>,
    state: Mutex<State>,
    released: Condvar,
}

#[derive(Debug)]
struct State {
    // How many participants are blocked in the current generation.
    arrived: usize,

    // Incremented on every release. Waiters compare against the value they saw on arrival,
    // which makes spurious wakeups harmless.
    generation: u64,
}

impl PhaseBarrier {
    /// Creates a barrier that releases once `participants` threads are waiting on it.
    #[must_use]
    pub fn new(participants: NonZero<usize>) -> Self {
        Self {
            participants,
            state: Mutex::new(State {
                arrived: 0,
                generation: 0,
            }),
            released: Condvar::new(),
        }
    }

    /// The number of threads that must call [`wait()`][Self::wait] to release a generation.
    #[must_use]
    pub fn participants(&self) -> NonZero<usize> {
        self.participants
    }

    /// Blocks until all participants have called `wait()` for the current generation.
    ///
    /// The caller that completes the generation returns a result whose
    /// [`is_leader()`][BarrierWaitResult::is_leader] is `true`; all others get `false`.
    ///
    /// # Errors
    ///
    /// Returns [`BarrierError::Poisoned`] if another participant panicked while holding the
    /// barrier's internal lock. The participants can no longer be assumed to be in step.
    pub fn wait(&self) -> Result<BarrierWaitResult, BarrierError> {
        let mut state = self.state.lock().map_err(|_poisoned| BarrierError::Poisoned)?;

        let arrival_generation = state.generation;

        // Cannot overflow: `arrived` is reset before it can exceed `participants`.
        state.arrived = state.arrived.wrapping_add(1);

        if state.arrived == self.participants.get() {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            drop(state);

            self.released.notify_all();

            return Ok(BarrierWaitResult { is_leader: true });
        }

        while state.generation == arrival_generation {
            state = self
                .released
                .wait(state)
                .map_err(|_poisoned| BarrierError::Poisoned)?;
        }

        Ok(BarrierWaitResult { is_leader: false })
    }

    /// Waits like [`wait()`][Self::wait] but treats barrier failure as fatal to the process.
    ///
    /// Once the barrier is broken some participants may be blocked forever while others run ahead,
    /// so there is no state worth unwinding to. The failure is logged before aborting.
    #[cfg_attr(test, mutants::skip)] // Aborting takes the test process down with it.
    pub(crate) fn wait_or_abort(&self) {
        if let Err(e) = self.wait() {
            error!(error = %e, "phase barrier failed, aborting");
            process::abort();
        }
    }
}

/// Outcome of a successful [`PhaseBarrier::wait()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BarrierWaitResult {
    is_leader: bool,
}

impl BarrierWaitResult {
    /// Whether this caller was the last to arrive and released the generation.
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.is_leader
    }
}
