#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for the tests of the pi barrier benchmark.

use std::panic;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// How long [`with_watchdog()`] lets a test run before failing it.
pub const DEFAULT_WATCHDOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs a test body on a separate thread and fails the test if it does not finish within
/// [`DEFAULT_WATCHDOG_TIMEOUT`].
///
/// A broken barrier does not fail, it hangs. Wrapping multithreaded tests in this turns such a
/// hang into a test failure instead of a stuck test run.
///
/// When the `MUTATION_TESTING` environment variable is `1` the body runs directly on the calling
/// thread without a timeout, so that mutation testing sees the hang itself.
///
/// # Panics
///
/// Panics if the body does not finish in time. If the body panics, the panic is propagated.
///
/// # Example
///
/// ```rust
/// use testing::with_watchdog;
///
/// let answer = with_watchdog(|| 6 * 7);
/// assert_eq!(answer, 42);
/// ```
pub fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    with_watchdog_timeout(DEFAULT_WATCHDOG_TIMEOUT, test_fn)
}

/// Same as [`with_watchdog()`] with a custom timeout.
///
/// # Panics
///
/// Panics if the body does not finish within `timeout`. If the body panics, the panic is
/// propagated.
pub fn with_watchdog_timeout<F, R>(timeout: Duration, test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if std::env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        return test_fn();
    }

    let (tx, rx) = mpsc::channel();

    let body = thread::spawn(move || {
        let result = test_fn();

        // The receiver is gone if we already timed out; nothing left to report to.
        drop(tx.send(result));
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => {
            body.join().expect("test body already produced its result");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test did not finish within {timeout:?}, probably deadlocked");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match body.join() {
            Ok(()) => panic!("test body exited without producing a result"),
            Err(payload) => panic::resume_unwind(payload),
        },
    }
}

/// Returns the absolute difference between `a` and `b`, or exactly `0.0` if that difference is
/// within `close_enough`.
///
/// Lets tests compare floating point results with `assert_eq!(f64_diff_abs(..), 0.0)` while the
/// failure message still shows how far off the value was.
#[must_use]
pub fn f64_diff_abs(a: f64, b: f64, close_enough: f64) -> f64 {
    let diff = (a - b).abs();

    if diff <= close_enough { 0.0 } else { diff }
}
