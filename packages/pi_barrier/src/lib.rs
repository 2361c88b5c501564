#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A micro-benchmark that estimates π by Monte Carlo sampling on a fixed set of worker threads,
//! timing how long each iteration of the parallel workload takes.
//!
//! Every iteration, each worker draws its share of random points from the unit square and counts
//! how many land inside the inscribed quarter circle. The hit ratio converges to π/4, so four times
//! the mean ratio across workers is the iteration's estimate of π.
//!
//! This package is not meant as a π library. It exists to measure how a barrier-synchronized
//! parallel workload scales with the number of threads.
//!
//! # Operating principles
//!
//! The coordinator (the thread that calls [`run()`]) and all workers meet at a shared
//! [`PhaseBarrier`] twice per iteration:
//!
//! ```text
//! coordinator: wait#1 (start timer) -------------------------- wait#2 (stop timer, read results)
//! worker i:    wait#1 ---- sample ---- write slot[i] ---- wait#2
//! ```
//!
//! Nobody passes a wait until every participant has arrived. The timed window therefore brackets
//! exactly the sampling work of all workers, and each worker's result slot is written strictly
//! between the two waits and read by the coordinator strictly after the second one. That ordering
//! is all the synchronization the result buffer needs.
//!
//! Each worker owns its own random generator, seeded from a per-run seed combined with the
//! worker's index.
//!
//! # Example
//!
//! ```
//! use std::num::NonZero;
//!
//! use pi_barrier::Config;
//!
//! let config = Config::new()
//!     .with_thread_count(NonZero::new(4).unwrap())
//!     .with_sample_count(NonZero::new(100_000).unwrap())
//!     .with_iterations(NonZero::new(2).unwrap());
//!
//! println!("{config}");
//!
//! let summary = pi_barrier::run(&config, |iteration| println!("{iteration}")).unwrap();
//!
//! println!("{summary}");
//! ```

mod barrier;
mod clock;
mod config;
mod coordinator;
mod error;
mod report;
mod results;
mod sampler;
mod seed;
mod worker;

pub use barrier::*;
pub use config::*;
pub use coordinator::{aggregate_pi, aggregate_pi_weighted, run};
pub use error::*;
pub use report::*;
pub(crate) use results::*;
pub use sampler::*;
