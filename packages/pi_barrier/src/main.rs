#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point for the pi barrier benchmark.
//!
//! Everything of substance lives in the library; this only turns command line arguments into a
//! `Config`, installs logging and prints results.

use std::io;
use std::process::ExitCode;

use argh::FromArgs;
use pi_barrier::{Config, SamplePartition};
use tracing_subscriber::EnvFilter;

/// Estimates pi by Monte Carlo sampling on worker threads that meet at a barrier twice per
/// iteration, printing the estimate and the time taken for every iteration.
#[derive(FromArgs)]
struct Args {
    /// number of timed iterations (default 10)
    #[argh(option)]
    iterations: Option<String>,

    /// number of untimed warm-up iterations before the timed ones (default 0)
    #[argh(option)]
    warmup: Option<String>,

    /// give the remainder of samples / threads to the first workers instead of dropping it
    #[argh(switch)]
    distribute_remainder: bool,

    /// worker thread count (default 1) followed by total samples per iteration (default
    /// 40000000); values that are not positive integers select the default
    #[argh(positional)]
    positional: Vec<String>,
}

// Binary entry point - mutations would require subprocess testing which is impractical.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let env_args: Vec<String> = std::env::args().collect();
    let str_args: Vec<&str> = env_args.iter().map(String::as_str).collect();

    let program_name = str_args
        .first()
        .expect("std::env::args() always provides at least the program name");

    let args: Args = match Args::from_args(&[program_name], str_args.get(1..).unwrap_or(&[])) {
        Ok(args) => args,
        Err(early_exit) => {
            println!("{}", early_exit.output);
            return if early_exit.status.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    let partition = if args.distribute_remainder {
        SamplePartition::DistributeRemainder
    } else {
        SamplePartition::Truncate
    };

    let config = Config::from_raw_args(
        args.positional.first().map(String::as_str),
        args.positional.get(1).map(String::as_str),
    )
    .with_raw_iterations(args.iterations.as_deref())
    .with_raw_warmup_iterations(args.warmup.as_deref())
    .with_partition(partition);

    println!("{config}");

    match pi_barrier::run(&config, |iteration| println!("{iteration}")) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
