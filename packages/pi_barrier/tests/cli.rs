//! Runs the benchmark binary end to end and checks what it prints.

#![cfg(not(miri))]

use std::process::{Command, Output};

fn run_binary(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pi_barrier"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("benchmark binary must be runnable")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(ToString::to_string)
        .collect()
}

fn assert_iteration_line(line: &str) {
    let rest = line
        .strip_prefix("pi ~= ")
        .unwrap_or_else(|| panic!("unexpected iteration line: {line}"));

    let (estimate, timing) = rest
        .split_once("; Took ")
        .unwrap_or_else(|| panic!("unexpected iteration line: {line}"));

    let estimate: f64 = estimate.parse().unwrap();
    assert!((0.0..=4.0).contains(&estimate), "estimate {estimate} out of range");

    // Six decimal places, as in "3.141593".
    assert_eq!(estimate_decimals(line), 6, "line: {line}");

    let millis = timing
        .strip_suffix(" ms")
        .unwrap_or_else(|| panic!("unexpected iteration line: {line}"));
    millis.parse::<u128>().unwrap();
}

fn estimate_decimals(line: &str) -> usize {
    line.split_once('.')
        .and_then(|(_, rest)| rest.split_once(';'))
        .map_or(0, |(decimals, _)| decimals.len())
}

#[test]
fn prints_banner_iterations_and_summary() {
    let output = run_binary(&["2", "20000", "--iterations", "3"]);

    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 5, "stdout: {lines:?}");

    assert_eq!(lines[0], "2 threads, pi with 20000 samples");

    for line in &lines[1..4] {
        assert_iteration_line(line);
    }

    assert!(lines[4].starts_with("mean pi ~= "), "summary: {}", lines[4]);
    assert!(lines[4].ends_with("over 3 iterations"), "summary: {}", lines[4]);
}

#[test]
fn malformed_thread_count_falls_back_to_one() {
    for threads in ["many", "0"] {
        let output = run_binary(&[threads, "5000", "--iterations", "1"]);

        assert!(output.status.success());

        let lines = stdout_lines(&output);
        assert_eq!(lines[0], "1 threads, pi with 5000 samples");
    }
}

#[test]
fn distribute_remainder_switch_is_accepted() {
    let output = run_binary(&["3", "10001", "--iterations", "1", "--distribute-remainder"]);

    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines[0], "3 threads, pi with 10001 samples");
    assert_iteration_line(&lines[1]);
}

#[test]
fn warmup_iterations_are_not_printed() {
    let output = run_binary(&["2", "4000", "--iterations", "2", "--warmup", "3"]);

    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 4, "unexpected output: {lines:?}");
    assert_iteration_line(&lines[1]);
    assert_iteration_line(&lines[2]);
    assert!(lines[3].ends_with("over 2 iterations"), "summary was {}", lines[3]);
}

#[test]
fn help_exits_successfully() {
    let output = run_binary(&["--help"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--iterations"));
}

#[test]
fn unknown_option_fails() {
    let output = run_binary(&["--no-such-option"]);

    assert!(!output.status.success());
}
