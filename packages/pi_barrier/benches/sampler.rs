//! Benchmarks the sampling kernel on its own and a whole barrier-synchronized run, so the cost of
//! synchronization can be compared against the cost of the work it brackets.

#![expect(missing_docs, reason = "benchmarks do not require API documentation")]

use std::hint::black_box;
use std::num::NonZero;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pi_barrier::{Config, estimate_hit_ratio};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const SAMPLE_COUNTS: [u64; 3] = [1_000, 10_000, 100_000];

fn sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_hit_ratio");

    for sample_count in SAMPLE_COUNTS {
        group.throughput(Throughput::Elements(sample_count));

        group.bench_with_input(
            BenchmarkId::from_parameter(sample_count),
            &sample_count,
            |b, &sample_count| {
                let mut rng = SmallRng::seed_from_u64(0x5eed);

                b.iter(|| black_box(estimate_hit_ratio(&mut rng, black_box(sample_count))));
            },
        );
    }

    group.finish();
}

fn full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    group.sample_size(10);

    for thread_count in [1_usize, 2, 4] {
        let config = Config::new()
            .with_thread_count(NonZero::new(thread_count).unwrap())
            .with_sample_count(NonZero::new(100_000).unwrap())
            .with_iterations(NonZero::new(1).unwrap());

        group.bench_with_input(
            BenchmarkId::new("threads", thread_count),
            &config,
            |b, config| {
                b.iter(|| black_box(pi_barrier::run(config, |_| {}).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, sampling, full_run);
criterion_main!(benches);
