use criterion::*;
use std::hint::black_box;

use forkjoin_kernels::sequential_sum;
use forkjoin_kernels::workload::random_reciprocal_input;

mod common;
use common::*;

fn reduce_benchmark(c: &mut Criterion) {
    let engine = make_engine();
    let input = random_reciprocal_input(ELEMENTS_MED, SEED);

    let mut group = c.benchmark_group("reduce");
    group.throughput(Throughput::Elements(input.len() as u64));

    group.bench_function("sequential_reciprocal_sum_1M", |b| {
        b.iter(|| black_box(sequential_sum(black_box(&input))));
    });

    for task_count in task_counts(&engine) {
        group.bench_with_input(
            BenchmarkId::new("parallel_reciprocal_sum_1M", task_count),
            &task_count,
            |b, &task_count| {
                b.iter(|| {
                    let total = engine.parallel_sum(black_box(&input), task_count).unwrap();
                    black_box(total);
                });
            },
        );
    }

    group.finish();
}

fn reduce_large_benchmark(c: &mut Criterion) {
    let engine = make_engine();
    let input = random_reciprocal_input(ELEMENTS_LARGE, SEED);
    let task_count = 4 * engine.num_threads();

    let mut group = c.benchmark_group("reduce_large");
    group.sample_size(10);

    group.bench_function("sequential_reciprocal_sum_10M", |b| {
        b.iter(|| black_box(sequential_sum(black_box(&input))));
    });

    group.bench_function("parallel_reciprocal_sum_10M", |b| {
        b.iter(|| black_box(engine.parallel_sum(black_box(&input), task_count).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, reduce_benchmark, reduce_large_benchmark);
criterion_main!(benches);
