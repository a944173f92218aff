use criterion::*;
use std::hint::black_box;

use forkjoin_kernels::workload::random_matrix;
use forkjoin_kernels::{sequential_multiply, Matrix};

mod common;
use common::*;

fn matmul_benchmark(c: &mut Criterion) {
    let engine = make_engine();

    let mut group = c.benchmark_group("matmul");
    group.sample_size(20);

    for n in [MATRIX_SMALL, MATRIX_MED] {
        let a = random_matrix(n, SEED);
        let b = random_matrix(n, SEED + 1);

        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |bench, &n| {
            bench.iter_batched_ref(
                || Matrix::zeros(n, n),
                |out| {
                    sequential_multiply(&a, &b, out, n).unwrap();
                    black_box(out);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("parallel", n), &n, |bench, &n| {
            bench.iter_batched_ref(
                || Matrix::zeros(n, n),
                |out| {
                    engine.parallel_multiply(&a, &b, out, n).unwrap();
                    black_box(out);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, matmul_benchmark);
criterion_main!(benches);
