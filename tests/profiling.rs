#![cfg(feature = "profiling")]

use std::fs;

use forkjoin_kernels::profiling::profiler;
use forkjoin_kernels::workload::{random_matrix, random_reciprocal_input};
use forkjoin_kernels::Matrix;

mod common;
use common::*;

#[test]
fn trace_records_kernel_spans() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace").join("kernels.json");

    profiler::init(&path);

    let engine = engine(2);
    {
        let _g = profiler::span("test::kernels");
        engine.parallel_sum(&random_reciprocal_input(1_000, 1), 4).unwrap();

        let a = random_matrix(8, 2);
        let mut c = Matrix::zeros(8, 8);
        engine.parallel_multiply(&a, &a, &mut c, 8).unwrap();
    }
    engine.shutdown();

    profiler::shutdown();

    let json = fs::read_to_string(&path).unwrap();
    assert!(json.starts_with("{\"traceEvents\":["));
    assert!(json.contains("\"name\":\"reduce\""));
    assert!(json.contains("\"name\":\"multiply\""));
    assert!(json.contains("\"name\":\"test::kernels\""));
    assert!(json.contains("\"thread_name\""));
}
