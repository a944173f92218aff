#![allow(dead_code)]

use std::sync::OnceLock;

use forkjoin_kernels::{Engine, EngineConfig};

/// Relative tolerance for comparisons across different summation orders.
pub const REL_TOL: f64 = 1e-9;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn engine(threads: usize) -> Engine {
    init_logging();
    Engine::start(
        EngineConfig::default()
            .with_threads(threads)
            .with_thread_name_prefix(format!("test-{threads}")),
    )
    .unwrap()
}

/// One engine shared by every test in a binary.
pub fn shared_engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(|| engine(4))
}

pub fn assert_close(actual: f64, expected: f64) {
    let err = (actual - expected).abs();
    assert!(
        err <= REL_TOL * expected.abs(),
        "expected {expected}, got {actual} (abs err {err:e})"
    );
}
