#![allow(dead_code)]

use forkjoin_kernels::{Engine, EngineConfig};

pub const ELEMENTS_SMALL: usize = 100_000;
pub const ELEMENTS_MED: usize = 1_000_000;
pub const ELEMENTS_LARGE: usize = 10_000_000;

pub const MATRIX_SMALL: usize = 64;
pub const MATRIX_MED: usize = 256;

pub const SEED: u64 = 0x5eed;

/// Engine honoring `FORKJOIN_THREADS`, falling back to one worker per CPU.
pub fn make_engine() -> Engine {
    let config = EngineConfig::from_env()
        .unwrap_or_default()
        .with_thread_name_prefix("bench");
    Engine::start(config).unwrap()
}

/// Task counts worth comparing on this engine: 1, one per worker, and oversubscribed.
pub fn task_counts(engine: &Engine) -> Vec<usize> {
    let workers = engine.num_threads();
    let mut counts = vec![1, workers, 4 * workers, 16 * workers];
    counts.dedup();
    counts
}
