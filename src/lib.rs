//! # Fork-Join Kernels
//!
//! A minimal fork-join parallel execution engine for two numerical
//! workloads: a reduction over a flat array (sum of reciprocals) and a
//! chunked iteration over a 2D index space (dense matrix multiplication).
//!
//! ## Design Goals
//! - Exact chunk partitioning (ceiling division, clamped bounds)
//! - Balanced binary fork-join over task indices
//! - Deterministic combination order for a fixed task count
//! - Lock-free disjoint writes, proven by partition exactness
//! - One explicitly owned worker pool, no global state
//!
//! This crate builds as both:
//! - `rlib` (for Rust usage & integration tests)
//! - `cdylib` (for FFI / DLL usage)

#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![allow(clippy::module_inception)]
#![deny(dead_code)]

pub mod engine;
pub mod analytics;
pub mod workload;

/// Feature-gated execution profiling.
pub mod profiling;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use engine::manager::Engine;

pub use engine::config::EngineConfig;

pub use engine::pool::WorkerPool;

pub use engine::types::{
    Chunk,
    IndexRange,
    TaskIndex,
};

pub use engine::partition::{
    Partition,
    chunk_size,
    chunk_start_inclusive,
    chunk_end_exclusive,
};

pub use engine::task::{invoke, SplittableTask};

pub use engine::reduce::{
    Count,
    FnReducer,
    Reciprocal,
    Reducer,
    ReductionTask,
    Sum,
    parallel_reduce,
    parallel_sum,
    sequential_sum,
};

pub use engine::matrix::{
    ChunkGrid,
    Matrix,
    Tile,
    parallel_multiply,
    sequential_multiply,
};

pub use engine::error::{
    InvalidArgument,
    KernelError,
    KernelResult,
    TaskFailure,
};

pub use analytics::{Student, StudentAnalytics};

// ─────────────────────────────────────────────────────────────────────────────
// Prelude
// ─────────────────────────────────────────────────────────────────────────────

/// Commonly used engine types.
///
/// Import with:
/// ```rust
/// use forkjoin_kernels::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Engine,
        EngineConfig,
        KernelError,
        KernelResult,
        Matrix,
        Reducer,
        FnReducer,
        SplittableTask,
        sequential_sum,
        sequential_multiply,
    };
}
