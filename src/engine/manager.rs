//! Engine entry point.
//!
//! [`Engine`] owns the one [`WorkerPool`] that every kernel forks onto and
//! exposes the parallel kernels as methods. It is the explicit replacement
//! for a process-wide implicit pool: callers start it, share it by reference
//! across as many calls as they like, and shut it down when done.
//!
//! ## Lifecycle
//! ```ignore
//! let engine = Engine::start(EngineConfig::default().with_threads(4))?;
//! let total = engine.parallel_sum(&input, 8)?;
//! engine.parallel_multiply(&a, &b, &mut c, n)?;
//! engine.shutdown();
//! ```
//!
//! Sequential reference kernels do not need an engine; they are re-exported
//! at the crate root as free functions.

use crate::analytics::StudentAnalytics;
use crate::engine::config::EngineConfig;
use crate::engine::error::KernelResult;
use crate::engine::matrix::{self, Matrix};
use crate::engine::pool::WorkerPool;
use crate::engine::reduce::{self, Reducer};


/// Fork-join engine bound to an explicitly started worker pool.
///
/// ## Concurrency
/// * `Engine` is `Sync`; concurrent calls share the same workers.
/// * Each call runs to completion before returning; there is no background
///   work left behind.

#[derive(Debug)]
pub struct Engine {
    pool: WorkerPool,
}

impl Engine {
    /// Starts an engine with its own worker pool.
    pub fn start(config: EngineConfig) -> KernelResult<Self> {
        Ok(Self { pool: WorkerPool::start(config)? })
    }

    /// Starts an engine from [`EngineConfig::from_env`].
    pub fn with_defaults() -> KernelResult<Self> {
        Self::start(EngineConfig::from_env()?)
    }

    /// The underlying worker pool.
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.pool.num_threads()
    }

    /// Sum of reciprocals of `input` with `task_count` fork-join leaves.
    ///
    /// See [`reduce::parallel_sum`].

    pub fn parallel_sum(&self, input: &[f64], task_count: usize) -> KernelResult<f64> {
        reduce::parallel_sum(&self.pool, input, task_count)
    }

    /// Generic fork-join reduction. See [`reduce::parallel_reduce`].
    pub fn parallel_reduce<T, R>(&self, items: &[T], task_count: usize, reducer: &R) -> KernelResult<R::Acc>
    where
        T: Sync,
        R: Reducer<T>,
    {
        reduce::parallel_reduce(&self.pool, items, task_count, reducer)
    }

    /// Fills `c` with `a x b` using the chunked 2D iterator.
    ///
    /// See [`matrix::parallel_multiply`].

    pub fn parallel_multiply(&self, a: &Matrix, b: &Matrix, c: &mut Matrix, n: usize) -> KernelResult<()> {
        matrix::parallel_multiply(&self.pool, a, b, c, n)
    }

    /// Student analytics running on this engine with `task_count` leaves per
    /// query.
    pub fn analytics(&self, task_count: usize) -> StudentAnalytics<'_> {
        StudentAnalytics::new(&self.pool, task_count)
    }

    /// Stops the worker pool.
    pub fn shutdown(self) {
        self.pool.shutdown();
    }
}
