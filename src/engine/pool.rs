//! Explicitly owned worker pool.
//!
//! All forked work runs on a single `rayon::ThreadPool` that is built from an
//! [`EngineConfig`] and torn down explicitly. No global pool is configured or
//! used, so several engines (for example in parallel tests) never share
//! threads by accident.
//!
//! ## Scheduling
//! Rayon's pool is a work-stealing fork-join scheduler:
//! * forking (`rayon::join`, parallel iterators) only queues work on the
//!   current worker's deque;
//! * idle workers steal from busy ones;
//! * a worker waiting on a join runs other pending tasks instead of blocking
//!   its OS thread.
//!
//! ## Lifecycle
//! `start` -> any number of `install` calls -> `shutdown` (or drop). Dropping
//! the underlying rayon pool signals its threads to exit once their queues
//! are empty.

use log::{debug, info};

use crate::engine::config::EngineConfig;
use crate::engine::error::KernelResult;
use crate::profiling::profiler;


/// A started worker pool.

pub struct WorkerPool {
    pool: rayon::ThreadPool,
    config: EngineConfig,
}

impl WorkerPool {
    /// Validates `config` and builds the pool.
    ///
    /// ## Errors
    /// * [`InvalidArgument::ThreadCount`](crate::InvalidArgument::ThreadCount)
    ///   for a zero thread count.
    /// * [`KernelError::PoolStartup`](crate::KernelError::PoolStartup) when
    ///   rayon cannot spawn the threads.

    pub fn start(config: EngineConfig) -> KernelResult<Self> {
        config.validate()?;

        let prefix = config.thread_name_prefix.clone();
        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(move |i| format!("{prefix}-{i}"))
            .start_handler(|i| {
                profiler::thread_name(format!("worker {i}"));
            });

        if let Some(n) = config.num_threads {
            builder = builder.num_threads(n);
        }
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let pool = builder.build()?;
        info!(
            "worker pool started: {} threads ({})",
            pool.current_num_threads(),
            config.thread_name_prefix
        );

        Ok(Self { pool, config })
    }

    /// Number of worker threads.
    #[inline]
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Configuration the pool was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs `op` inside the pool; forks made by `op` execute on its workers.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// Stops the pool, releasing its threads.
    pub fn shutdown(self) {
        debug!("worker pool shutting down ({} threads)", self.num_threads());
        drop(self.pool);
        info!("worker pool stopped ({})", self.config.thread_name_prefix);
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_threads", &self.num_threads())
            .field("config", &self.config)
            .finish()
    }
}
