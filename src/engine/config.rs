//! Worker pool configuration.
//!
//! `EngineConfig` is a plain value built with `Default` and refined through
//! builder-style `with_*` methods. It only describes the pool; kernel tuning
//! such as the 2D chunk grid is derived from the resulting worker count.
//!
//! ## Environment override
//! [`EngineConfig::from_env`] reads `FORKJOIN_THREADS` so benchmarks and
//! tests can pin the worker count without code changes:
//!
//! ```bash
//! FORKJOIN_THREADS=4 cargo bench
//! ```

use std::env;

use crate::engine::error::InvalidArgument;


/// Name of the environment variable read by [`EngineConfig::from_env`].
pub const THREADS_ENV: &str = "FORKJOIN_THREADS";

/// Configuration for a [`WorkerPool`](crate::engine::pool::WorkerPool).

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of worker threads. `None` lets rayon pick one per logical CPU.
    pub num_threads: Option<usize>,

    /// Prefix for worker thread names (`{prefix}-{index}`).
    pub thread_name_prefix: String,

    /// Stack size for worker threads in bytes. `None` keeps rayon's default.
    pub stack_size: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name_prefix: String::from("forkjoin-worker"),
            stack_size: None,
        }
    }
}

impl EngineConfig {
    /// Default configuration with `FORKJOIN_THREADS` applied when set.
    ///
    /// ## Errors
    /// [`InvalidArgument::EnvVar`] when the variable is set but is not an
    /// unsigned integer.

    pub fn from_env() -> Result<Self, InvalidArgument> {
        let mut config = Self::default();
        if let Ok(raw) = env::var(THREADS_ENV) {
            let threads = raw.trim().parse::<usize>().map_err(|_| InvalidArgument::EnvVar {
                name: THREADS_ENV,
                value: raw.clone(),
            })?;
            config.num_threads = Some(threads);
        }
        Ok(config)
    }

    /// Sets an explicit worker count.
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Sets the worker thread name prefix.
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Sets the worker stack size in bytes.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Checks the configuration before a pool is built.
    pub fn validate(&self) -> Result<(), InvalidArgument> {
        if self.num_threads == Some(0) {
            return Err(InvalidArgument::ThreadCount);
        }
        Ok(())
    }
}
