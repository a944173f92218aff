//! Error types for argument validation and fork-join execution.
//!
//! Failures fall into two families:
//!
//! * **Invalid arguments** ([`InvalidArgument`]) are detected synchronously,
//!   before a single task is forked: a zero task count, a zero chunk count,
//!   a chunk index outside the partition, matrices that disagree with `N`, or
//!   a bad pool configuration.
//! * **Task failures** ([`TaskFailure`]) are raised inside a worker. The
//!   first one recorded aborts the remaining leaves and is re-raised at the
//!   top-level call as [`KernelError::PropagatedFailure`]. There is no
//!   partial-success mode.
//!
//! Arithmetic edge conditions (division by zero, overflow to infinity, NaN)
//! are **not** errors; they follow IEEE 754 and propagate through the
//! result exactly as in the sequential reference kernels.
//!
//! ## Typical flow
//! ```ignore
//! match engine.parallel_sum(&input, task_count) {
//!     Ok(total) => println!("{total}"),
//!     Err(KernelError::InvalidArgument(e)) => eprintln!("rejected: {e}"),
//!     Err(KernelError::PropagatedFailure(e)) => eprintln!("worker failed: {e}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! ## Display vs. Debug
//! * [`fmt::Display`] gives short lowercase messages suitable for logs.
//! * [`fmt::Debug`] (derived) keeps the full structure.

use std::any::Any;
use std::fmt;

use crate::engine::types::TaskIndex;


/// Result alias used by every fallible engine entry point.
pub type KernelResult<T> = Result<T, KernelError>;

/// A caller-supplied argument that the engine refuses to run with.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    /// The number of tasks must be at least one.
    TaskCount {
        /// Offending task count.
        got: usize,
    },

    /// The number of chunks must be at least one.
    ChunkCount {
        /// Offending chunk count.
        got: usize,
    },

    /// A chunk index outside `[0, total_chunks)`.
    ChunkIndex {
        /// Requested chunk index.
        index: usize,

        /// Number of chunks in the partition.
        total_chunks: usize,
    },

    /// A matrix operand whose dimensions disagree with `N`.
    MatrixShape {
        /// Operand name (`"a"`, `"b"` or `"c"`).
        operand: &'static str,

        /// Expected `(rows, cols)`.
        expected: (usize, usize),

        /// Actual `(rows, cols)`.
        got: (usize, usize),
    },

    /// Row data that does not form a rectangle.
    RaggedRows {
        /// Index of the first row whose length differs from row 0.
        row: usize,

        /// Length of row 0.
        expected: usize,

        /// Length of the offending row.
        got: usize,
    },

    /// A worker pool cannot be started with zero threads.
    ThreadCount,

    /// An environment override could not be parsed.
    EnvVar {
        /// Variable name.
        name: &'static str,

        /// Raw value found in the environment.
        value: String,
    },
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidArgument::TaskCount { got } => {
                write!(f, "task count must be at least 1 (got {got})")
            }
            InvalidArgument::ChunkCount { got } => {
                write!(f, "chunk count must be at least 1 (got {got})")
            }
            InvalidArgument::ChunkIndex { index, total_chunks } => write!(
                f,
                "chunk index {index} out of range for {total_chunks} chunks"
            ),
            InvalidArgument::MatrixShape { operand, expected, got } => write!(
                f,
                "matrix {operand} has shape {}x{}, expected {}x{}",
                got.0, got.1, expected.0, expected.1
            ),
            InvalidArgument::RaggedRows { row, expected, got } => write!(
                f,
                "row {row} has {got} columns, expected {expected}"
            ),
            InvalidArgument::ThreadCount => f.write_str("worker pool needs at least one thread"),
            InvalidArgument::EnvVar { name, value } => {
                write!(f, "cannot parse {name}={value:?}")
            }
        }
    }
}

impl std::error::Error for InvalidArgument {}

/// A failure raised inside a worker task.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFailure {
    /// A leaf returned an error.
    Failed {
        /// Task index of the failing leaf, when the task knows it.
        task: Option<TaskIndex>,

        /// Human-readable cause.
        reason: String,
    },

    /// A leaf panicked; the panic was caught at the leaf boundary.
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl TaskFailure {
    /// Creates a [`TaskFailure::Failed`] for the given leaf.
    pub fn failed(task: TaskIndex, reason: impl Into<String>) -> Self {
        TaskFailure::Failed { task: Some(task), reason: reason.into() }
    }

    /// Converts a caught panic payload into a [`TaskFailure::Panicked`].
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("non-string panic payload")
        };
        TaskFailure::Panicked { message }
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskFailure::Failed { task: Some(task), reason } => {
                write!(f, "task {task} failed: {reason}")
            }
            TaskFailure::Failed { task: None, reason } => write!(f, "task failed: {reason}"),
            TaskFailure::Panicked { message } => write!(f, "task panicked: {message}"),
        }
    }
}

impl std::error::Error for TaskFailure {}

/// Top-level error returned by engine entry points.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Rejected before any task was forked.
    InvalidArgument(InvalidArgument),

    /// A worker failed; the computation was abandoned.
    PropagatedFailure(TaskFailure),

    /// The worker pool could not be built.
    PoolStartup {
        /// Builder error rendered as text.
        reason: String,
    },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::InvalidArgument(e) => write!(f, "invalid argument: {e}"),
            KernelError::PropagatedFailure(e) => write!(f, "{e}"),
            KernelError::PoolStartup { reason } => {
                write!(f, "failed to start worker pool: {reason}")
            }
        }
    }
}

impl std::error::Error for KernelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KernelError::InvalidArgument(e) => Some(e),
            KernelError::PropagatedFailure(e) => Some(e),
            KernelError::PoolStartup { .. } => None,
        }
    }
}

impl From<InvalidArgument> for KernelError {
    fn from(e: InvalidArgument) -> Self { KernelError::InvalidArgument(e) }
}
impl From<TaskFailure> for KernelError {
    fn from(e: TaskFailure) -> Self { KernelError::PropagatedFailure(e) }
}
impl From<rayon::ThreadPoolBuildError> for KernelError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        KernelError::PoolStartup { reason: e.to_string() }
    }
}
