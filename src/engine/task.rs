//! Splittable units of work and the fork-join driver.
//!
//! A [`SplittableTask`] is a node of a fork-join tree. It either splits into
//! two children or, as a leaf, computes a value sequentially. Parents combine
//! their children's values.
//!
//! ## Execution
//! [`invoke`] runs a root task on a [`WorkerPool`]:
//!
//! 1. A node that splits forks both halves with `rayon::join`, waits for
//!    both, and combines their outputs.
//! 2. A leaf runs [`SplittableTask::compute`] behind a panic boundary.
//!
//! No ordering is guaranteed between siblings. The tree shape, and therefore
//! the combination order, depends only on the root task.
//!
//! ## Failure propagation
//! The first [`TaskFailure`] (returned or caught as a panic) is recorded and
//! raises an abort flag. Leaves that have not started yet see the flag and
//! skip their work; once the tree unwinds, [`invoke`] returns the recorded
//! failure as [`KernelError::PropagatedFailure`]. Partial results are
//! discarded.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use log::debug;

use crate::engine::error::{KernelError, KernelResult, TaskFailure};
use crate::engine::pool::WorkerPool;


/// A node of a fork-join tree.
///
/// Implementations must be `Sync` since the two halves of a split run on
/// different workers while sharing references held by the task.

pub trait SplittableTask: Send + Sync + Sized {
    /// Value produced by a leaf and by combining two children.
    type Output: Send;

    /// Splits the task into two halves, or returns `None` for a leaf.
    fn split(&self) -> Option<(Self, Self)>;

    /// Sequential work of a leaf.
    fn compute(&self) -> Result<Self::Output, TaskFailure>;

    /// Merges the outputs of the left and right halves.
    fn combine(&self, left: Self::Output, right: Self::Output) -> Self::Output;
}

/// Shared failure state of one `invoke` call.
struct Abort {
    raised: AtomicBool,
    first: OnceLock<TaskFailure>,
}

impl Abort {
    fn raise(&self, failure: TaskFailure) {
        let _ = self.first.set(failure);
        self.raised.store(true, Ordering::Release);
    }

    #[inline]
    fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

/// Runs `root` to completion on `pool` and returns the combined output.
///
/// ## Errors
/// [`KernelError::PropagatedFailure`] carrying the first leaf failure.

pub fn invoke<T: SplittableTask>(pool: &WorkerPool, root: T) -> KernelResult<T::Output> {
    let abort = Abort {
        raised: AtomicBool::new(false),
        first: OnceLock::new(),
    };

    let output = pool.install(|| run(&root, &abort));

    if let Some(failure) = abort.first.into_inner() {
        debug!("fork-join tree abandoned: {failure}");
        return Err(KernelError::PropagatedFailure(failure));
    }

    output.ok_or_else(|| {
        KernelError::PropagatedFailure(TaskFailure::Failed {
            task: None,
            reason: String::from("fork-join tree produced no result"),
        })
    })
}

/// Recursive step. `None` means the subtree was abandoned after a failure.
fn run<T: SplittableTask>(task: &T, abort: &Abort) -> Option<T::Output> {
    if abort.is_raised() {
        return None;
    }

    match task.split() {
        Some((left, right)) => {
            let (l, r) = rayon::join(|| run(&left, abort), || run(&right, abort));
            Some(task.combine(l?, r?))
        }
        None => {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| task.compute()))
                .unwrap_or_else(|payload| Err(TaskFailure::from_panic(payload)));
            match outcome {
                Ok(value) => Some(value),
                Err(failure) => {
                    abort.raise(failure);
                    None
                }
            }
        }
    }
}
