//! Fork-join reductions over a flat array.
//!
//! This module implements the reduction engine: a binary fork-join tree over
//! **task indices** (not elements) whose leaves each reduce one chunk of the
//! input sequentially.
//!
//! ## Execution model
//! A reduction with `task_count` tasks proceeds in two phases:
//!
//! 1. **Recursive splitting**
//!    * The root task owns the task-index range `[0, task_count - 1]`.
//!    * A task spanning more than one index halves its range and forks both
//!      halves onto the worker pool.
//!    * A task owning a single index is a leaf. It asks the
//!      [partitioner](crate::engine::partition) for chunk `index` of
//!      `task_count` chunks and folds those elements left to right.
//!
//! 2. **Deterministic combination**
//!    * Each parent combines `(left, right)` in that order.
//!    * The tree shape depends only on `task_count`, so for a fixed task count
//!      the floating-point order, and therefore the result, is reproducible.
//!    * Different task counts may differ from each other and from the
//!      sequential sum in the last bits.
//!
//! ## Reducers
//! What a leaf computes is described by a [`Reducer`]:
//!
//! * [`Reciprocal`] sums `1 / x`, the kernel behind [`parallel_sum`].
//! * [`FnReducer`] wraps three closures for ad-hoc reductions.
//!
//! Reducers usually accumulate into small plain-data types such as [`Count`]
//! and [`Sum`].
//!
//! ## Usage example
//! ```ignore
//! let total = parallel_sum(&pool, &input, 8)?;
//!
//! let enrolled = parallel_reduce(
//!     &pool,
//!     &students,
//!     8,
//!     &FnReducer::new(
//!         Count::default,
//!         |acc: &mut Count, s: &Student| if s.is_currently_enrolled { acc.0 += 1 },
//!         |a: Count, b: Count| Count(a.0 + b.0),
//!     ),
//! )?;
//! ```

use log::{debug, trace, warn};

use crate::engine::error::{InvalidArgument, KernelResult, TaskFailure};
use crate::engine::partition::Partition;
use crate::engine::pool::WorkerPool;
use crate::engine::task::{self, SplittableTask};
use crate::engine::types::IndexRange;
use crate::profiling::profiler::{self, Arg};


/// Accumulator that counts matching items.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Count(pub u64);

/// Accumulator that computes a floating-point sum.
///
/// ## Semantics
/// Values are accumulated using standard floating-point addition in
/// iteration order. No compensated summation is applied.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sum(pub f64);

/// Describes how a leaf folds its chunk and how partial results merge.
///
/// `combine` should be associative for results to be independent of the
/// task count (up to floating-point rounding).

pub trait Reducer<T>: Sync {
    /// Accumulator type.
    type Acc: Send;

    /// Value a leaf starts from.
    fn identity(&self) -> Self::Acc;

    /// Folds one item into the accumulator.
    fn fold(&self, acc: &mut Self::Acc, item: &T);

    /// Merges the left and right partial results.
    fn combine(&self, left: Self::Acc, right: Self::Acc) -> Self::Acc;
}

/// Sum of reciprocals, `sum(1 / x)`.
///
/// Division by zero is not guarded: a zero element contributes `inf` and the
/// result follows IEEE 754 exactly as the sequential loop would.

#[derive(Clone, Copy, Debug, Default)]
pub struct Reciprocal;

impl Reducer<f64> for Reciprocal {
    type Acc = f64;

    #[inline]
    fn identity(&self) -> f64 {
        0.0
    }

    #[inline]
    fn fold(&self, acc: &mut f64, item: &f64) {
        *acc += 1.0 / *item;
    }

    #[inline]
    fn combine(&self, left: f64, right: f64) -> f64 {
        left + right
    }
}

/// A [`Reducer`] backed by closures.
///
/// Stores an initializer, a fold function, and a combine function, so that
/// one-off reductions need no dedicated type.

pub struct FnReducer<I, F, C> {
    init: I,
    fold: F,
    combine: C,
}

impl<I, F, C> FnReducer<I, F, C> {
    /// Creates a closure-backed reducer.
    ///
    /// # Parameters
    /// - `init`: produces the accumulator each leaf starts from.
    /// - `fold`: folds one item into a leaf's accumulator.
    /// - `combine`: merges two partial accumulators (left, right).
    pub fn new<T, A>(init: I, fold: F, combine: C) -> Self
    where
        I: Fn() -> A + Sync,
        F: Fn(&mut A, &T) + Sync,
        C: Fn(A, A) -> A + Sync,
    {
        Self { init, fold, combine }
    }
}

impl<T, A, I, F, C> Reducer<T> for FnReducer<I, F, C>
where
    A: Send,
    I: Fn() -> A + Sync,
    F: Fn(&mut A, &T) + Sync,
    C: Fn(A, A) -> A + Sync,
{
    type Acc = A;

    fn identity(&self) -> A {
        (self.init)()
    }

    fn fold(&self, acc: &mut A, item: &T) {
        (self.fold)(acc, item)
    }

    fn combine(&self, left: A, right: A) -> A {
        (self.combine)(left, right)
    }
}

/// One node of a reduction tree.
///
/// ## Fields
/// * `range`: task indices owned by this node.
/// * `input`: shared read-only view of the whole input array.
/// * `partition`: element partition with one chunk per task index.
/// * `reducer`: shared fold/combine logic.

pub struct ReductionTask<'a, T, R> {
    range: IndexRange,
    input: &'a [T],
    partition: Partition,
    reducer: &'a R,
}

impl<'a, T, R> ReductionTask<'a, T, R>
where
    T: Sync,
    R: Reducer<T>,
{
    /// Creates the root task for `task_count` tasks over `input`.
    pub fn root(input: &'a [T], task_count: usize, reducer: &'a R) -> Result<Self, InvalidArgument> {
        Ok(Self {
            range: IndexRange::full(task_count)?,
            input,
            partition: Partition::new(input.len(), task_count)?,
            reducer,
        })
    }

    /// Task indices owned by this node.
    pub fn range(&self) -> IndexRange {
        self.range
    }

    fn child(&self, range: IndexRange) -> Self {
        Self {
            range,
            input: self.input,
            partition: self.partition,
            reducer: self.reducer,
        }
    }
}

impl<'a, T, R> SplittableTask for ReductionTask<'a, T, R>
where
    T: Sync,
    R: Reducer<T>,
{
    type Output = R::Acc;

    fn split(&self) -> Option<(Self, Self)> {
        let (left, right) = self.range.split()?;
        Some((self.child(left), self.child(right)))
    }

    fn compute(&self) -> Result<R::Acc, TaskFailure> {
        let index = self.range.single().ok_or_else(|| TaskFailure::Failed {
            task: None,
            reason: format!("leaf reached with unsplit range {:?}", self.range),
        })?;

        let chunk = self
            .partition
            .chunk(index)
            .map_err(|e| TaskFailure::failed(index, e.to_string()))?;

        trace!("leaf {index}: elements {}..{}", chunk.start, chunk.end);

        let mut acc = self.reducer.identity();
        for item in &self.input[chunk.range()] {
            self.reducer.fold(&mut acc, item);
        }
        Ok(acc)
    }

    fn combine(&self, left: R::Acc, right: R::Acc) -> R::Acc {
        self.reducer.combine(left, right)
    }
}

/// Sequential reference: `sum(1 / x)` strictly left to right.

pub fn sequential_sum(input: &[f64]) -> f64 {
    let mut sum = 0.0;
    for x in input {
        sum += 1.0 / x;
    }
    sum
}

/// Sum of reciprocals of `input`, computed by `task_count` fork-join leaves.
///
/// ## Errors
/// * [`InvalidArgument::TaskCount`] when `task_count == 0`; nothing is forked.
/// * [`KernelError::PropagatedFailure`](crate::KernelError::PropagatedFailure)
///   if a leaf fails.
///
/// An empty input yields `0.0` for any valid task count, and a task count
/// larger than the input leaves the surplus leaves with empty chunks.

pub fn parallel_sum(pool: &WorkerPool, input: &[f64], task_count: usize) -> KernelResult<f64> {
    parallel_reduce(pool, input, task_count, &Reciprocal)
}

/// Reduces `items` with `reducer` using `task_count` fork-join leaves.
///
/// ## Errors
/// Same as [`parallel_sum`].

pub fn parallel_reduce<T, R>(
    pool: &WorkerPool,
    items: &[T],
    task_count: usize,
    reducer: &R,
) -> KernelResult<R::Acc>
where
    T: Sync,
    R: Reducer<T>,
{
    let root = ReductionTask::root(items, task_count, reducer).inspect_err(|e| {
        warn!("reduction rejected: {e}");
    })?;

    debug!(
        "reduction: {} elements, {} tasks, chunk size {}",
        items.len(),
        task_count,
        root.partition.chunk_size()
    );

    let _span = profiler::span("reduce")
        .arg("elements", Arg::U64(items.len() as u64))
        .arg("tasks", Arg::U64(task_count as u64));

    task::invoke(pool, root)
}
