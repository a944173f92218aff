use std::sync::atomic::{AtomicUsize, Ordering};

use forkjoin_kernels::{
    invoke, IndexRange, InvalidArgument, KernelError, SplittableTask, TaskFailure, TaskIndex,
};

mod common;
use common::*;

/// Sums leaf indices, optionally failing or panicking at one leaf.
struct IndexSum<'a> {
    range: IndexRange,
    fail_at: Option<TaskIndex>,
    panic_at: Option<TaskIndex>,
    leaves_run: &'a AtomicUsize,
}

impl<'a> IndexSum<'a> {
    fn root(task_count: usize, leaves_run: &'a AtomicUsize) -> Self {
        Self {
            range: IndexRange::full(task_count).unwrap(),
            fail_at: None,
            panic_at: None,
            leaves_run,
        }
    }
}

impl SplittableTask for IndexSum<'_> {
    type Output = u64;

    fn split(&self) -> Option<(Self, Self)> {
        let (left, right) = self.range.split()?;
        Some((
            Self { range: left, ..*self },
            Self { range: right, ..*self },
        ))
    }

    fn compute(&self) -> Result<u64, TaskFailure> {
        self.leaves_run.fetch_add(1, Ordering::SeqCst);
        let index = self.range.single().unwrap();

        if self.panic_at == Some(index) {
            panic!("leaf {index} blew up");
        }
        if self.fail_at == Some(index) {
            return Err(TaskFailure::failed(index, "refused"));
        }
        Ok(index as u64)
    }

    fn combine(&self, left: u64, right: u64) -> u64 {
        left + right
    }
}

#[test]
fn every_leaf_runs_once_and_results_combine() {
    let engine = shared_engine();
    for task_count in [1, 2, 3, 16, 1000] {
        let leaves_run = AtomicUsize::new(0);
        let root = IndexSum::root(task_count, &leaves_run);

        let total = invoke(engine.pool(), root).unwrap();

        let n = task_count as u64;
        assert_eq!(total, n * (n - 1) / 2);
        assert_eq!(leaves_run.load(Ordering::SeqCst), task_count);
    }
}

#[test]
fn leaf_failure_is_propagated() {
    let engine = shared_engine();
    let leaves_run = AtomicUsize::new(0);
    let root = IndexSum { fail_at: Some(5), ..IndexSum::root(16, &leaves_run) };

    assert_eq!(
        invoke(engine.pool(), root),
        Err(KernelError::PropagatedFailure(TaskFailure::Failed {
            task: Some(5),
            reason: String::from("refused"),
        }))
    );
}

#[test]
fn leaf_panic_is_caught_and_propagated() {
    let engine = shared_engine();
    let leaves_run = AtomicUsize::new(0);
    let root = IndexSum { panic_at: Some(2), ..IndexSum::root(8, &leaves_run) };

    match invoke(engine.pool(), root) {
        Err(KernelError::PropagatedFailure(TaskFailure::Panicked { message })) => {
            assert!(message.contains("leaf 2 blew up"), "message was {message:?}");
        }
        other => panic!("expected a propagated panic, got {other:?}"),
    }

    // The pool survives the panic.
    let leaves_run = AtomicUsize::new(0);
    assert_eq!(invoke(engine.pool(), IndexSum::root(4, &leaves_run)), Ok(6));
}

#[test]
fn failure_stops_leaves_that_have_not_started() {
    let engine = engine(1);
    let leaves_run = AtomicUsize::new(0);
    let root = IndexSum { fail_at: Some(0), ..IndexSum::root(16, &leaves_run) };

    assert!(invoke(engine.pool(), root).is_err());
    // With one worker the leftmost leaf runs first and nothing runs after it.
    assert_eq!(leaves_run.load(Ordering::SeqCst), 1);

    engine.shutdown();
}

#[test]
fn index_range_rejects_zero_tasks() {
    assert_eq!(IndexRange::full(0), Err(InvalidArgument::TaskCount { got: 0 }));
    assert!(IndexRange::new(3, 2).is_none());
}

#[test]
fn index_range_splits_at_the_midpoint() {
    let full = IndexRange::full(8).unwrap();
    assert_eq!((full.begin(), full.end()), (0, 7));
    assert_eq!(full.len(), 8);

    let (left, right) = full.split().unwrap();
    assert_eq!((left.begin(), left.end()), (0, 3));
    assert_eq!((right.begin(), right.end()), (4, 7));

    let (left, right) = IndexRange::new(0, 2).unwrap().split().unwrap();
    assert_eq!((left.begin(), left.end()), (0, 1));
    assert_eq!((right.begin(), right.end()), (2, 2));

    let leaf = IndexRange::new(5, 5).unwrap();
    assert!(leaf.split().is_none());
    assert_eq!(leaf.single(), Some(5));
    assert_eq!(full.single(), None);
}

#[test]
fn recursive_splitting_reaches_each_index_once() {
    fn leaves(range: IndexRange, out: &mut Vec<TaskIndex>) {
        match range.split() {
            Some((l, r)) => {
                leaves(l, out);
                leaves(r, out);
            }
            None => out.push(range.single().unwrap()),
        }
    }

    for task_count in 1..70 {
        let mut out = Vec::new();
        leaves(IndexRange::full(task_count).unwrap(), &mut out);
        assert_eq!(out, (0..task_count).collect::<Vec<_>>());
    }
}
