//! Core index types shared by the partitioner, the task tree and the 2D iterator.
//!
//! Two distinct index spaces appear throughout the engine and must not be
//! confused:
//!
//! - **Task space**: the indices `0..task_count` of the leaves of a fork-join
//!   tree. Described by [`IndexRange`], which is *inclusive* on both ends.
//! - **Element space**: positions inside the caller's array (or the rows and
//!   columns of a matrix). Described by [`Chunk`], which is *half-open*.
//!
//! A leaf task owns exactly one task index, and the partitioner maps that task
//! index to exactly one chunk of the element space.
//!
//! ## Encoding
//!
//! ```text
//! task space    : IndexRange { begin: 0, end: 3 }   -> task indices 0, 1, 2, 3
//! element space : Chunk { start: 4, end: 8 }        -> elements 4, 5, 6, 7
//! ```
//!
//! This module contains no unsafe code and performs no allocation.

use std::ops::Range;

use crate::engine::error::InvalidArgument;


/// Index of a leaf task inside a fork-join tree.
pub type TaskIndex = usize;

/// Inclusive range of task indices owned by one node of the fork-join tree.
///
/// ## Invariants
/// * `begin <= end`
/// * `begin == end` means the node owns exactly one task index and is a leaf.
///
/// Ranges are immutable; splitting produces two new ranges.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexRange {
    begin: TaskIndex,
    end: TaskIndex,
}

impl IndexRange {
    /// Creates the root range `[0, task_count - 1]` covering every leaf.
    ///
    /// ## Errors
    /// [`InvalidArgument::TaskCount`] when `task_count == 0`.

    pub fn full(task_count: usize) -> Result<Self, InvalidArgument> {
        if task_count == 0 {
            return Err(InvalidArgument::TaskCount { got: task_count });
        }
        Ok(Self { begin: 0, end: task_count - 1 })
    }

    /// Creates an inclusive range, rejecting `begin > end`.
    pub fn new(begin: TaskIndex, end: TaskIndex) -> Option<Self> {
        (begin <= end).then_some(Self { begin, end })
    }

    /// First task index (inclusive).
    #[inline]
    pub fn begin(&self) -> TaskIndex {
        self.begin
    }

    /// Last task index (inclusive).
    #[inline]
    pub fn end(&self) -> TaskIndex {
        self.end
    }

    /// Number of task indices covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.begin + 1
    }

    /// Always `false`; an `IndexRange` covers at least one task index.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the single task index of a leaf range, or `None` if the range
    /// still spans several tasks.
    ///
    /// Leaves derive their chunk from this value only.

    #[inline]
    pub fn single(&self) -> Option<TaskIndex> {
        (self.begin == self.end).then_some(self.begin)
    }

    /// Splits the range at its midpoint into `[begin, middle]` and
    /// `[middle + 1, end]`.
    ///
    /// Returns `None` for a leaf. Repeated halving yields a balanced tree of
    /// depth `ceil(log2(len))`.

    pub fn split(&self) -> Option<(Self, Self)> {
        if self.begin == self.end {
            return None;
        }
        let middle = self.begin + (self.end - self.begin) / 2;
        Some((
            Self { begin: self.begin, end: middle },
            Self { begin: middle + 1, end: self.end },
        ))
    }
}

/// Half-open range `[start, end)` of the element space assigned to one unit
/// of work.
///
/// Empty chunks (`start == end`) are valid no-op work.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Chunk {
    /// First element (inclusive).
    pub start: usize,

    /// One past the last element (exclusive).
    pub end: usize,
}

impl Chunk {
    /// Number of elements in the chunk.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` when the chunk covers no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The chunk as a `Range`, ready for slicing.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}
