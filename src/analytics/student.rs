//! Student records and the queries run over them.
//!
//! ## Queries
//! * Average age of currently enrolled students.
//! * Most common first name among students who are not enrolled. Ties go to
//!   the lexicographically smallest name so both flavours agree.
//! * Number of failed students older than 20: not enrolled, `age > 20` and
//!   `grade < 65`.
//!
//! Queries over an empty selection return `None` rather than NaN.

use std::collections::HashMap;

use crate::engine::error::KernelResult;
use crate::engine::pool::WorkerPool;
use crate::engine::reduce::{parallel_reduce, Count, FnReducer, Sum};


/// Grade below which a student has failed.
pub const PASSING_GRADE: u32 = 65;

/// Age a failed student must exceed to be counted.
pub const FAILED_AGE_THRESHOLD: u32 = 20;

/// An immutable student record.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Student {
    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Age in years.
    pub age: u32,

    /// Grade on a 0-100 scale.
    pub grade: u32,

    /// Record identifier.
    pub id: u32,

    /// Whether the student is currently enrolled.
    pub is_currently_enrolled: bool,
}

impl Student {
    /// Creates a record.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        age: u32,
        grade: u32,
        id: u32,
        is_currently_enrolled: bool,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            grade,
            id,
            is_currently_enrolled,
        }
    }

    #[inline]
    fn has_failed_over_20(&self) -> bool {
        !self.is_currently_enrolled && self.age > FAILED_AGE_THRESHOLD && self.grade < PASSING_GRADE
    }
}

/// Student queries bound to a worker pool.

#[derive(Clone, Copy, Debug)]
pub struct StudentAnalytics<'p> {
    pool: &'p WorkerPool,
    task_count: usize,
}

impl<'p> StudentAnalytics<'p> {
    /// Binds the queries to `pool`, using `task_count` leaves per reduction.
    pub fn new(pool: &'p WorkerPool, task_count: usize) -> Self {
        Self { pool, task_count }
    }

    /// Mean age of enrolled students, with loops.
    pub fn average_age_of_enrolled_students_imperative(students: &[Student]) -> Option<f64> {
        let mut enrolled = Vec::new();
        for s in students {
            if s.is_currently_enrolled {
                enrolled.push(s);
            }
        }
        if enrolled.is_empty() {
            return None;
        }

        let mut age_sum = 0.0;
        for s in &enrolled {
            age_sum += f64::from(s.age);
        }
        Some(age_sum / enrolled.len() as f64)
    }

    /// Mean age of enrolled students, as a fork-join reduction.
    pub fn average_age_of_enrolled_students_parallel(&self, students: &[Student]) -> KernelResult<Option<f64>> {
        let reducer = FnReducer::new(
            <(Sum, Count)>::default,
            |acc: &mut (Sum, Count), s: &Student| {
                if s.is_currently_enrolled {
                    acc.0 .0 += f64::from(s.age);
                    acc.1 .0 += 1;
                }
            },
            |a: (Sum, Count), b: (Sum, Count)| (Sum(a.0 .0 + b.0 .0), Count(a.1 .0 + b.1 .0)),
        );

        let (Sum(total), Count(n)) = parallel_reduce(self.pool, students, self.task_count, &reducer)?;
        Ok((n > 0).then(|| total / n as f64))
    }

    /// Most common first name among students not enrolled, with loops.
    pub fn most_common_first_name_of_inactive_students_imperative(students: &[Student]) -> Option<String> {
        let mut name_counts: HashMap<String, u64> = HashMap::new();
        for s in students {
            if !s.is_currently_enrolled {
                *name_counts.entry(s.first_name.clone()).or_insert(0) += 1;
            }
        }
        most_common(name_counts)
    }

    /// Most common first name among students not enrolled, as a fork-join
    /// reduction over per-leaf name histograms.
    pub fn most_common_first_name_of_inactive_students_parallel(
        &self,
        students: &[Student],
    ) -> KernelResult<Option<String>> {
        let reducer = FnReducer::new(
            HashMap::<String, u64>::new,
            |counts: &mut HashMap<String, u64>, s: &Student| {
                if s.is_currently_enrolled {
                    return;
                }
                match counts.get_mut(&s.first_name) {
                    Some(n) => *n += 1,
                    None => {
                        counts.insert(s.first_name.clone(), 1);
                    }
                }
            },
            merge_counts,
        );

        let counts = parallel_reduce(self.pool, students, self.task_count, &reducer)?;
        Ok(most_common(counts))
    }

    /// Number of failed students older than 20, with loops.
    pub fn count_failed_students_older_than_20_imperative(students: &[Student]) -> u64 {
        let mut count = 0;
        for s in students {
            if s.has_failed_over_20() {
                count += 1;
            }
        }
        count
    }

    /// Number of failed students older than 20, as a fork-join reduction.
    pub fn count_failed_students_older_than_20_parallel(&self, students: &[Student]) -> KernelResult<u64> {
        let reducer = FnReducer::new(
            Count::default,
            |acc: &mut Count, s: &Student| {
                if s.has_failed_over_20() {
                    acc.0 += 1;
                }
            },
            |a: Count, b: Count| Count(a.0 + b.0),
        );

        Ok(parallel_reduce(self.pool, students, self.task_count, &reducer)?.0)
    }
}

/// Folds the smaller histogram into the larger one.
fn merge_counts(left: HashMap<String, u64>, right: HashMap<String, u64>) -> HashMap<String, u64> {
    let (mut into, from) = if left.len() >= right.len() { (left, right) } else { (right, left) };
    for (name, n) in from {
        *into.entry(name).or_insert(0) += n;
    }
    into
}

/// Highest count wins; ties go to the smallest name.
fn most_common(counts: HashMap<String, u64>) -> Option<String> {
    counts
        .into_iter()
        .max_by(|(a_name, a_n), (b_name, b_n)| a_n.cmp(b_n).then_with(|| b_name.cmp(a_name)))
        .map(|(name, _)| name)
}
