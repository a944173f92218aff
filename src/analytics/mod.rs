//! # Analytics Module
//!
//! Filtering, grouping and counting queries over student records, layered on
//! top of the reduction engine.
//!
//! Each query comes in two flavours that return identical results:
//! - `*_imperative`: plain sequential loops, no worker pool involved.
//! - `*_parallel`: a fork-join [`parallel_reduce`](crate::engine::reduce::parallel_reduce)
//!   over the record slice.

pub mod student;

pub use student::{Student, StudentAnalytics};
