//! # Engine Module
//!
//! Fork-join execution engine.
//!
//! This module contains the core building blocks:
//! - Index types and chunk partitioning
//! - Worker pool configuration and lifecycle
//! - The splittable-task abstraction and its fork-join driver
//! - Parallel reduction over flat arrays
//! - Chunked 2D iteration (matrix multiplication)
//!
//! Public API exposure is controlled by `lib.rs`.

pub mod types;
pub mod error;
pub mod partition;
pub mod config;
pub mod pool;
pub mod task;
pub mod reduce;
pub mod matrix;
pub mod manager;
