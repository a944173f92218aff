//! Seeded test-data generators.
//!
//! Used by integration tests and benchmarks to build reproducible inputs:
//! the same `seed` always yields the same data, on every platform.
//!
//! # Non-goals
//!
//! - These generators are **not** statistically tuned workloads; they only
//!   need to be deterministic and to avoid degenerate values (for example,
//!   reciprocal inputs never contain zero).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analytics::Student;
use crate::engine::matrix::Matrix;


const FIRST_NAMES: [&str; 8] = ["Sanjay", "Yunming", "John", "Vivek", "Shams", "Max", "Ana", "Lucia"];
const LAST_NAMES: [&str; 8] = ["Chatterjee", "Zhang", "Smith", "Sarkar", "Imam", "Grossman", "Ruiz", "Mora"];

/// `len` values uniformly drawn from `[1, 100]`.
pub fn random_reciprocal_input(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(1.0..=100.0)).collect()
}

/// An `n x n` matrix with values uniformly drawn from `[0, 100)`.
pub fn random_matrix(n: usize, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = Matrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            m[(i, j)] = rng.gen_range(0.0..100.0);
        }
    }
    m
}

/// `count` students with names from a fixed pool, ages 15-34, grades 0-100,
/// and roughly half enrolled.
pub fn random_students(count: usize, seed: u64) -> Vec<Student> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|id| {
            Student::new(
                FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())],
                LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())],
                rng.gen_range(15..35),
                rng.gen_range(0..=100),
                id as u32,
                rng.gen_bool(0.5),
            )
        })
        .collect()
}
