//! Dense square matrix multiplication over a chunked 2D index space.
//!
//! `C = A x B` for `N x N` operands, computed two ways:
//!
//! * [`sequential_multiply`] walks the `(i, j)` space in row-major order.
//! * [`parallel_multiply`] partitions rows and columns independently into a
//!   [`ChunkGrid`], and runs one fork-join leaf per non-empty [`Tile`].
//!
//! Every cell uses the same inner product, `k` ascending from `0.0`, so the
//! two kernels agree bit for bit and repeated parallel runs are identical.
//!
//! ## Concurrency model
//! Tasks write into `C` through a raw-pointer view (`OutputCells`) without
//! any locking. Soundness rests on one invariant:
//!
//! * tiles are pairwise disjoint rectangles covering `[0, N) x [0, N)`.
//!
//! The invariant holds by construction: rows and columns are each split by
//! the [partitioner](crate::engine::partition), whose chunks are disjoint and
//! cover their axis exactly, so their cartesian products are disjoint too.
//!
//! ## Safety
//! This module contains unsafe code for the shared output view. Every unsafe
//! block documents the invariant it relies on.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use log::{debug, trace, warn};

use crate::engine::error::{InvalidArgument, KernelResult, TaskFailure};
use crate::engine::partition::Partition;
use crate::engine::pool::WorkerPool;
use crate::engine::task::{self, SplittableTask};
use crate::engine::types::{Chunk, IndexRange};
use crate::profiling::profiler::{self, Arg};


/// Row-major dense matrix of `f64`.

#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A `rows x cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Builds a matrix from row vectors.
    ///
    /// ## Errors
    /// [`InvalidArgument::RaggedRows`] if the rows differ in length.

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, InvalidArgument> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(InvalidArgument::RaggedRows { row, expected: cols, got: values.len() });
            }
            data.extend_from_slice(values);
        }
        Ok(Self { rows: rows.len(), cols, data })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Underlying row-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Copies the matrix out as row vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}

/// A rectangle of the `(i, j)` space owned by exactly one task.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Rows `[start, end)`.
    pub rows: Chunk,

    /// Columns `[start, end)`.
    pub cols: Chunk,
}

impl Tile {
    /// Returns `true` if the tile contains no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    /// Number of cells in the tile.
    #[inline]
    pub fn cells(&self) -> usize {
        self.rows.len() * self.cols.len()
    }
}

/// Independent row and column partitions of an `n x n` index space.
///
/// ## Invariants
/// * [`ChunkGrid::tiles`] yields pairwise disjoint tiles.
/// * Their union is `[0, n) x [0, n)`.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkGrid {
    rows: Partition,
    cols: Partition,
}

impl ChunkGrid {
    /// Grid of `row_chunks x col_chunks` tiles over an `n x n` space.
    pub fn new(n: usize, row_chunks: usize, col_chunks: usize) -> Result<Self, InvalidArgument> {
        Ok(Self {
            rows: Partition::new(n, row_chunks)?,
            cols: Partition::new(n, col_chunks)?,
        })
    }

    /// Grid sized for a pool of `workers` threads.
    ///
    /// One row band per worker (capped by `n`), and enough column splits to
    /// give about two tiles per worker so stealing can even out the tail.

    pub fn for_workers(n: usize, workers: usize) -> Result<Self, InvalidArgument> {
        let axis_cap = n.max(1);
        let workers = workers.max(1);
        let row_chunks = workers.min(axis_cap);
        let col_chunks = (2 * workers).div_ceil(row_chunks).clamp(1, axis_cap);
        Self::new(n, row_chunks, col_chunks)
    }

    /// `(row_chunks, col_chunks)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.total_chunks(), self.cols.total_chunks())
    }

    /// All tiles in row-major order, empty ones included.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.rows
            .chunks()
            .flat_map(move |rows| self.cols.chunks().map(move |cols| Tile { rows, cols }))
    }
}

/// Shared write-only view of the output matrix.
///
/// ## Safety
/// The pointer must:
/// * originate from a live `&mut Matrix` that is not otherwise accessed while
///   the view is in use (enforced by the `'a` borrow),
/// * only be written at cells owned by the writing task's tile.

#[derive(Clone, Copy)]
struct OutputCells<'a> {
    ptr: *mut f64,
    cols: usize,
    len: usize,
    _borrow: PhantomData<&'a mut [f64]>,
}

unsafe impl Send for OutputCells<'_> {}
unsafe impl Sync for OutputCells<'_> {}

impl<'a> OutputCells<'a> {
    fn new(c: &'a mut Matrix) -> Self {
        Self {
            ptr: c.data.as_mut_ptr(),
            cols: c.cols,
            len: c.data.len(),
            _borrow: PhantomData,
        }
    }

    /// # Safety
    /// `(i, j)` must lie in the matrix and belong to the caller's tile; no
    /// other task may write the same cell concurrently.
    #[inline]
    unsafe fn write(&self, i: usize, j: usize, value: f64) {
        let offset = i * self.cols + j;
        debug_assert!(offset < self.len);
        // SAFETY: in bounds per the caller contract; the cell is owned by a
        // single tile, and tiles are disjoint.
        unsafe { *self.ptr.add(offset) = value };
    }
}

/// Inner product of row `i` of `a` and column `j` of `b`, `k` ascending.
#[inline]
fn cell(a: &Matrix, b: &Matrix, i: usize, j: usize, n: usize) -> f64 {
    let row = a.row(i);
    let mut sum = 0.0;
    for k in 0..n {
        sum += row[k] * b[(k, j)];
    }
    sum
}

fn check_shapes(a: &Matrix, b: &Matrix, c: &Matrix, n: usize) -> Result<(), InvalidArgument> {
    for (operand, m) in [("a", a), ("b", b), ("c", c)] {
        if m.shape() != (n, n) {
            return Err(InvalidArgument::MatrixShape { operand, expected: (n, n), got: m.shape() });
        }
    }
    Ok(())
}

/// Sequential reference: fills `c` with `a x b`, row-major.
///
/// ## Errors
/// [`InvalidArgument::MatrixShape`] if any operand is not `n x n`.

pub fn sequential_multiply(a: &Matrix, b: &Matrix, c: &mut Matrix, n: usize) -> KernelResult<()> {
    check_shapes(a, b, c, n)?;
    for i in 0..n {
        for j in 0..n {
            c[(i, j)] = cell(a, b, i, j, n);
        }
    }
    Ok(())
}

/// One node of the tile dispatch tree: a range of tile indices.
struct TileTask<'a, 'c> {
    range: IndexRange,
    tiles: &'a [Tile],
    a: &'a Matrix,
    b: &'a Matrix,
    out: OutputCells<'c>,
    n: usize,
}

impl SplittableTask for TileTask<'_, '_> {
    type Output = ();

    fn split(&self) -> Option<(Self, Self)> {
        let (left, right) = self.range.split()?;
        Some((
            Self { range: left, ..*self },
            Self { range: right, ..*self },
        ))
    }

    fn compute(&self) -> Result<(), TaskFailure> {
        let index = self.range.single().ok_or_else(|| TaskFailure::Failed {
            task: None,
            reason: format!("leaf reached with unsplit range {:?}", self.range),
        })?;
        let tile = self
            .tiles
            .get(index)
            .ok_or_else(|| TaskFailure::failed(index, "tile index out of range"))?;

        trace!("tile {index}: rows {:?}, cols {:?}", tile.rows.range(), tile.cols.range());

        for i in tile.rows.range() {
            for j in tile.cols.range() {
                let value = cell(self.a, self.b, i, j, self.n);
                // SAFETY: (i, j) lies inside this task's tile, tiles come from
                // one ChunkGrid over [0, n) x [0, n) and are pairwise disjoint,
                // and c was checked to be n x n.
                unsafe { self.out.write(i, j, value) };
            }
        }
        Ok(())
    }

    fn combine(&self, _left: (), _right: ()) {}
}

/// Fills `c` with `a x b` using one pool task per tile of a [`ChunkGrid`].
///
/// The grid is sized from the pool's worker count. Output is bit-identical to
/// [`sequential_multiply`].
///
/// ## Errors
/// * [`InvalidArgument::MatrixShape`] if any operand is not `n x n`; checked
///   before any task is forked.
/// * [`KernelError::PropagatedFailure`](crate::KernelError::PropagatedFailure)
///   if a tile task fails. `c` is then only partially written.

pub fn parallel_multiply(
    pool: &WorkerPool,
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
    n: usize,
) -> KernelResult<()> {
    check_shapes(a, b, c, n).inspect_err(|e| warn!("multiply rejected: {e}"))?;

    let grid = ChunkGrid::for_workers(n, pool.num_threads())?;
    let tiles: Vec<Tile> = grid.tiles().filter(|t| !t.is_empty()).collect();

    debug!("multiply: n = {n}, grid {:?}, {} tiles", grid.shape(), tiles.len());

    if tiles.is_empty() {
        return Ok(());
    }

    let _span = profiler::span("multiply")
        .arg("n", Arg::U64(n as u64))
        .arg("tiles", Arg::U64(tiles.len() as u64));

    let root = TileTask {
        range: IndexRange::full(tiles.len())?,
        tiles: &tiles,
        a,
        b,
        out: OutputCells::new(c),
        n,
    };

    task::invoke(pool, root)
}
