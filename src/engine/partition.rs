//! Chunk partitioning of a flat element range.
//!
//! Splits `[0, total_elements)` into `total_chunks` contiguous, disjoint
//! chunks using ceiling division:
//!
//! ```text
//! chunk_size = ceil(total_elements / total_chunks)
//! start(i)   = min(total_elements, i * chunk_size)
//! end(i)     = min(total_elements, (i + 1) * chunk_size)
//! ```
//!
//! ## Guarantees
//! * The chunks cover `[0, total_elements)` exactly once.
//! * Every chunk before the last non-empty one has exactly `chunk_size`
//!   elements; the last non-empty chunk may be shorter.
//! * When `total_chunks > total_elements`, trailing chunks are empty
//!   (`start == end`). They are valid no-op work, not an error.
//!
//! Both the reduction engine and the 2D iterator take their boundaries from
//! here and nowhere else. Disjoint writes into the output matrix depend on
//! this arithmetic being exact.

use crate::engine::error::InvalidArgument;
use crate::engine::types::Chunk;


/// Ceiling of `total_elements / total_chunks`.
///
/// ## Errors
/// [`InvalidArgument::ChunkCount`] when `total_chunks == 0`.

#[inline]
pub fn chunk_size(total_elements: usize, total_chunks: usize) -> Result<usize, InvalidArgument> {
    if total_chunks == 0 {
        return Err(InvalidArgument::ChunkCount { got: total_chunks });
    }
    Ok(total_elements.div_ceil(total_chunks))
}

/// First element (inclusive) of chunk `chunk_index`.
pub fn chunk_start_inclusive(
    chunk_index: usize,
    total_chunks: usize,
    total_elements: usize,
) -> Result<usize, InvalidArgument> {
    Ok(Partition::new(total_elements, total_chunks)?.chunk(chunk_index)?.start)
}

/// One past the last element (exclusive) of chunk `chunk_index`.
pub fn chunk_end_exclusive(
    chunk_index: usize,
    total_chunks: usize,
    total_elements: usize,
) -> Result<usize, InvalidArgument> {
    Ok(Partition::new(total_elements, total_chunks)?.chunk(chunk_index)?.end)
}

/// A validated partition of `[0, total_elements)` into `total_chunks` chunks.
///
/// Cheap to copy; leaf tasks carry one by value.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    total_elements: usize,
    total_chunks: usize,
    chunk_size: usize,
}

impl Partition {
    /// Validates the chunk count and precomputes the chunk size.
    pub fn new(total_elements: usize, total_chunks: usize) -> Result<Self, InvalidArgument> {
        let chunk_size = chunk_size(total_elements, total_chunks)?;
        Ok(Self { total_elements, total_chunks, chunk_size })
    }

    /// Number of elements being partitioned.
    #[inline]
    pub fn total_elements(&self) -> usize {
        self.total_elements
    }

    /// Number of chunks.
    #[inline]
    pub fn total_chunks(&self) -> usize {
        self.total_chunks
    }

    /// Nominal chunk size (`ceil(total_elements / total_chunks)`).
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Bounds of chunk `index`.
    ///
    /// ## Errors
    /// [`InvalidArgument::ChunkIndex`] when `index >= total_chunks`.

    pub fn chunk(&self, index: usize) -> Result<Chunk, InvalidArgument> {
        if index >= self.total_chunks {
            return Err(InvalidArgument::ChunkIndex {
                index,
                total_chunks: self.total_chunks,
            });
        }
        Ok(self.chunk_unchecked(index))
    }

    /// Iterates over every chunk in index order, empty ones included.
    pub fn chunks(&self) -> impl ExactSizeIterator<Item = Chunk> + '_ {
        (0..self.total_chunks).map(move |i| self.chunk_unchecked(i))
    }

    #[inline]
    fn chunk_unchecked(&self, index: usize) -> Chunk {
        // saturating: index * chunk_size may exceed usize for huge trailing indices
        let start = index.saturating_mul(self.chunk_size).min(self.total_elements);
        let end = (index + 1).saturating_mul(self.chunk_size).min(self.total_elements);
        Chunk { start, end }
    }
}
