use forkjoin_kernels::{
    chunk_end_exclusive, chunk_size, chunk_start_inclusive, Chunk, InvalidArgument, Partition,
};
use proptest::prelude::*;

fn bounds(total_elements: usize, total_chunks: usize) -> Vec<(usize, usize)> {
    Partition::new(total_elements, total_chunks)
        .unwrap()
        .chunks()
        .map(|c| (c.start, c.end))
        .collect()
}

#[test]
fn chunk_size_is_ceiling_division() {
    assert_eq!(chunk_size(10, 4).unwrap(), 3);
    assert_eq!(chunk_size(10, 5).unwrap(), 2);
    assert_eq!(chunk_size(3, 5).unwrap(), 1);
    assert_eq!(chunk_size(0, 3).unwrap(), 0);
    assert_eq!(chunk_size(7, 1).unwrap(), 7);
}

#[test]
fn zero_chunks_is_invalid() {
    assert_eq!(chunk_size(10, 0), Err(InvalidArgument::ChunkCount { got: 0 }));
    assert_eq!(Partition::new(10, 0), Err(InvalidArgument::ChunkCount { got: 0 }));
    assert_eq!(
        chunk_start_inclusive(0, 0, 10),
        Err(InvalidArgument::ChunkCount { got: 0 })
    );
    assert_eq!(
        chunk_end_exclusive(0, 0, 10),
        Err(InvalidArgument::ChunkCount { got: 0 })
    );
}

#[test]
fn chunk_index_must_be_inside_partition() {
    let p = Partition::new(10, 4).unwrap();
    assert_eq!(
        p.chunk(4),
        Err(InvalidArgument::ChunkIndex { index: 4, total_chunks: 4 })
    );
    assert!(chunk_start_inclusive(9, 4, 10).is_err());
}

#[test]
fn even_split() {
    assert_eq!(bounds(8, 4), vec![(0, 2), (2, 4), (4, 6), (6, 8)]);
}

#[test]
fn uneven_split_shortens_last_chunk() {
    assert_eq!(bounds(10, 4), vec![(0, 3), (3, 6), (6, 9), (9, 10)]);
}

#[test]
fn more_chunks_than_elements_leaves_empty_trailing_chunks() {
    assert_eq!(bounds(2, 4), vec![(0, 1), (1, 2), (2, 2), (2, 2)]);
    assert_eq!(bounds(5, 4), vec![(0, 2), (2, 4), (4, 5), (5, 5)]);
    assert_eq!(bounds(0, 3), vec![(0, 0), (0, 0), (0, 0)]);

    let empty = Partition::new(2, 4).unwrap().chunk(3).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.len(), 0);
    assert_eq!(empty.range(), 2..2);
}

#[test]
fn free_functions_agree_with_partition() {
    let p = Partition::new(1000, 7).unwrap();
    for (i, chunk) in p.chunks().enumerate() {
        assert_eq!(chunk_start_inclusive(i, 7, 1000).unwrap(), chunk.start);
        assert_eq!(chunk_end_exclusive(i, 7, 1000).unwrap(), chunk.end);
        assert_eq!(p.chunk(i).unwrap(), chunk);
    }
    assert_eq!(p.total_elements(), 1000);
    assert_eq!(p.total_chunks(), 7);
    assert_eq!(p.chunk_size(), 143);
}

#[test]
fn chunk_len_and_range() {
    let c = Chunk { start: 4, end: 8 };
    assert_eq!(c.len(), 4);
    assert!(!c.is_empty());
    assert_eq!(c.range(), 4..8);
}

proptest! {
    #[test]
    fn chunks_cover_elements_exactly_once(total in 0usize..5000, chunks in 1usize..128) {
        let p = Partition::new(total, chunks).unwrap();
        prop_assert_eq!(p.chunks().len(), chunks);

        let mut next = 0;
        for c in p.chunks() {
            prop_assert!(c.start <= c.end);
            prop_assert_eq!(c.start, next);
            next = c.end;
        }
        prop_assert_eq!(next, total);
    }

    #[test]
    fn only_the_last_non_empty_chunk_is_short(total in 0usize..5000, chunks in 1usize..128) {
        let p = Partition::new(total, chunks).unwrap();
        let size = p.chunk_size();
        let lens: Vec<usize> = p.chunks().map(|c| c.len()).collect();

        let non_empty = lens.iter().take_while(|&&l| l > 0).count();
        prop_assert!(lens[non_empty..].iter().all(|&l| l == 0));

        if non_empty > 0 {
            prop_assert!(lens[..non_empty - 1].iter().all(|&l| l == size));
            prop_assert!(lens[non_empty - 1] <= size);
        }

        // No empty chunks and an uneven split: exactly one short chunk, the last.
        if (chunks - 1) * size < total && total % chunks != 0 {
            prop_assert_eq!(non_empty, chunks);
            prop_assert_eq!(lens.iter().filter(|&&l| l < size).count(), 1);
            prop_assert!(lens[chunks - 1] < size);
        }
    }
}
