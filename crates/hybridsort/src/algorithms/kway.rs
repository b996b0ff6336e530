//! k-way merge of independently sorted chunks.
//!
//! ## Purpose
//!
//! Combines the per-device sorted chunks of a multi-device sort into one
//! sorted sequence in O(n log k).
//!
//! ## Design notes
//!
//! * **Min-heap**: `BinaryHeap` is a max-heap, so cursors are wrapped in `Reverse`.
//! * **Cursor**: Each heap entry remembers where its value came from, so the
//!   successor can be pushed after a pop.
//!
//! ## Invariants
//!
//! * Output length equals the sum of chunk lengths.
//! * Equal values from different chunks leave in chunk-id order; no stability
//!   guarantee beyond that is made.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::collections::BinaryHeap;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::collections::BinaryHeap;

// External dependencies
use core::cmp::{Ordering, Reverse};

// ============================================================================
// Merge Cursor
// ============================================================================

/// Head of one chunk inside the merge heap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCursor<T> {
    /// Current head value.
    pub value: T,

    /// Index of the chunk the value came from.
    pub chunk: usize,

    /// Position of the value within its chunk.
    pub position: usize,
}

impl<T: Ord> Ord for MergeCursor<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.chunk.cmp(&other.chunk))
    }
}

impl<T: Ord> PartialOrd for MergeCursor<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Merge
// ============================================================================

/// Merge sorted `chunks` into a single sorted vector.
pub fn kway_merge<T, C>(chunks: &[C]) -> Vec<T>
where
    T: Ord + Clone,
    C: AsRef<[T]>,
{
    let total = chunks.iter().map(|c| c.as_ref().len()).sum();
    let mut out = Vec::with_capacity(total);
    let mut heap = BinaryHeap::with_capacity(chunks.len());

    for (chunk, c) in chunks.iter().enumerate() {
        if let Some(head) = c.as_ref().first() {
            heap.push(Reverse(MergeCursor {
                value: head.clone(),
                chunk,
                position: 0,
            }));
        }
    }

    while let Some(Reverse(min)) = heap.pop() {
        let next = min.position + 1;
        if let Some(value) = chunks[min.chunk].as_ref().get(next) {
            heap.push(Reverse(MergeCursor {
                value: value.clone(),
                chunk: min.chunk,
                position: next,
            }));
        }
        out.push(min.value);
    }

    out
}
