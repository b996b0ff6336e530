//! Bottom-up run/merge hybrid sort.
//!
//! ## Purpose
//!
//! Mid-sized inputs are cut into fixed runs, each run is insertion-sorted,
//! and runs are merged pairwise in rounds of doubling width until a single
//! run spans the slice.
//!
//! ## Key concepts
//!
//! * **Run**: `run_len` consecutive elements (the last run may be shorter).
//! * **Round**: One left-to-right sweep merging run pairs of the current width.
//!
//! ## Invariants
//!
//! * After the round of width `w`, every aligned block of `2w` elements is sorted.
//! * A pair with no right half is left for a later round.
//! * Stable, because both insertion sort and the merge are stable.

// External dependencies
use core::cmp::{Ordering, min};

// Internal dependencies
use crate::algorithms::insertion::insertion_sort_by;
use crate::algorithms::merge::merge_adjacent;
use crate::primitives::buffer::Scratch;

/// Sort `v` with runs of `run_len`, staging left runs in `scratch`.
pub fn hybrid_sort_by<T, S, F>(v: &mut [T], run_len: usize, scratch: &mut S, compare: &mut F)
where
    T: Clone,
    S: Scratch<T>,
    F: FnMut(&T, &T) -> Ordering,
{
    let n = v.len();
    let run_len = run_len.max(1);

    for run in v.chunks_mut(run_len) {
        insertion_sort_by(run, compare);
    }

    let mut width = run_len;
    while width < n {
        let mut lo = 0;
        while lo + width < n {
            let hi = min(lo + 2 * width, n);
            merge_adjacent(&mut v[lo..hi], width, scratch, compare);
            lo = hi;
        }
        width = width.saturating_mul(2);
    }
}
