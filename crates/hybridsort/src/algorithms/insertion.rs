//! Insertion sort for short sequences and fixed-size runs.
//!
//! ## Purpose
//!
//! Sorts inputs below the insertion threshold directly, and sorts each run
//! before the merge phase of the hybrid sort.
//!
//! ## Invariants
//!
//! * Stable: an element only moves past neighbours that compare strictly greater.
//! * Never panics for an inconsistent comparator; order is then unspecified.

// External dependencies
use core::cmp::Ordering;

/// Sort `v` in place with `compare` using straight insertion.
#[inline]
pub fn insertion_sort_by<T, F>(v: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && compare(&v[j - 1], &v[j]) == Ordering::Greater {
            v.swap(j - 1, j);
            j -= 1;
        }
    }
}
