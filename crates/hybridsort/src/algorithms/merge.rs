//! Stable merge of two adjacent sorted runs.
//!
//! ## Purpose
//!
//! The merge step of the hybrid sort. The left run is staged in scratch and
//! the right run is read where it lies, so each merge copies at most half of
//! its range.
//!
//! ## Invariants
//!
//! * On equal keys the left run's element is emitted first.
//! * Write position never overtakes the right-run read position.

// External dependencies
use core::cmp::Ordering;

// Internal dependencies
use crate::primitives::buffer::Scratch;

/// Merge `v[..mid]` and `v[mid..]`, both already sorted, into sorted `v`.
pub fn merge_adjacent<T, S, F>(v: &mut [T], mid: usize, scratch: &mut S, compare: &mut F)
where
    T: Clone,
    S: Scratch<T>,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = v.len();
    if mid == 0 || mid >= len {
        return;
    }

    // Already ordered across the boundary
    if compare(&v[mid - 1], &v[mid]) != Ordering::Greater {
        return;
    }

    let left = scratch.stage(&v[..mid]);
    let (mut i, mut j, mut k) = (0, mid, 0);

    while i < left.len() && j < len {
        if compare(&left[i], &v[j]) != Ordering::Greater {
            v[k] = left[i].clone();
            i += 1;
        } else {
            v[k] = v[j].clone();
            j += 1;
        }
        k += 1;
    }

    // Leftover right elements are already in place
    let rest = &left[i..];
    v[k..k + rest.len()].clone_from_slice(rest);
}
