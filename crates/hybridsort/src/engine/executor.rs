//! Size-adaptive CPU sort engine.
//!
//! ## Purpose
//!
//! This module picks the CPU algorithm for one sort call from the input
//! length and runs it in place.
//!
//! ## Design notes
//!
//! * **Size tiers**: insertion sort below `insertion_threshold`, the platform's
//!   stable sort above `platform_threshold`, the run/merge hybrid in between.
//! * **Scratch reuse**: The hybrid tier allocates one scratch buffer per call.
//! * **Inline scratch**: The `Copy` entry points keep scratch on the stack when
//!   the whole sort fits; the decision depends only on the element size and length.
//!   `SortElement::sort_on_cpu` routes small `Copy` elements here.
//!
//! ## Key concepts
//!
//! * **CpuStrategy**: The tier chosen for a given length.
//! * **SortConfig**: Thresholds, validated by the builder in `api`.
//!
//! ## Invariants
//!
//! * Inputs of length 0 or 1 are never touched.
//! * Every tier is stable, so the engine as a whole is stable.
//!
//! ## Non-goals
//!
//! * This module does not talk to accelerators (handled by extension crates).

// External dependencies
use core::cmp::Ordering;

// Internal dependencies
use crate::algorithms::hybrid::hybrid_sort_by;
use crate::algorithms::insertion::insertion_sort_by;
use crate::primitives::buffer::{HeapScratch, InlineScratch};

/// Inputs shorter than this are insertion-sorted directly.
pub const INSERTION_THRESHOLD: usize = 32;

/// Run length of the hybrid sort.
pub const RUN_LENGTH: usize = 32;

/// Inputs longer than this go to the platform sort.
pub const PLATFORM_SORT_THRESHOLD: usize = 100_000;

// ============================================================================
// Configuration
// ============================================================================

/// CPU tier selected for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuStrategy {
    /// Nothing to do.
    Noop,

    /// Straight insertion sort.
    Insertion,

    /// Run/merge hybrid.
    Hybrid,

    /// Platform stable sort.
    Platform,
}

/// Thresholds of the CPU engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    /// Lengths below this use insertion sort.
    pub insertion_threshold: usize,

    /// Run length of the hybrid tier.
    pub run_length: usize,

    /// Lengths above this use the platform sort.
    pub platform_threshold: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            insertion_threshold: INSERTION_THRESHOLD,
            run_length: RUN_LENGTH,
            platform_threshold: PLATFORM_SORT_THRESHOLD,
        }
    }
}

impl SortConfig {
    /// Tier used for an input of `len` elements.
    #[inline]
    pub fn strategy(&self, len: usize) -> CpuStrategy {
        if len <= 1 {
            CpuStrategy::Noop
        } else if len < self.insertion_threshold {
            CpuStrategy::Insertion
        } else if len > self.platform_threshold {
            CpuStrategy::Platform
        } else {
            CpuStrategy::Hybrid
        }
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Sort `v` with `compare` using the tier `config` selects.
pub fn adaptive_sort_by_with<T, F>(v: &mut [T], config: &SortConfig, mut compare: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    match config.strategy(v.len()) {
        CpuStrategy::Noop => {}
        CpuStrategy::Insertion => insertion_sort_by(v, &mut compare),
        CpuStrategy::Platform => v.sort_by(compare),
        CpuStrategy::Hybrid => {
            let mut scratch = HeapScratch::with_capacity(v.len());
            hybrid_sort_by(v, config.run_length, &mut scratch, &mut compare);
        }
    }
}

/// Variant of [`adaptive_sort_by_with`] for `Copy` elements that can merge on inline scratch.
pub fn adaptive_sort_copy_by_with<T, F>(v: &mut [T], config: &SortConfig, mut compare: F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    match config.strategy(v.len()) {
        CpuStrategy::Hybrid if InlineScratch::<T>::fits(v.len()) => {
            let mut scratch = InlineScratch::new(v[0]);
            hybrid_sort_by(v, config.run_length, &mut scratch, &mut compare);
        }
        _ => adaptive_sort_by_with(v, config, compare),
    }
}

/// Sort `v` in ascending order with the default thresholds.
#[inline]
pub fn adaptive_sort<T: Ord + Clone>(v: &mut [T]) {
    adaptive_sort_by_with(v, &SortConfig::default(), T::cmp);
}

/// Sort `v` with `compare` and the default thresholds.
#[inline]
pub fn adaptive_sort_by<T, F>(v: &mut [T], compare: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    adaptive_sort_by_with(v, &SortConfig::default(), compare);
}

/// Sort `v` by the key `f` extracts, with the default thresholds.
#[inline]
pub fn adaptive_sort_by_key<T, K, F>(v: &mut [T], mut f: F)
where
    T: Clone,
    K: Ord,
    F: FnMut(&T) -> K,
{
    adaptive_sort_by_with(v, &SortConfig::default(), |a, b| f(a).cmp(&f(b)));
}

/// Sort small `Copy` elements in ascending order, merging on inline scratch when possible.
#[inline]
pub fn adaptive_sort_copy<T: Ord + Copy>(v: &mut [T]) {
    adaptive_sort_copy_by_with(v, &SortConfig::default(), T::cmp);
}
