//! Scratch memory for the merge phase.
//!
//! ## Purpose
//!
//! The hybrid sort merges adjacent runs by staging the left run in scratch
//! memory and reading the right run in place. This module provides the two
//! scratch implementations and the trait the merge routine is generic over.
//!
//! ## Design notes
//!
//! * **One allocation per sort**: A scratch value is created once per sort call
//!   and reused for every merge of that call.
//! * **Compile-time selection**: `InlineScratch` needs `T: Copy`; the entry point
//!   that can use it is chosen by trait bounds, and the size check depends only on
//!   `size_of::<T>()`, a per-monomorphization constant.
//! * **Lazy Expansion**: `HeapScratch` grows on demand and never shrinks.
//!
//! ## Key concepts
//!
//! * **HeapScratch**: `Vec`-backed, any `Clone` element.
//! * **InlineScratch**: Fixed-size inline array, small `Copy` elements only.
//!
//! ## Invariants
//!
//! * `stage` returns a slice equal to its argument.
//! * `InlineScratch::fits(len)` guarantees every left run of a `len`-element sort fits.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::mem::size_of;

/// Capacity of the inline scratch array, in elements.
pub const INLINE_SCRATCH_LEN: usize = 512;

/// Largest element size, in bytes, eligible for inline scratch.
pub const INLINE_SCRATCH_MAX_ELEM_BYTES: usize = 16;

// ============================================================================
// Scratch Trait
// ============================================================================

/// Scratch the hybrid tier merges on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScratchKind {
    /// `HeapScratch`, allocated once per call.
    Heap,

    /// `InlineScratch`, on the stack.
    Inline,
}

/// Staging area for the left run of a merge.
pub trait Scratch<T> {
    /// Copy `run` into scratch and return the staged copy.
    fn stage(&mut self, run: &[T]) -> &[T];
}

// ============================================================================
// Heap Scratch
// ============================================================================

/// Heap-backed scratch for arbitrary `Clone` elements.
#[derive(Debug, Clone)]
pub struct HeapScratch<T>(Vec<T>);

impl<T> HeapScratch<T> {
    /// Create scratch able to hold `capacity` elements without reallocating.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Current capacity in elements.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }
}

impl<T: Clone> Scratch<T> for HeapScratch<T> {
    #[inline]
    fn stage(&mut self, run: &[T]) -> &[T] {
        self.0.clear();
        self.0.extend_from_slice(run);
        &self.0
    }
}

// ============================================================================
// Inline Scratch
// ============================================================================

/// Fixed-size inline scratch for small `Copy` elements.
#[derive(Debug, Clone, Copy)]
pub struct InlineScratch<T: Copy> {
    buf: [T; INLINE_SCRATCH_LEN],
}

impl<T: Copy> InlineScratch<T> {
    /// Create scratch pre-filled with `fill` (any value of the slice being sorted).
    #[inline]
    pub fn new(fill: T) -> Self {
        Self {
            buf: [fill; INLINE_SCRATCH_LEN],
        }
    }

    /// Whether a sort of `len` elements of `T` can run on inline scratch.
    #[inline]
    pub const fn fits(len: usize) -> bool {
        size_of::<T>() <= INLINE_SCRATCH_MAX_ELEM_BYTES && len <= INLINE_SCRATCH_LEN
    }
}

impl<T: Copy> Scratch<T> for InlineScratch<T> {
    #[inline]
    fn stage(&mut self, run: &[T]) -> &[T] {
        let staged = &mut self.buf[..run.len()];
        staged.copy_from_slice(run);
        staged
    }
}
