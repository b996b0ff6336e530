//! Element classification for backend dispatch.
//!
//! ## Purpose
//!
//! The dispatcher chooses a backend from the element type. This module makes
//! that choice a compile-time property: every sortable type implements
//! [`SortElement`], and only 32-bit integers expose their storage as radix keys.
//!
//! ## Design notes
//!
//! * **Monomorphized**: `KIND` is an associated constant, so the dispatch branch
//!   folds away per element type; there is no runtime type inspection.
//! * **Open**: Downstream types opt in with an empty `impl SortElement for MyType {}`
//!   and are always sorted on the CPU.
//! * **CPU hook**: `sort_on_cpu` is how the dispatcher runs the CPU engine.
//!   Small `Copy` types override it to merge on inline scratch.
//!
//! ## Key concepts
//!
//! * **Radix keys**: Unsigned 32-bit words the radix pipeline buckets by byte.
//! * **Sign-bit flip**: XOR with `0x8000_0000` maps `i32` order onto `u32` order.
//!
//! ## Invariants
//!
//! * `radix_keys` returns `Some` only when `KIND` is `Int32` or `UInt32`.
//! * `to_ordered_bits` followed by `from_ordered_bits` is the identity.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::string::String;

// Internal dependencies
use crate::engine::executor::{SortConfig, adaptive_sort_by_with, adaptive_sort_copy_by_with};
use crate::primitives::buffer::{InlineScratch, ScratchKind};

// ============================================================================
// Element Kind
// ============================================================================

/// Coarse element classification used by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Signed 32-bit integer; GPU and external-accelerator eligible.
    Int32,

    /// Unsigned 32-bit integer; GPU and external-accelerator eligible.
    UInt32,

    /// Anything else; CPU only.
    Other,
}

impl ElementKind {
    /// True for kinds the radix pipeline can sort.
    #[inline]
    pub fn is_radix_eligible(self) -> bool {
        matches!(self, Self::Int32 | Self::UInt32)
    }
}

/// How signed keys are mapped onto the unsigned radix domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignedOrder {
    /// True numeric order: negatives before non-negatives (sign bit flipped).
    #[default]
    Numeric,

    /// Raw two's-complement bit order: negatives after non-negatives.
    BitPattern,
}

/// Mutable view of a slice as radix-sortable keys.
#[derive(Debug)]
pub enum RadixKeys<'a> {
    /// Signed keys; need a sign-bit flip for numeric order.
    Signed(&'a mut [i32]),

    /// Unsigned keys; already in radix order.
    Unsigned(&'a mut [u32]),
}

// ============================================================================
// SortElement Trait
// ============================================================================

/// A totally ordered element the engine can sort.
pub trait SortElement: Ord + Clone {
    /// Dispatch classification of this type.
    const KIND: ElementKind = ElementKind::Other;

    /// Reinterpret the slice as radix keys, if this type has them.
    fn radix_keys(_v: &mut [Self]) -> Option<RadixKeys<'_>> {
        None
    }

    /// Sort `v` in ascending order on the CPU engine.
    fn sort_on_cpu(v: &mut [Self], config: &SortConfig) {
        adaptive_sort_by_with(v, config, Self::cmp);
    }

    /// Scratch the hybrid tier uses for `len` elements of this type.
    fn scratch_kind(_len: usize) -> ScratchKind {
        ScratchKind::Heap
    }
}

// CPU hook of `Copy` elements: inline scratch whenever the sort fits.
macro_rules! inline_scratch_hooks {
    () => {
        fn sort_on_cpu(v: &mut [Self], config: &SortConfig) {
            adaptive_sort_copy_by_with(v, config, Self::cmp);
        }

        fn scratch_kind(len: usize) -> ScratchKind {
            if InlineScratch::<Self>::fits(len) {
                ScratchKind::Inline
            } else {
                ScratchKind::Heap
            }
        }
    };
}

impl SortElement for i32 {
    const KIND: ElementKind = ElementKind::Int32;

    fn radix_keys(v: &mut [Self]) -> Option<RadixKeys<'_>> {
        Some(RadixKeys::Signed(v))
    }

    inline_scratch_hooks!();
}

impl SortElement for u32 {
    const KIND: ElementKind = ElementKind::UInt32;

    fn radix_keys(v: &mut [Self]) -> Option<RadixKeys<'_>> {
        Some(RadixKeys::Unsigned(v))
    }

    inline_scratch_hooks!();
}

macro_rules! cpu_only_copy_elements {
    ($($t:ty),* $(,)?) => {
        $(impl SortElement for $t {
            inline_scratch_hooks!();
        })*
    };
}

cpu_only_copy_elements!(
    i8, i16, i64, i128, isize, u8, u16, u64, u128, usize, bool, char, (), &str
);

impl SortElement for String {}

impl<T: SortElement> SortElement for Option<T> {}

impl<A: SortElement, B: SortElement> SortElement for (A, B) {}

impl<A: SortElement, B: SortElement, C: SortElement> SortElement for (A, B, C) {}

// ============================================================================
// Key Conversion
// ============================================================================

const SIGN_BIT: u32 = 0x8000_0000;

/// Map a signed key to an unsigned word whose unsigned order matches `order`.
#[inline]
pub fn to_ordered_bits(value: i32, order: SignedOrder) -> u32 {
    match order {
        SignedOrder::Numeric => (value as u32) ^ SIGN_BIT,
        SignedOrder::BitPattern => value as u32,
    }
}

/// Inverse of [`to_ordered_bits`].
#[inline]
pub fn from_ordered_bits(bits: u32, order: SignedOrder) -> i32 {
    match order {
        SignedOrder::Numeric => (bits ^ SIGN_BIT) as i32,
        SignedOrder::BitPattern => bits as i32,
    }
}

/// Convert signed keys in place; used by the accelerator paths on their shadow copy.
pub fn encode_signed(src: &[i32], dst: &mut [u32], order: SignedOrder) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = to_ordered_bits(s, order);
    }
}

/// Write sorted unsigned words back as signed keys.
pub fn decode_signed(src: &[u32], dst: &mut [i32], order: SignedOrder) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = from_ordered_bits(s, order);
    }
}
