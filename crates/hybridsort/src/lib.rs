//! # hybridsort — size-adaptive in-place sorting for Rust
//!
//! `hybridsort` sorts any `Ord` slice in place, choosing the algorithm from
//! the input length:
//!
//! | Length            | Algorithm                                   |
//! |-------------------|---------------------------------------------|
//! | 0 or 1            | nothing to do                               |
//! | below 32          | insertion sort                              |
//! | 32 to 100 000     | runs of 32, insertion-sorted, merged bottom-up |
//! | above 100 000     | the standard library's stable sort          |
//!
//! Every tier is stable. The merge phase allocates one scratch buffer per call,
//! copies only the left run of each merge into it, and reads the right run in
//! place.
//!
//! This crate is the CPU core. GPU radix sorting, multi-device orchestration
//! and the external-accelerator gateway live in `fastHybridsort`, which builds
//! on the dispatch primitives defined here.
//!
//! ## Quick Start
//!
//! ```rust
//! use hybridsort::prelude::*;
//!
//! let mut v = vec![5, 3, 9, 1, 7];
//! adaptive_sort(&mut v);
//! assert_eq!(v, [1, 3, 5, 7, 9]);
//! ```
//!
//! ### Custom Thresholds
//!
//! ```rust
//! use hybridsort::prelude::*;
//!
//! let sorter = Sort::new()
//!     .insertion_threshold(16)   // Insertion sort below 16 elements
//!     .run_length(64)            // Merge runs of 64
//!     .build()?;
//!
//! let mut words = vec!["pear", "fig", "apple"];
//! sorter.sort(&mut words);
//! assert_eq!(words, ["apple", "fig", "pear"]);
//! # Result::<(), SortError>::Ok(())
//! ```
//!
//! ### Keyed Containers
//!
//! ```rust
//! # #[cfg(feature = "std")] {
//! use hybridsort::prelude::*;
//!
//! let mut pairs = vec![("b", 2), ("a", 1), ("c", 3)];
//! sort_keyed(&mut pairs);
//! assert_eq!(pairs, [("a", 1), ("b", 2), ("c", 3)]);
//! # }
//! ```
//!
//! ## Minimal Usage (no_std)
//!
//! Disable default features to drop the standard library dependency. The
//! engine only needs `alloc`; keyed containers require `std`.
//!
//! ```toml
//! [dependencies]
//! hybridsort = { version = "0.3", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// Layer 1: Primitives - data structures and basic utilities.
mod primitives;

// Layer 2: Algorithms - insertion, merge, hybrid, k-way, radix reference.
mod algorithms;

// Layer 3: Engine - CPU execution and dispatch policy.
mod engine;

// Layer 4: Adapters - container adaptation.
mod adapters;

// High-level fluent API.
mod api;

pub use crate::algorithms::kway::{MergeCursor, kway_merge};
pub use crate::algorithms::radix::{exclusive_scan, histogram, tile_count, tile_offsets_into};
pub use crate::engine::executor::{
    adaptive_sort, adaptive_sort_by, adaptive_sort_by_key, adaptive_sort_copy,
};

#[cfg(feature = "std")]
pub use crate::adapters::keyed::{KeyedContainer, sort_keyed};

// Standard hybridsort prelude.
pub mod prelude {
    pub use crate::api::{
        Backend::{Auto, CPU, GPU},
        ElementKind, SignedOrder, SortBuilder as Sort, SortDecision, SortElement, SortError,
        Sorter,
    };
    pub use crate::engine::executor::{
        adaptive_sort, adaptive_sort_by, adaptive_sort_by_key, adaptive_sort_copy,
    };

    #[cfg(feature = "std")]
    pub use crate::adapters::keyed::{KeyedContainer, sort_keyed};
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod adapters {
        pub use crate::adapters::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
