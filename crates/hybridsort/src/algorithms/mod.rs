//! Layer 2: Algorithms
//!
//! # Purpose
//!
//! This layer provides the sorting algorithms themselves: insertion sort,
//! the stable run merge, the bottom-up hybrid, the k-way merge of sorted
//! chunks, and the host reference of the radix building blocks.
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Adapters
//!   ↓
//! Layer 3: Engine
//!   ↓
//! Layer 2: Algorithms ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Straight insertion sort.
pub mod insertion;

/// Stable merge of adjacent runs.
pub mod merge;

/// Bottom-up run/merge hybrid.
pub mod hybrid;

/// k-way merge of sorted chunks.
pub mod kway;

/// Radix digit, histogram and scan reference.
pub mod radix;
