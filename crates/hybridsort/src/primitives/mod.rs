//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the primitive abstractions, data structures, and
//! utility functions used throughout the crate. Its only upward dependency is
//! the CPU engine entry point behind `SortElement::sort_on_cpu`.
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
//! Layer 2: Algorithms
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Element classification and key conversion.
pub mod element;

/// Shared error types.
pub mod errors;

/// Execution backend configuration.
pub mod backend;

/// Merge scratch buffers.
pub mod buffer;
