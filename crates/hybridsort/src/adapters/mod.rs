//! Layer 4: Adapters
//!
//! This layer adapts collections that are not plain slices to the engine.

/// Keyed-container rebuild.
#[cfg(feature = "std")]
pub mod keyed;
