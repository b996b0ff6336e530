//! High-level API for adaptive sorting.
//!
//! ## Purpose
//!
//! This module provides the user-facing configuration entry point. It
//! implements a fluent builder for the CPU engine thresholds that ends in a
//! validated, reusable [`Sorter`].
//!
//! ## Design notes
//!
//! * **Ergonomic**: Every parameter has a default; `Sort::new().build()` is valid.
//! * **Validated**: Parameters are checked once, when `.build()` is called.
//! * **Extensible**: Extension crates read the builder fields and the hidden
//!   `backend` hint to construct their own dispatching sorters.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`SortBuilder`] via `Sort::new()`.
//! 2. Chain configuration methods (`.insertion_threshold()`, `.run_length()`, ...).
//! 3. Call `.build()` to get a [`Sorter`].

// External dependencies
use core::cmp::Ordering;

// Internal dependencies
use crate::engine::executor::{SortConfig, adaptive_sort_by_with, adaptive_sort_copy_by_with};
use crate::engine::validator::Validator;

// Publicly re-exported types
pub use crate::engine::dispatch::{EXTERNAL_BATCH_SIZE, SortDecision};
pub use crate::engine::executor::{INSERTION_THRESHOLD, PLATFORM_SORT_THRESHOLD, RUN_LENGTH};
pub use crate::primitives::backend::Backend;
pub use crate::primitives::element::{ElementKind, SignedOrder, SortElement};
pub use crate::primitives::errors::SortError;

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for the CPU sort engine.
#[derive(Debug, Clone, Default)]
pub struct SortBuilder {
    /// Lengths below this use insertion sort.
    pub insertion_threshold: Option<usize>,

    /// Run length of the hybrid tier.
    pub run_length: Option<usize>,

    /// Lengths above this use the platform sort.
    pub platform_threshold: Option<usize>,

    /// Execution backend hint.
    #[doc(hidden)]
    pub backend: Option<Backend>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl SortBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the insertion-sort threshold.
    pub fn insertion_threshold(mut self, threshold: usize) -> Self {
        if self.insertion_threshold.is_some() {
            self.duplicate_param = Some("insertion_threshold");
        }
        self.insertion_threshold = Some(threshold);
        self
    }

    /// Set the run length of the hybrid sort.
    pub fn run_length(mut self, run_length: usize) -> Self {
        if self.run_length.is_some() {
            self.duplicate_param = Some("run_length");
        }
        self.run_length = Some(run_length);
        self
    }

    /// Set the length above which the platform sort takes over.
    pub fn platform_threshold(mut self, threshold: usize) -> Self {
        if self.platform_threshold.is_some() {
            self.duplicate_param = Some("platform_threshold");
        }
        self.platform_threshold = Some(threshold);
        self
    }

    /// Set the execution backend hint.
    #[doc(hidden)]
    pub fn backend(mut self, backend: Backend) -> Self {
        if self.backend.is_some() {
            self.duplicate_param = Some("backend");
        }
        self.backend = Some(backend);
        self
    }

    /// Resolve and validate the CPU thresholds.
    pub fn config(&self) -> Result<SortConfig, SortError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let defaults = SortConfig::default();
        let config = SortConfig {
            insertion_threshold: self
                .insertion_threshold
                .unwrap_or(defaults.insertion_threshold),
            run_length: self.run_length.unwrap_or(defaults.run_length),
            platform_threshold: self
                .platform_threshold
                .unwrap_or(defaults.platform_threshold),
        };

        Validator::validate_config(&config)?;
        Ok(config)
    }

    /// Validate the configuration and build a CPU sorter.
    pub fn build(self) -> Result<Sorter, SortError> {
        Ok(Sorter {
            config: self.config()?,
        })
    }
}

// ============================================================================
// Sorter
// ============================================================================

/// Validated CPU sorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sorter {
    config: SortConfig,
}

impl Sorter {
    /// Thresholds in use.
    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Sort `v` in ascending order.
    pub fn sort<T: Ord + Clone>(&self, v: &mut [T]) {
        adaptive_sort_by_with(v, &self.config, T::cmp);
    }

    /// Sort `v` with `compare`.
    pub fn sort_by<T, F>(&self, v: &mut [T], compare: F)
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        adaptive_sort_by_with(v, &self.config, compare);
    }

    /// Sort small `Copy` elements, merging on inline scratch when possible.
    pub fn sort_copy<T: Ord + Copy>(&self, v: &mut [T]) {
        adaptive_sort_copy_by_with(v, &self.config, T::cmp);
    }
}
