//! High-level API for accelerated sorting.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry points of the accelerated
//! crate: the [`SmartSortBuilder`] that ends in a reusable [`SmartSorter`],
//! and the free functions `smart_sort`, `adaptive_gpu_sort` and
//! `adaptive_gpu_sort_u32`.
//!
//! ## Design notes
//!
//! * **Fluent Integration**: Re-uses the base `hybridsort` builder for the CPU
//!   thresholds and the backend hint.
//! * **Accelerator-First**: 32-bit integer keys go to the GPU path by default
//!   and fall back to the CPU engine when the hardware fails.
//! * **Explicit resources**: The device pool and external gateway can be
//!   injected; otherwise the process-wide ones are used.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`SmartSortBuilder`] via `SmartSort::new()`.
//! 2. Chain configuration methods (`.backend()`, `.pool()`, `.gateway()`, ...).
//! 3. Call `.build()` to get a [`SmartSorter`].

// External dependencies
use std::sync::Arc;

// Export dependencies from hybridsort crate
use hybridsort::internals::engine::dispatch::{DispatchRequest, decide};
use hybridsort::internals::engine::validator::Validator;

// Internal dependencies
use crate::engine::dispatch::{DispatchSettings, execute};
use crate::engine::external;
use crate::engine::orchestrator::{sort_across_devices, sort_i32_across_devices};
use crate::engine::pool;

// Publicly re-exported types
pub use crate::engine::device::HostAccelerator;
pub use crate::engine::dispatch::SortReport;
pub use crate::engine::external::{ExternalSorter, ForeignBatchSorter, ForeignSortFn};
pub use crate::engine::pool::{AcceleratorHandle, AcceleratorPool, DiscoveryOptions};
pub use crate::input::SortInput;
pub use hybridsort::internals::api::{
    Backend, EXTERNAL_BATCH_SIZE, ElementKind, SignedOrder, SortBuilder, SortDecision,
    SortElement, SortError,
};

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for a dispatching sorter.
#[derive(Debug, Clone, Default)]
pub struct SmartSortBuilder {
    /// CPU thresholds and backend hint.
    pub base: SortBuilder,

    /// Try the external accelerator for eligible inputs.
    pub external_accelerator: Option<bool>,

    /// Signed key order on accelerator paths.
    pub signed_order: Option<SignedOrder>,

    /// Device pool; the process-wide pool when unset.
    pub pool: Option<Arc<AcceleratorPool>>,

    /// External accelerator gateway.
    pub gateway: Option<Arc<dyn ExternalSorter>>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl SmartSortBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the insertion-sort threshold of the CPU engine.
    pub fn insertion_threshold(mut self, threshold: usize) -> Self {
        self.base = self.base.insertion_threshold(threshold);
        self
    }

    /// Set the run length of the CPU hybrid sort.
    pub fn run_length(mut self, run_length: usize) -> Self {
        self.base = self.base.run_length(run_length);
        self
    }

    /// Set the length above which the CPU engine uses the platform sort.
    pub fn platform_threshold(mut self, threshold: usize) -> Self {
        self.base = self.base.platform_threshold(threshold);
        self
    }

    /// Set the execution backend.
    ///
    /// `Auto` (default) uses accelerators with CPU fallback, `CPU` never
    /// touches an accelerator, and `GPU` reports accelerator errors instead
    /// of falling back.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.base = self.base.backend(backend);
        self
    }

    /// Try the external accelerator for eligible inputs.
    pub fn external_accelerator(mut self, enabled: bool) -> Self {
        if self.external_accelerator.is_some() {
            self.duplicate_param = Some("external_accelerator");
        }
        self.external_accelerator = Some(enabled);
        self
    }

    /// Set the order of signed keys on accelerator paths.
    pub fn signed_order(mut self, order: SignedOrder) -> Self {
        if self.signed_order.is_some() {
            self.duplicate_param = Some("signed_order");
        }
        self.signed_order = Some(order);
        self
    }

    /// Use `pool` instead of the process-wide pool.
    pub fn pool(mut self, pool: Arc<AcceleratorPool>) -> Self {
        if self.pool.is_some() {
            self.duplicate_param = Some("pool");
        }
        self.pool = Some(pool);
        self
    }

    /// Route eligible inputs to `gateway` when the external accelerator is enabled.
    pub fn gateway(mut self, gateway: Arc<dyn ExternalSorter>) -> Self {
        if self.gateway.is_some() {
            self.duplicate_param = Some("gateway");
        }
        self.gateway = Some(gateway);
        self
    }

    /// Validate the configuration and build the sorter.
    pub fn build(self) -> Result<SmartSorter, SortError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        let config = self.base.config()?;

        if let Some(gateway) = &self.gateway {
            if gateway.batch_size() == 0 {
                return Err(SortError::InvalidParameter {
                    parameter: "gateway",
                    reason: "batch size must be at least 1".into(),
                });
            }
        }

        Ok(SmartSorter {
            settings: DispatchSettings {
                config,
                backend: self.base.backend.unwrap_or_default(),
                use_external: self.external_accelerator.unwrap_or(false),
                signed_order: self.signed_order.unwrap_or_default(),
                pool: self.pool,
                gateway: self.gateway,
            },
        })
    }
}

// ============================================================================
// Sorter
// ============================================================================

/// Validated dispatching sorter.
#[derive(Debug, Clone)]
pub struct SmartSorter {
    settings: DispatchSettings,
}

impl SmartSorter {
    /// Sort `input` in place on the backend selected for it.
    pub fn sort<T, I>(&self, input: &mut I) -> Result<SortReport, SortError>
    where
        T: SortElement,
        I: SortInput<T> + ?Sized,
    {
        execute(input.as_sort_slice_mut()?, &self.settings)
    }

    /// Backend the policy would select for `len` elements of `T`.
    pub fn decision<T: SortElement>(&self, len: usize) -> SortDecision {
        let gateway = self.settings.gateway.as_deref();
        decide(&DispatchRequest {
            kind: T::KIND,
            len,
            use_external: self.settings.use_external,
            external_batch: gateway.map(|g| g.batch_size()),
            backend: self.settings.backend,
        })
    }

    /// Backend preference.
    pub fn backend(&self) -> Backend {
        self.settings.backend
    }
}

// ============================================================================
// Free Functions
// ============================================================================

/// Sort `v`, choosing the backend from its element type and length.
///
/// With `use_external`, 32-bit integer batches of exactly the installed
/// gateway's size go to the external accelerator. Accelerator failures fall
/// back to the CPU engine, so errors are only returned for violated input
/// preconditions.
pub fn smart_sort<T: SortElement>(v: &mut [T], use_external: bool) -> Result<SortReport, SortError> {
    let settings = DispatchSettings {
        use_external,
        gateway: if use_external { external::gateway() } else { None },
        ..Default::default()
    };
    execute(v, &settings)
}

/// Radix-sort signed keys in numeric order on the process-wide pool.
///
/// Returns `NoAcceleratorAvailable` when the pool has no device and
/// `AcceleratorOperationFailed` when a device fails; `v` is unchanged on error.
pub fn adaptive_gpu_sort(v: &mut [i32]) -> Result<(), SortError> {
    sort_i32_across_devices(&pool::global(), v, SignedOrder::Numeric)
}

/// Radix-sort unsigned keys on the process-wide pool.
pub fn adaptive_gpu_sort_u32(v: &mut [u32]) -> Result<(), SortError> {
    sort_across_devices(&pool::global(), v)
}
