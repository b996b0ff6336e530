//! Execution of backend decisions with CPU fallback.
//!
//! ## Purpose
//!
//! Runs one sort call: asks the core policy for a [`SortDecision`], executes
//! it on the external gateway, the accelerator pool or the CPU engine, and
//! falls back to the CPU engine when an accelerator fails.
//!
//! ## Design notes
//!
//! * **Narrow fallback**: Only hardware-kind errors
//!   (`SortError::is_accelerator_failure`) trigger the CPU fallback; input
//!   precondition errors reach the caller unchanged.
//! * **Forced backends**: With `Backend::GPU` accelerator errors are returned
//!   instead of recovered, so callers can observe the hardware path.
//! * **Lazy pool**: The process-wide pool is touched only when a call
//!   actually takes the GPU path.
//! * **CPU path**: Runs through `SortElement::sort_on_cpu`, so small `Copy`
//!   elements merge on inline scratch.
//!
//! ## Invariants
//!
//! * Exactly one backend produces the final order of a successful call.
//! * A fallback re-sorts the whole input; accelerator paths write the input
//!   only on success.

// External dependencies
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

// Export dependencies from hybridsort crate
use hybridsort::internals::engine::dispatch::{DispatchRequest, SortDecision, decide};
use hybridsort::internals::engine::executor::SortConfig;
use hybridsort::internals::primitives::backend::Backend;
use hybridsort::internals::primitives::element::{RadixKeys, SignedOrder, SortElement};
use hybridsort::internals::primitives::errors::SortError;

// Internal dependencies
use crate::engine::external::{ExternalSorter, external_sort_i32, external_sort_u32};
use crate::engine::orchestrator::{sort_across_devices, sort_i32_across_devices};
use crate::engine::pool::{self, AcceleratorPool};

// ============================================================================
// Settings and Report
// ============================================================================

/// Everything the dispatcher needs besides the data.
#[derive(Debug, Clone, Default)]
pub struct DispatchSettings {
    /// CPU engine thresholds.
    pub config: SortConfig,

    /// Backend preference.
    pub backend: Backend,

    /// Try the external accelerator first.
    pub use_external: bool,

    /// Signed key order on accelerator paths.
    pub signed_order: SignedOrder,

    /// Device pool; `None` uses the process-wide pool.
    pub pool: Option<Arc<AcceleratorPool>>,

    /// External accelerator, if one is configured.
    pub gateway: Option<Arc<dyn ExternalSorter>>,
}

/// Outcome of one dispatched sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortReport {
    /// Number of elements sorted.
    pub len: usize,

    /// Backend the policy selected.
    pub requested: SortDecision,

    /// Backend that produced the final order.
    pub executed: SortDecision,
}

impl SortReport {
    /// True when an accelerator failed and the CPU engine took over.
    pub fn fell_back(&self) -> bool {
        self.requested != self.executed
    }
}

impl Display for SortReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Sorted {} elements on {:?}", self.len, self.executed)?;
        if self.fell_back() {
            write!(f, " (fallback from {:?})", self.requested)?;
        }
        Ok(())
    }
}

// ============================================================================
// Execution
// ============================================================================

/// Sort `v` on the backend the policy selects for it.
pub fn execute<T: SortElement>(
    v: &mut [T],
    settings: &DispatchSettings,
) -> Result<SortReport, SortError> {
    let gateway = settings.gateway.as_deref();
    if settings.use_external && gateway.is_none() {
        log::debug!("external accelerator requested but none is configured");
    }

    let request = DispatchRequest {
        kind: T::KIND,
        len: v.len(),
        use_external: settings.use_external,
        external_batch: gateway.map(|g| g.batch_size()),
        backend: settings.backend,
    };
    let requested = decide(&request);
    log::debug!("sorting {} elements: {:?}", v.len(), requested);

    let executed = match requested {
        SortDecision::Cpu => {
            T::sort_on_cpu(v, &settings.config);
            SortDecision::Cpu
        }
        accelerated => match run_accelerated(v, accelerated, settings) {
            Ok(()) => accelerated,
            Err(e) if e.is_accelerator_failure() && settings.backend == Backend::Auto => {
                log::warn!(
                    "{accelerated:?} path failed ({e}); sorting {} elements on CPU",
                    v.len()
                );
                T::sort_on_cpu(v, &settings.config);
                SortDecision::Cpu
            }
            Err(e) => return Err(e),
        },
    };

    Ok(SortReport {
        len: v.len(),
        requested,
        executed,
    })
}

fn run_accelerated<T: SortElement>(
    v: &mut [T],
    decision: SortDecision,
    settings: &DispatchSettings,
) -> Result<(), SortError> {
    let Some(keys) = T::radix_keys(v) else {
        return Err(SortError::PreconditionViolated(
            "element type is radix-eligible but exposes no radix keys".into(),
        ));
    };

    match decision {
        SortDecision::External => {
            let Some(gateway) = settings.gateway.as_deref() else {
                return Err(SortError::NoAcceleratorAvailable);
            };
            match keys {
                RadixKeys::Signed(values) => {
                    external_sort_i32(gateway, values, settings.signed_order)
                }
                RadixKeys::Unsigned(values) => external_sort_u32(gateway, values),
            }
        }
        _ => {
            let pool = match &settings.pool {
                Some(pool) => Arc::clone(pool),
                None => pool::global(),
            };
            match keys {
                RadixKeys::Signed(values) => {
                    sort_i32_across_devices(&pool, values, settings.signed_order)
                }
                RadixKeys::Unsigned(values) => sort_across_devices(&pool, values),
            }
        }
    }
}
