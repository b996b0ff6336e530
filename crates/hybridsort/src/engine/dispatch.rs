//! Backend selection policy.
//!
//! ## Purpose
//!
//! Computes the [`SortDecision`] for one call from element kind, length,
//! caller flags and backend availability. It is a pure function so every
//! branch is testable without hardware; extension crates execute the decision.
//!
//! ## Key concepts
//!
//! 1. External accelerator: requested, 32-bit integer, exact batch size, gateway present.
//! 2. GPU: 32-bit integer keys (unless the CPU backend is forced).
//! 3. CPU: everything else, and the fallback for any accelerator failure.
//!
//! ## Invariants
//!
//! * A decision is derived per call and never stored.

// Internal dependencies
use crate::primitives::backend::Backend;
use crate::primitives::element::ElementKind;

/// Only batch size accepted by the external accelerator.
pub const EXTERNAL_BATCH_SIZE: usize = 1024;

/// Backend chosen for one sort call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDecision {
    /// Fixed-function external accelerator.
    External,

    /// GPU radix pipeline (single or multi-device).
    Gpu,

    /// Adaptive CPU engine.
    Cpu,
}

/// Inputs to [`decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Element classification.
    pub kind: ElementKind,

    /// Number of elements.
    pub len: usize,

    /// Caller asked for the external accelerator.
    pub use_external: bool,

    /// Batch size of the configured external accelerator, if one is configured.
    pub external_batch: Option<usize>,

    /// Backend preference.
    pub backend: Backend,
}

/// Select the backend for `request`.
pub fn decide(request: &DispatchRequest) -> SortDecision {
    let eligible = request.kind.is_radix_eligible();

    let decision = match request.backend {
        Backend::CPU => SortDecision::Cpu,
        _ if !eligible => SortDecision::Cpu,
        Backend::Auto
            if request.use_external && request.external_batch == Some(request.len) =>
        {
            SortDecision::External
        }
        Backend::Auto | Backend::GPU => SortDecision::Gpu,
    };

    log::trace!("dispatch {:?} -> {:?}", request, decision);
    decision
}
