//! Execution backend configuration for extension crates.
//!
//! ## Purpose
//!
//! This module defines the `Backend` preference used by extension crates (like
//! `fastHybridsort`) to steer backend selection at runtime. The core crate only
//! sorts on the CPU; the enum is the shared vocabulary for the dispatcher.
//!
//! ## Key concepts
//!
//! * **Auto**: Let the dispatcher pick by element type and size.
//! * **CPU**: Never touch an accelerator.
//! * **GPU**: Use the accelerator for eligible keys and report its failures
//!   instead of recovering on the CPU.
//!
//! ## Invariants
//!
//! * The default backend is always `Auto`.

/// Execution backend preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum Backend {
    /// Dispatcher decides from element type, size and flags.
    #[default]
    Auto,

    /// CPU execution only.
    CPU,

    /// GPU execution for 32-bit integer keys (requires extension crate with GPU support).
    GPU,
}
