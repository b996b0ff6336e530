//! Error types for sorting operations.
//!
//! ## Purpose
//!
//! This module defines the failure conditions a sort call can report: missing
//! or failing accelerator hardware, violated input preconditions, and invalid
//! builder configuration.
//!
//! ## Design notes
//!
//! * **Classified**: Accelerator failures are recoverable by the dispatcher;
//!   everything else surfaces to the caller unchanged.
//! * **Contextual**: Device failures carry the device label and pipeline stage.
//! * **No-std**: Supports `no_std` environments by using `alloc` for dynamic messages.
//!
//! ## Key concepts
//!
//! 1. **Hardware absence**: No accelerator was discovered.
//! 2. **Device failure**: Allocation, kernel launch or synchronization failed mid-pipeline.
//! 3. **Precondition**: Malformed input (wrong batch size, non-contiguous memory).
//! 4. **Configuration**: Builder parameters out of range or set twice.
//!
//! ## Invariants
//!
//! * `is_accelerator_failure` is true exactly for the two hardware variants.
//!
//! ## Non-goals
//!
//! * This module does not decide whether to fall back (handled by the dispatcher).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::error::Error;
#[cfg(feature = "std")]
use std::string::String;

// External dependencies
use core::fmt::{Display, Formatter, Result};

// ============================================================================
// Error Type
// ============================================================================

/// Error type for sorting operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// No parallel-compute device was discovered.
    NoAcceleratorAvailable,

    /// A device operation failed while running the radix pipeline.
    AcceleratorOperationFailed {
        /// Label of the device that failed.
        device: String,
        /// Pipeline stage (`alloc`, `upload`, `histogram`, `scan`, `scatter`, `download`).
        stage: &'static str,
        /// Backend-provided failure description.
        reason: String,
    },

    /// Input or comparator does not satisfy the operation's contract.
    PreconditionViolated(String),

    /// A builder parameter is outside its valid range.
    InvalidParameter {
        /// Name of the parameter.
        parameter: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Parameter was set multiple times in the builder.
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },
}

impl SortError {
    /// Shorthand for a device failure at `stage`.
    pub fn device_failure(
        device: impl Into<String>,
        stage: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::AcceleratorOperationFailed {
            device: device.into(),
            stage,
            reason: reason.into(),
        }
    }

    /// True for hardware-kind failures that a CPU fallback can recover from.
    pub fn is_accelerator_failure(&self) -> bool {
        matches!(
            self,
            Self::NoAcceleratorAvailable | Self::AcceleratorOperationFailed { .. }
        )
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for SortError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::NoAcceleratorAvailable => write!(f, "No accelerator device available"),
            Self::AcceleratorOperationFailed {
                device,
                stage,
                reason,
            } => {
                write!(f, "Accelerator '{device}' failed during {stage}: {reason}")
            }
            Self::PreconditionViolated(msg) => write!(f, "Precondition violated: {msg}"),
            Self::InvalidParameter { parameter, reason } => {
                write!(f, "Invalid {parameter}: {reason}")
            }
            Self::DuplicateParameter { parameter } => {
                write!(
                    f,
                    "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
                )
            }
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

#[cfg(feature = "std")]
impl Error for SortError {}
