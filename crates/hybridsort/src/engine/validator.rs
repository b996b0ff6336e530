//! Validation for sort configuration and accelerator inputs.
//!
//! ## Purpose
//!
//! This module checks builder parameters and the input-shape preconditions of
//! the accelerator entry points before any work starts.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Side-effect free**: Nothing is sorted or modified here.
//!
//! ## Invariants
//!
//! * A `SortConfig` that passes `validate_config` never selects a zero run length.
//!
//! ## Non-goals
//!
//! * This module does not detect inconsistent comparators; those yield
//!   unspecified order, not an error.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;

// Internal dependencies
use crate::engine::executor::SortConfig;
use crate::primitives::errors::SortError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for sort configuration and inputs.
pub struct Validator;

impl Validator {
    /// Validate CPU engine thresholds.
    pub fn validate_config(config: &SortConfig) -> Result<(), SortError> {
        if config.run_length == 0 {
            return Err(SortError::InvalidParameter {
                parameter: "run_length",
                reason: "must be at least 1".into(),
            });
        }

        if config.platform_threshold < config.insertion_threshold {
            return Err(SortError::InvalidParameter {
                parameter: "platform_threshold",
                reason: format!(
                    "{} is below insertion_threshold {}",
                    config.platform_threshold, config.insertion_threshold
                ),
            });
        }

        Ok(())
    }

    /// Validate that an input matches a fixed accelerator batch size.
    pub fn validate_batch_len(len: usize, batch: usize) -> Result<(), SortError> {
        if len != batch {
            return Err(SortError::PreconditionViolated(format!(
                "external accelerator accepts exactly {batch} elements, got {len}"
            )));
        }
        Ok(())
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), SortError> {
        if let Some(param) = duplicate_param {
            return Err(SortError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}
