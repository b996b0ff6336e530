//! Gateway to a fixed-function external sorting accelerator.
//!
//! ## Purpose
//!
//! Some accelerators sort exactly one batch size and are reached through a
//! foreign function. This module wraps such a device behind
//! [`ExternalSorter`], checks the batch-size precondition and converts signed
//! keys to the accelerator's unsigned domain.
//!
//! ## Design notes
//!
//! * **Opaque**: The accelerator's algorithm is not modelled; only its batch
//!   size and the in-place contract matter.
//! * **Foreign ABI**: [`ForeignBatchSorter`] holds an
//!   `unsafe extern "C" fn(*mut u32, usize)`; constructing it is `unsafe`
//!   because the caller vouches for the function.
//! * **Process-wide gateway**: An optional gateway can be installed for the
//!   free `smart_sort` function; sorter builders take one explicitly.
//!
//! ## Invariants
//!
//! * The accelerator is only called with exactly `batch_size()` keys.
//!
//! ## Non-goals
//!
//! * This module does not fall back on failure (handled by `dispatch`).

// External dependencies
use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};

// Export dependencies from hybridsort crate
use hybridsort::internals::engine::dispatch::EXTERNAL_BATCH_SIZE;
use hybridsort::internals::engine::validator::Validator;
use hybridsort::internals::primitives::element::{SignedOrder, decode_signed, encode_signed};
use hybridsort::internals::primitives::errors::SortError;

/// Foreign sort routine: sorts `len` words at `keys` in place.
pub type ForeignSortFn = unsafe extern "C" fn(keys: *mut u32, len: usize);

// ============================================================================
// Trait
// ============================================================================

/// Fixed-batch sorting device.
pub trait ExternalSorter: Send + Sync + Debug {
    /// The only input length the device accepts.
    fn batch_size(&self) -> usize {
        EXTERNAL_BATCH_SIZE
    }

    /// Sort exactly `batch_size()` keys in ascending order.
    fn sort_batch(&self, keys: &mut [u32]) -> Result<(), SortError>;
}

// ============================================================================
// Foreign Sorter
// ============================================================================

/// [`ExternalSorter`] backed by a foreign function.
#[derive(Debug, Clone, Copy)]
pub struct ForeignBatchSorter {
    sort: ForeignSortFn,
    batch_size: usize,
}

impl ForeignBatchSorter {
    /// Wrap `sort` for batches of [`EXTERNAL_BATCH_SIZE`] keys.
    ///
    /// # Safety
    ///
    /// `sort` must read and write only the `len` words starting at `keys`, must
    /// not retain the pointer after returning, and must be callable from any
    /// thread.
    pub unsafe fn new(sort: ForeignSortFn) -> Self {
        Self {
            sort,
            batch_size: EXTERNAL_BATCH_SIZE,
        }
    }

    /// Wrap `sort` for a device with a non-default batch size.
    ///
    /// # Safety
    ///
    /// Same contract as [`ForeignBatchSorter::new`].
    pub unsafe fn with_batch_size(sort: ForeignSortFn, batch_size: usize) -> Self {
        Self { sort, batch_size }
    }
}

impl ExternalSorter for ForeignBatchSorter {
    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn sort_batch(&self, keys: &mut [u32]) -> Result<(), SortError> {
        Validator::validate_batch_len(keys.len(), self.batch_size)?;
        // SAFETY: `keys` is a live, exclusively borrowed slice of `keys.len()`
        // words, and the constructor's contract covers the callee.
        unsafe { (self.sort)(keys.as_mut_ptr(), keys.len()) };
        Ok(())
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Sort unsigned keys on `sorter`.
pub fn external_sort_u32(sorter: &dyn ExternalSorter, keys: &mut [u32]) -> Result<(), SortError> {
    Validator::validate_batch_len(keys.len(), sorter.batch_size())?;
    sorter.sort_batch(keys)
}

/// Sort signed keys on `sorter`, ordered as `order` specifies.
pub fn external_sort_i32(
    sorter: &dyn ExternalSorter,
    values: &mut [i32],
    order: SignedOrder,
) -> Result<(), SortError> {
    Validator::validate_batch_len(values.len(), sorter.batch_size())?;

    let mut keys = vec![0u32; values.len()];
    encode_signed(values, &mut keys, order);
    sorter.sort_batch(&mut keys)?;
    decode_signed(&keys, values, order);
    Ok(())
}

// ============================================================================
// Process-Wide Gateway
// ============================================================================

static GLOBAL_GATEWAY: RwLock<Option<Arc<dyn ExternalSorter>>> = RwLock::new(None);

/// Install the gateway used by `smart_sort`; returns the previous one.
pub fn install_gateway(sorter: Arc<dyn ExternalSorter>) -> Option<Arc<dyn ExternalSorter>> {
    GLOBAL_GATEWAY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(sorter)
}

/// Currently installed gateway.
pub fn gateway() -> Option<Arc<dyn ExternalSorter>> {
    GLOBAL_GATEWAY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Remove the installed gateway; returns it.
pub fn remove_gateway() -> Option<Arc<dyn ExternalSorter>> {
    GLOBAL_GATEWAY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}
