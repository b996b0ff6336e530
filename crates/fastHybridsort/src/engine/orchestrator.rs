//! Multi-device partitioning and merge.
//!
//! ## Purpose
//!
//! Splits one key slice across every device of a pool, sorts the chunks
//! concurrently and merges them back into the caller's slice.
//!
//! ## Design notes
//!
//! * **Fork-join**: One `rayon` task per device; the merge starts only after
//!   every task has returned.
//! * **All or nothing**: Any chunk failure fails the whole call, and the
//!   caller's slice is only written after the merge.
//! * **Single device**: With one device the slice is sorted directly, with no
//!   partitioning or merge.
//!
//! ## Key concepts
//!
//! * **Chunk**: An owned copy of a contiguous slice of the input. Every chunk
//!   has `len / devices` keys except the last, which also takes the remainder.
//!
//! ## Invariants
//!
//! * The sum of chunk lengths equals the input length.
//! * Chunk `i` is sorted on device `i`.

// External dependencies
use rayon::prelude::*;

// Export dependencies from hybridsort crate
use hybridsort::internals::algorithms::kway::kway_merge;
use hybridsort::internals::primitives::element::{SignedOrder, decode_signed, encode_signed};
use hybridsort::internals::primitives::errors::SortError;

// Internal dependencies
use crate::engine::pool::AcceleratorPool;

// ============================================================================
// Chunk
// ============================================================================

/// Contiguous piece of the input assigned to one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk (and index of its device).
    pub id: usize,

    /// Keys owned by the chunk.
    pub keys: Vec<u32>,
}

impl AsRef<[u32]> for Chunk {
    fn as_ref(&self) -> &[u32] {
        &self.keys
    }
}

/// Split `keys` into `parts` chunks; the last chunk takes the remainder.
pub fn partition(keys: &[u32], parts: usize) -> Vec<Chunk> {
    let parts = parts.max(1);
    let base = keys.len() / parts;

    (0..parts)
        .map(|id| {
            let start = id * base;
            let end = if id + 1 == parts { keys.len() } else { start + base };
            Chunk {
                id,
                keys: keys[start..end].to_vec(),
            }
        })
        .collect()
}

// ============================================================================
// Orchestration
// ============================================================================

/// Sort `keys` using every device in `pool`.
pub fn sort_across_devices(pool: &AcceleratorPool, keys: &mut [u32]) -> Result<(), SortError> {
    let devices = pool.handles();

    match devices {
        [] => Err(SortError::NoAcceleratorAvailable),
        [device] => device.sort_keys(keys),
        _ => {
            let mut chunks = partition(keys, devices.len());
            log::debug!(
                "splitting {} keys into {} chunks",
                keys.len(),
                chunks.len()
            );

            chunks
                .par_iter_mut()
                .zip(devices.par_iter())
                .try_for_each(|(chunk, device)| device.sort_keys(&mut chunk.keys))?;

            let merged = kway_merge(&chunks);
            keys.copy_from_slice(&merged);
            Ok(())
        }
    }
}

/// Sort signed keys across `pool`, ordered as `order` specifies.
pub fn sort_i32_across_devices(
    pool: &AcceleratorPool,
    values: &mut [i32],
    order: SignedOrder,
) -> Result<(), SortError> {
    if pool.is_empty() {
        return Err(SortError::NoAcceleratorAvailable);
    }

    let mut keys = vec![0u32; values.len()];
    encode_signed(values, &mut keys, order);
    sort_across_devices(pool, &mut keys)?;
    decode_signed(&keys, values, order);
    Ok(())
}
