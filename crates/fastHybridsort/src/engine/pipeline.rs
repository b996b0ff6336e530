//! Four-pass LSD radix sort over a [`RadixDevice`].
//!
//! ## Purpose
//!
//! Sorts one slice of `u32` keys on one device. Each of the four 8-bit passes
//! zeroes the histogram, counts digits per tile, scans the totals into bucket
//! offsets, derives each tile's write offsets and scatters the keys into the
//! opposite buffer.
//!
//! ## Design notes
//!
//! * **Ping-pong**: Two key buffers swap roles after every pass. With an even
//!   pass count the sorted keys end in the buffer the input was uploaded to.
//! * **Synchronous**: Every device operation returns only after the device has
//!   finished it, so passes never overlap.
//! * **Scoped buffers**: All buffers are locals; any `?` exit drops them.
//!
//! ## Invariants
//!
//! * `keys` is written only after the final download succeeds.
//! * The pass sequence is least significant digit first.

// Export dependencies from hybridsort crate
use hybridsort::internals::algorithms::radix::{
    RADIX_BUCKETS, RADIX_PASSES, pass_shifts, tile_count,
};
use hybridsort::internals::primitives::errors::SortError;

// Internal dependencies
use crate::engine::device::RadixDevice;

/// Sort `keys` in ascending order on `device`.
pub fn radix_sort_on<D: RadixDevice>(device: &D, keys: &mut [u32]) -> Result<(), SortError> {
    let len = keys.len();
    if len <= 1 {
        return Ok(());
    }

    log::debug!(
        "radix sort of {len} keys on '{}' ({RADIX_PASSES} passes)",
        device.label()
    );

    let keys_a = device.alloc("keys_a", len)?;
    let keys_b = device.alloc("keys_b", len)?;
    let histogram = device.alloc("histogram", RADIX_BUCKETS)?;
    let prefix = device.alloc("prefix", RADIX_BUCKETS)?;
    let tiles = device.alloc("tiles", tile_count(len) * RADIX_BUCKETS)?;

    device.upload(&keys_a, keys)?;

    let (mut src, mut dst) = (&keys_a, &keys_b);
    for shift in pass_shifts() {
        device.zero(&histogram)?;
        device.histogram(src, len, shift, &tiles, &histogram)?;
        device.exclusive_scan(&histogram, &prefix)?;
        device.tile_offsets(&prefix, &tiles, len)?;
        device.scatter(src, dst, len, shift, &tiles)?;
        core::mem::swap(&mut src, &mut dst);
        log::trace!("pass at shift {shift} done on '{}'", device.label());
    }

    device.download(src, keys)
}
