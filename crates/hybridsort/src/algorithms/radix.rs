//! Host reference of the radix pipeline's building blocks.
//!
//! ## Purpose
//!
//! Digit extraction, bucket counting, the exclusive scan and the per-tile
//! write offsets, exactly as the accelerator kernels compute them. Software
//! devices run these on the host, and the constants here size every
//! device-side buffer.
//!
//! ## Key concepts
//!
//! * **Digit**: `(key >> shift) & 0xFF` for `shift` in `{0, 8, 16, 24}`.
//! * **Exclusive scan**: `prefix[0] = 0`, `prefix[i] = prefix[i-1] + hist[i-1]`.
//! * **Tile**: `TILE_KEYS` consecutive keys. Each tile keeps one count (later
//!   one write offset) per bucket, laid out tile-major.
//!
//! ## Invariants
//!
//! * `prefix[i]` is the first output slot of bucket `i` for the current pass.
//! * The sum of a histogram equals the number of keys counted.
//! * The offset of bucket `b` in tile `t` equals `prefix[b]` plus the count of
//!   bucket `b` in tiles `0..t`, so tiles scattered in key order keep the pass stable.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Bits consumed per pass.
pub const RADIX_BITS: u32 = 8;

/// Buckets per pass.
pub const RADIX_BUCKETS: usize = 1 << RADIX_BITS;

/// Passes needed for 32-bit keys.
pub const RADIX_PASSES: u32 = u32::BITS / RADIX_BITS;

/// Keys per scatter tile.
pub const TILE_KEYS: usize = 1024;

const DIGIT_MASK: u32 = (RADIX_BUCKETS as u32) - 1;

/// Shift of every pass, least significant digit first.
#[inline]
pub fn pass_shifts() -> impl Iterator<Item = u32> {
    (0..RADIX_PASSES).map(|pass| pass * RADIX_BITS)
}

/// Bucket of `key` for the pass at `shift`.
#[inline]
pub fn digit(key: u32, shift: u32) -> usize {
    ((key >> shift) & DIGIT_MASK) as usize
}

/// Count keys per bucket for the pass at `shift`.
pub fn histogram(keys: &[u32], shift: u32) -> [u32; RADIX_BUCKETS] {
    let mut counts = [0u32; RADIX_BUCKETS];
    for &key in keys {
        counts[digit(key, shift)] += 1;
    }
    counts
}

/// Exclusive prefix sum of `counts` into `prefix` (same length).
pub fn exclusive_scan_into(counts: &[u32], prefix: &mut [u32]) {
    let mut running = 0u32;
    for (slot, &count) in prefix.iter_mut().zip(counts) {
        *slot = running;
        running += count;
    }
}

/// Exclusive prefix sum of `counts`.
pub fn exclusive_scan(counts: &[u32]) -> Vec<u32> {
    let mut prefix = vec![0u32; counts.len()];
    exclusive_scan_into(counts, &mut prefix);
    prefix
}

/// Number of tiles covering `len` keys.
#[inline]
pub fn tile_count(len: usize) -> usize {
    len.div_ceil(TILE_KEYS)
}

/// Turn tile-major bucket counts into tile-major write offsets, in place.
///
/// `tiles` holds `RADIX_BUCKETS` counts per tile; `prefix` is the exclusive
/// scan of their per-bucket totals.
pub fn tile_offsets_into(tiles: &mut [u32], prefix: &[u32]) {
    let mut running = [0u32; RADIX_BUCKETS];
    running.copy_from_slice(&prefix[..RADIX_BUCKETS]);

    for tile in tiles.chunks_exact_mut(RADIX_BUCKETS) {
        for (slot, next) in tile.iter_mut().zip(running.iter_mut()) {
            let count = *slot;
            *slot = *next;
            *next += count;
        }
    }
}
