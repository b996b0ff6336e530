//! Radix device abstraction and the host software device.
//!
//! ## Purpose
//!
//! This module defines [`RadixDevice`], the set of buffer and kernel
//! operations the radix pipeline is written against, and [`HostAccelerator`],
//! a software device that executes the same kernels on a private `rayon`
//! thread pool.
//!
//! ## Design notes
//!
//! * **Kernel-shaped**: Every trait method corresponds to one device
//!   submission; the host device mirrors the WGSL kernels.
//! * **Tiled passes**: Keys are processed in tiles of `TILE_KEYS`. Counting and
//!   scattering are parallel over tiles, and only the per-bucket offset step
//!   walks the tiles in order.
//! * **Owned buffers**: `RadixDevice::Buffer` values release their memory on
//!   drop, so every exit path of the pipeline frees what it allocated.
//! * **Memory limit**: The host device can be capped to reproduce allocation
//!   failures deterministically.
//!
//! ## Key concepts
//!
//! * **Words**: All device buffers hold `u32` words.
//! * **Tile buffer**: `RADIX_BUCKETS` words per tile, tile-major. The histogram
//!   pass writes counts into it and the offset pass rewrites them as write offsets.
//! * **Stable scatter**: Each tile is scattered in key order from its own
//!   offsets, and tile offsets follow tile order.
//!
//! ## Invariants
//!
//! * A failed `alloc` leaves the device's accounted memory unchanged.
//! * Tiles write disjoint output slots.
//!
//! ## Non-goals
//!
//! * This module does not sequence the passes (handled by `pipeline`).

// External dependencies
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

// Export dependencies from hybridsort crate
use hybridsort::internals::algorithms::radix::{
    RADIX_BUCKETS, TILE_KEYS, digit, exclusive_scan_into, tile_count,
};
use hybridsort::internals::primitives::errors::SortError;

// ============================================================================
// Device Trait
// ============================================================================

/// Operations the radix pipeline needs from a compute device.
pub trait RadixDevice: Send + Sync {
    /// Device-resident buffer of `u32` words, released on drop.
    type Buffer: Send + Sync;

    /// Human-readable device label used in errors and logs.
    fn label(&self) -> &str;

    /// Allocate a zero-initialized buffer of `words` words.
    fn alloc(&self, label: &'static str, words: usize) -> Result<Self::Buffer, SortError>;

    /// Copy `data` into the start of `buffer`.
    fn upload(&self, buffer: &Self::Buffer, data: &[u32]) -> Result<(), SortError>;

    /// Reset every word of `buffer` to zero.
    fn zero(&self, buffer: &Self::Buffer) -> Result<(), SortError>;

    /// Count the digit at `shift` of the first `len` keys.
    ///
    /// Per-tile counts go to `tiles`; totals are added into `histogram`.
    fn histogram(
        &self,
        keys: &Self::Buffer,
        len: usize,
        shift: u32,
        tiles: &Self::Buffer,
        histogram: &Self::Buffer,
    ) -> Result<(), SortError>;

    /// Write the exclusive prefix sum of `histogram` into `prefix`.
    fn exclusive_scan(
        &self,
        histogram: &Self::Buffer,
        prefix: &Self::Buffer,
    ) -> Result<(), SortError>;

    /// Rewrite the tile counts of `len` keys as per-tile write offsets.
    fn tile_offsets(
        &self,
        prefix: &Self::Buffer,
        tiles: &Self::Buffer,
        len: usize,
    ) -> Result<(), SortError>;

    /// Move the first `len` keys of `src` into `dst` at the offsets in `tiles`.
    fn scatter(
        &self,
        src: &Self::Buffer,
        dst: &Self::Buffer,
        len: usize,
        shift: u32,
        tiles: &Self::Buffer,
    ) -> Result<(), SortError>;

    /// Copy the first `out.len()` words of `buffer` to the host.
    fn download(&self, buffer: &Self::Buffer, out: &mut [u32]) -> Result<(), SortError>;
}

// ============================================================================
// Host Buffer
// ============================================================================

/// Host memory standing in for a device buffer.
pub struct HostBuffer {
    words: Vec<AtomicU32>,
    bytes: usize,
    accounted: Arc<AtomicUsize>,
}

impl HostBuffer {
    /// Number of `u32` words the buffer holds.
    pub fn words(&self) -> usize {
        self.words.len()
    }
}

impl Drop for HostBuffer {
    fn drop(&mut self) {
        self.accounted.fetch_sub(self.bytes, Ordering::AcqRel);
    }
}

// ============================================================================
// Host Accelerator
// ============================================================================

/// Software radix device backed by a private thread pool.
pub struct HostAccelerator {
    label: String,
    pool: ThreadPool,
    memory_limit: Option<usize>,
    accounted: Arc<AtomicUsize>,
}

impl HostAccelerator {
    /// Create a host device running kernels on `threads` worker threads.
    ///
    /// `threads == 0` lets `rayon` pick the thread count.
    pub fn new(label: impl Into<String>, threads: usize) -> Result<Self, SortError> {
        let label = label.into();
        let thread_label = label.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("{thread_label}-worker-{i}"))
            .build()
            .map_err(|e| SortError::device_failure(label.as_str(), "init", e.to_string()))?;

        Ok(Self {
            label,
            pool,
            memory_limit: None,
            accounted: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Cap the bytes this device may hold at once.
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    /// Configured memory cap, if any.
    pub fn memory_limit(&self) -> Option<usize> {
        self.memory_limit
    }

    /// Bytes currently held by live buffers.
    pub fn allocated_bytes(&self) -> usize {
        self.accounted.load(Ordering::Acquire)
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn check_len(&self, stage: &'static str, buffer: &HostBuffer, len: usize) -> Result<(), SortError> {
        if len > buffer.words() {
            return Err(SortError::device_failure(
                self.label.as_str(),
                stage,
                format!("{len} words requested from a {}-word buffer", buffer.words()),
            ));
        }
        Ok(())
    }
}

impl Debug for HostAccelerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HostAccelerator")
            .field("label", &self.label)
            .field("threads", &self.threads())
            .field("memory_limit", &self.memory_limit)
            .finish()
    }
}

impl RadixDevice for HostAccelerator {
    type Buffer = HostBuffer;

    fn label(&self) -> &str {
        &self.label
    }

    fn alloc(&self, label: &'static str, words: usize) -> Result<HostBuffer, SortError> {
        let bytes = words.saturating_mul(size_of::<u32>());
        let before = self.accounted.fetch_add(bytes, Ordering::AcqRel);

        if let Some(limit) = self.memory_limit {
            if before.saturating_add(bytes) > limit {
                self.accounted.fetch_sub(bytes, Ordering::AcqRel);
                return Err(SortError::device_failure(
                    self.label.as_str(),
                    "alloc",
                    format!("{label}: {bytes} bytes requested, {before} of {limit} in use"),
                ));
            }
        }

        Ok(HostBuffer {
            words: (0..words).map(|_| AtomicU32::new(0)).collect(),
            bytes,
            accounted: Arc::clone(&self.accounted),
        })
    }

    fn upload(&self, buffer: &HostBuffer, data: &[u32]) -> Result<(), SortError> {
        self.check_len("upload", buffer, data.len())?;
        self.pool.install(|| {
            buffer.words[..data.len()]
                .par_iter()
                .zip(data.par_iter())
                .for_each(|(slot, &value)| slot.store(value, Ordering::Relaxed));
        });
        Ok(())
    }

    fn zero(&self, buffer: &HostBuffer) -> Result<(), SortError> {
        self.pool.install(|| {
            buffer
                .words
                .par_iter()
                .for_each(|slot| slot.store(0, Ordering::Relaxed));
        });
        Ok(())
    }

    fn histogram(
        &self,
        keys: &HostBuffer,
        len: usize,
        shift: u32,
        tiles: &HostBuffer,
        histogram: &HostBuffer,
    ) -> Result<(), SortError> {
        self.check_len("histogram", keys, len)?;
        self.check_len("histogram", tiles, tile_count(len) * RADIX_BUCKETS)?;
        self.check_len("histogram", histogram, RADIX_BUCKETS)?;

        self.pool.install(|| {
            keys.words[..len]
                .par_chunks(TILE_KEYS)
                .zip(tiles.words.par_chunks(RADIX_BUCKETS))
                .for_each(|(tile, counts)| {
                    let mut local = [0u32; RADIX_BUCKETS];
                    for key in tile {
                        local[digit(key.load(Ordering::Relaxed), shift)] += 1;
                    }
                    for (bucket, &count) in local.iter().enumerate() {
                        counts[bucket].store(count, Ordering::Relaxed);
                        if count > 0 {
                            histogram.words[bucket].fetch_add(count, Ordering::Relaxed);
                        }
                    }
                });
        });
        Ok(())
    }

    fn exclusive_scan(&self, histogram: &HostBuffer, prefix: &HostBuffer) -> Result<(), SortError> {
        self.check_len("scan", histogram, RADIX_BUCKETS)?;
        self.check_len("scan", prefix, RADIX_BUCKETS)?;

        let counts: Vec<u32> = histogram.words[..RADIX_BUCKETS]
            .iter()
            .map(|c| c.load(Ordering::Acquire))
            .collect();
        let mut offsets = [0u32; RADIX_BUCKETS];
        exclusive_scan_into(&counts, &mut offsets);

        for (slot, offset) in prefix.words.iter().zip(offsets) {
            slot.store(offset, Ordering::Release);
        }
        Ok(())
    }

    fn tile_offsets(
        &self,
        prefix: &HostBuffer,
        tiles: &HostBuffer,
        len: usize,
    ) -> Result<(), SortError> {
        let words = tile_count(len) * RADIX_BUCKETS;
        self.check_len("offsets", prefix, RADIX_BUCKETS)?;
        self.check_len("offsets", tiles, words)?;

        // One task per bucket, walking the tiles in order.
        self.pool.install(|| {
            (0..RADIX_BUCKETS).into_par_iter().for_each(|bucket| {
                let mut running = prefix.words[bucket].load(Ordering::Acquire);
                for slot in tiles.words[..words].iter().skip(bucket).step_by(RADIX_BUCKETS) {
                    let count = slot.load(Ordering::Relaxed);
                    slot.store(running, Ordering::Relaxed);
                    running += count;
                }
            });
        });
        Ok(())
    }

    fn scatter(
        &self,
        src: &HostBuffer,
        dst: &HostBuffer,
        len: usize,
        shift: u32,
        tiles: &HostBuffer,
    ) -> Result<(), SortError> {
        self.check_len("scatter", src, len)?;
        self.check_len("scatter", dst, len)?;
        self.check_len("scatter", tiles, tile_count(len) * RADIX_BUCKETS)?;

        self.pool.install(|| {
            src.words[..len]
                .par_chunks(TILE_KEYS)
                .zip(tiles.words.par_chunks(RADIX_BUCKETS))
                .try_for_each(|(tile, offsets)| {
                    let mut next = [0u32; RADIX_BUCKETS];
                    for (slot, offset) in next.iter_mut().zip(offsets) {
                        *slot = offset.load(Ordering::Relaxed);
                    }

                    for key in tile {
                        let key = key.load(Ordering::Relaxed);
                        let bucket = digit(key, shift);
                        let slot = next[bucket] as usize;
                        let Some(target) = dst.words.get(slot) else {
                            return Err(SortError::device_failure(
                                self.label.as_str(),
                                "scatter",
                                format!("slot {slot} out of range for bucket {bucket}"),
                            ));
                        };
                        target.store(key, Ordering::Relaxed);
                        next[bucket] += 1;
                    }
                    Ok(())
                })
        })
    }

    fn download(&self, buffer: &HostBuffer, out: &mut [u32]) -> Result<(), SortError> {
        self.check_len("download", buffer, out.len())?;
        self.pool.install(|| {
            out.par_iter_mut()
                .zip(buffer.words.par_iter())
                .for_each(|(value, slot)| *value = slot.load(Ordering::Relaxed));
        });
        Ok(())
    }
}
