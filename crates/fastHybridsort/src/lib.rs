//! # Fast Hybridsort (accelerated sorting with CPU fallback)
//!
//! `fastHybridsort` extends [`hybridsort`] with a GPU radix-sort path, a
//! multi-device orchestrator and a gateway to fixed-batch external sorting
//! accelerators. A dispatcher picks the backend per call and falls back to
//! the size-adaptive CPU engine whenever an accelerator is missing or fails.
//!
//! ## Backend Selection
//!
//! | Input                                                | Backend                       |
//! |------------------------------------------------------|-------------------------------|
//! | `i32`/`u32`, external requested, exactly 1024 keys   | external accelerator          |
//! | `i32`/`u32`                                          | GPU radix sort (all devices)  |
//! | anything else                                        | CPU engine                    |
//!
//! The GPU path sorts 32-bit keys with four 8-bit LSD passes (tile histogram,
//! exclusive scan, tile offsets, tiled scatter). With several devices the input is split into
//! one chunk per device, chunks are sorted concurrently and merged with a
//! k-way heap merge.
//!
//! ## Quick Start
//!
//! ```rust
//! use fastHybridsort::prelude::*;
//!
//! // Works with or without a GPU: hardware failures fall back to the CPU.
//! let mut v = vec![20, -3, 15, 7, 2, -9, 12, 5];
//! let report = smart_sort(&mut v, false)?;
//! assert_eq!(v, [-9, -3, 2, 5, 7, 12, 15, 20]);
//! println!("{}", report);
//! # Result::<(), SortError>::Ok(())
//! ```
//!
//! ### Explicit Devices
//!
//! ```rust
//! use fastHybridsort::prelude::*;
//! use std::sync::Arc;
//!
//! // Two software devices; no GPU needed.
//! let pool = AcceleratorPool::from_handles([
//!     HostAccelerator::new("host0", 2)?,
//!     HostAccelerator::new("host1", 2)?,
//! ]);
//!
//! let sorter = SmartSort::new()
//!     .pool(Arc::new(pool))
//!     .backend(GPU)           // Report device errors instead of falling back
//!     .build()?;
//!
//! let mut keys: Vec<u32> = (0..10_000).rev().collect();
//! let report = sorter.sort(&mut keys)?;
//! assert_eq!(report.executed, SortDecision::Gpu);
//! assert!(keys.windows(2).all(|w| w[0] <= w[1]));
//! # Result::<(), SortError>::Ok(())
//! ```
//!
//! ### ndarray Integration
//!
//! ```rust
//! use fastHybridsort::prelude::*;
//! use ndarray::Array1;
//!
//! let mut a = Array1::from_vec(vec![3i64, 1, 2]);
//! let sorter = SmartSort::new().build()?;
//! sorter.sort(&mut a)?;
//! assert_eq!(a.to_vec(), [1, 2, 3]);
//! # Result::<(), SortError>::Ok(())
//! ```
//!
//! ## Result and Error Handling
//!
//! - **`NoAcceleratorAvailable`**: `adaptive_gpu_sort` found no device.
//! - **`AcceleratorOperationFailed`**: a device failed mid-pipeline.
//! - **`PreconditionViolated`**: wrong external batch size, non-contiguous input.
//!
//! The dispatcher recovers from the first two with the CPU engine unless the
//! `GPU` backend is forced; precondition errors always reach the caller.

#![allow(non_snake_case)]

/// GPU radix device.
#[cfg(feature = "gpu")]
pub mod gpu {
    pub use crate::engine::gpu::{GpuBuffer, UncapturedErrors, WgpuAccelerator, open_adapters};
}

// Layer 5: Engine - devices, pipeline, orchestration and dispatch.
mod engine;

// High-level fluent API.
mod api;

// Input data handling.
mod input;

pub use crate::api::{SmartSorter, adaptive_gpu_sort, adaptive_gpu_sort_u32, smart_sort};
pub use crate::engine::external::{gateway, install_gateway, remove_gateway};
pub use crate::engine::pool::{global, install_global, shutdown_global};
pub use hybridsort::{adaptive_sort, adaptive_sort_by, adaptive_sort_by_key};

// Standard fastHybridsort prelude.
pub mod prelude {
    pub use crate::api::{
        AcceleratorHandle, AcceleratorPool,
        Backend::{Auto, CPU, GPU},
        DiscoveryOptions, EXTERNAL_BATCH_SIZE, ElementKind, ExternalSorter, ForeignBatchSorter,
        ForeignSortFn, HostAccelerator, SignedOrder, SmartSortBuilder as SmartSort, SmartSorter,
        SortDecision, SortElement, SortError, SortInput, SortReport, adaptive_gpu_sort,
        adaptive_gpu_sort_u32, smart_sort,
    };
    pub use hybridsort::prelude::{
        KeyedContainer, adaptive_sort, adaptive_sort_by, adaptive_sort_by_key, sort_keyed,
    };
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
    pub mod input {
        pub use crate::input::*;
    }
}
