//! Tests for the accelerator pool and its process-wide lifecycle.
//!
//! ## Test Organization
//!
//! 1. **Owned Pools** - Construction and description
//! 2. **Process-Wide Pool** - Install, use, shutdown

use fastHybridsort::prelude::*;
use fastHybridsort::{global, install_global, shutdown_global};

// ============================================================================
// Owned Pool Tests
// ============================================================================

/// Test an empty pool.
#[test]
fn test_empty_pool() {
    let pool = AcceleratorPool::empty();
    assert!(pool.is_empty());
    assert_eq!(pool.len(), 0);
    assert!(pool.describe().is_empty());
}

/// Test pool construction from host devices.
#[test]
fn test_pool_from_host_devices() {
    let pool = AcceleratorPool::from_handles([
        HostAccelerator::new("alpha", 1).unwrap(),
        HostAccelerator::new("beta", 2).unwrap().with_memory_limit(1 << 20),
    ]);

    assert_eq!(pool.len(), 2);
    let labels: Vec<&str> = pool.handles().iter().map(|h| h.label()).collect();
    assert_eq!(labels, ["alpha", "beta"]);

    let described = pool.describe();
    assert!(described[0].starts_with("alpha (host, 1 threads"));
    assert!(described[1].contains("1048576"));
}

// ============================================================================
// Process-Wide Pool Tests
// ============================================================================

/// Test the full lifecycle of the process-wide pool.
///
/// Kept in one test: the process-wide pool is shared by every test in this binary.
#[test]
fn test_global_lifecycle() {
    install_global(AcceleratorPool::from_handles([HostAccelerator::new("global0", 2).unwrap()]));
    assert_eq!(global().len(), 1);

    let mut signed = vec![5, -2, 9, i32::MIN, 0];
    adaptive_gpu_sort(&mut signed).unwrap();
    assert_eq!(signed, [i32::MIN, -2, 0, 5, 9]);

    let mut unsigned = vec![7u32, 1, 4];
    adaptive_gpu_sort_u32(&mut unsigned).unwrap();
    assert_eq!(unsigned, [1, 4, 7]);

    // An empty pool: the GPU entry point reports absence, smart_sort recovers.
    let previous = install_global(AcceleratorPool::empty());
    assert_eq!(previous.map(|p| p.len()), Some(1));

    let mut v = vec![3, 1, 2];
    assert_eq!(adaptive_gpu_sort(&mut v), Err(SortError::NoAcceleratorAvailable));
    assert_eq!(v, [3, 1, 2]);

    let report = smart_sort(&mut v, false).unwrap();
    assert_eq!(v, [1, 2, 3]);
    assert!(report.fell_back());

    assert!(shutdown_global());
    assert!(!shutdown_global());
}
