//! Tests for the external accelerator gateway.
//!
//! ## Test Organization
//!
//! 1. **Foreign Sorter** - `extern "C"` routine behind `ForeignBatchSorter`
//! 2. **Dispatch** - Batch-size matching, ineligible types, failures
//! 3. **Process-Wide Gateway** - `install_gateway` with `smart_sort`

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fastHybridsort::prelude::*;
use fastHybridsort::{install_gateway, remove_gateway};
use rand::prelude::*;

/// Stand-in for a vendor routine reached through the C ABI.
unsafe extern "C" fn vendor_sort(keys: *mut u32, len: usize) {
    // SAFETY: callers pass a valid, exclusive buffer of `len` words.
    let keys = unsafe { std::slice::from_raw_parts_mut(keys, len) };
    keys.sort_unstable();
}

const VENDOR_SORT: ForeignSortFn = vendor_sort;

fn vendor_gateway() -> Arc<dyn ExternalSorter> {
    // SAFETY: `vendor_sort` only touches the `len` words it is given.
    Arc::new(unsafe { ForeignBatchSorter::new(VENDOR_SORT) })
}

/// Gateway that counts calls.
#[derive(Debug, Default)]
struct CountingGateway {
    calls: AtomicUsize,
}

impl ExternalSorter for CountingGateway {
    fn sort_batch(&self, keys: &mut [u32]) -> Result<(), SortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        keys.sort_unstable();
        Ok(())
    }
}

/// Gateway whose device is offline.
#[derive(Debug)]
struct OfflineGateway;

impl ExternalSorter for OfflineGateway {
    fn sort_batch(&self, _keys: &mut [u32]) -> Result<(), SortError> {
        Err(SortError::device_failure("offline", "sort", "device not responding"))
    }
}

fn empty_pool() -> Arc<AcceleratorPool> {
    Arc::new(AcceleratorPool::empty())
}

// ============================================================================
// Foreign Sorter Tests
// ============================================================================

/// Test the foreign routine on a full batch.
#[test]
fn test_foreign_sorter_full_batch() {
    let gateway = vendor_gateway();
    assert_eq!(gateway.batch_size(), EXTERNAL_BATCH_SIZE);
    assert_eq!(EXTERNAL_BATCH_SIZE, 1024);

    let mut keys: Vec<u32> = (0..1024).rev().collect();
    gateway.sort_batch(&mut keys).unwrap();
    assert_eq!(keys, (0..1024).collect::<Vec<u32>>());
}

/// Test the batch-size precondition.
#[test]
fn test_foreign_sorter_rejects_wrong_size() {
    let gateway = vendor_gateway();
    let mut keys = vec![3u32, 2, 1];
    let err = gateway.sort_batch(&mut keys).unwrap_err();
    assert!(matches!(err, SortError::PreconditionViolated(_)));
    assert!(!err.is_accelerator_failure());
    assert_eq!(keys, [3, 2, 1]);
}

// ============================================================================
// Dispatch Tests
// ============================================================================

/// Test that an exact batch of signed keys goes to the gateway.
#[test]
fn test_exact_batch_uses_gateway() {
    let sorter = SmartSort::new()
        .external_accelerator(true)
        .gateway(vendor_gateway())
        .pool(empty_pool())
        .build()
        .unwrap();

    let mut rng = StdRng::seed_from_u64(1024);
    let mut v: Vec<i32> = (0..1024).map(|_| rng.random_range(-1_000..1_000)).collect();
    let mut expected = v.clone();
    expected.sort();

    let report = sorter.sort(&mut v).unwrap();
    assert_eq!(report.executed, SortDecision::External);
    assert_eq!(v, expected);
}

/// Test that other lengths skip the gateway.
#[test]
fn test_other_lengths_skip_gateway() {
    let counting = Arc::new(CountingGateway::default());
    let sorter = SmartSort::new()
        .external_accelerator(true)
        .gateway(counting.clone())
        .pool(empty_pool())
        .build()
        .unwrap();

    let mut v: Vec<u32> = (0..1000).rev().collect();
    let report = sorter.sort(&mut v).unwrap();
    assert_eq!(report.requested, SortDecision::Gpu);
    assert_eq!(report.executed, SortDecision::Cpu);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);

    let mut batch: Vec<u32> = (0..1024).rev().collect();
    sorter.sort(&mut batch).unwrap();
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    assert!(batch.windows(2).all(|w| w[0] <= w[1]));
}

/// Test that the gateway is only used when requested.
#[test]
fn test_gateway_requires_request() {
    let counting = Arc::new(CountingGateway::default());
    let sorter = SmartSort::new()
        .gateway(counting.clone())
        .pool(empty_pool())
        .build()
        .unwrap();

    let mut v: Vec<u32> = (0..1024).rev().collect();
    sorter.sort(&mut v).unwrap();
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    assert_eq!(sorter.decision::<u32>(1024), SortDecision::Gpu);
}

/// Test that ineligible types never reach the gateway.
#[test]
fn test_ineligible_type_skips_gateway() {
    let sorter = SmartSort::new()
        .external_accelerator(true)
        .gateway(vendor_gateway())
        .build()
        .unwrap();

    assert_eq!(sorter.decision::<i64>(1024), SortDecision::Cpu);
    assert_eq!(sorter.decision::<i32>(1024), SortDecision::External);

    let mut v: Vec<i64> = (0..1024).rev().collect();
    let report = sorter.sort(&mut v).unwrap();
    assert_eq!(report.executed, SortDecision::Cpu);
}

/// Test that a failing gateway falls back to the CPU engine.
#[test]
fn test_offline_gateway_falls_back() {
    let sorter = SmartSort::new()
        .external_accelerator(true)
        .gateway(Arc::new(OfflineGateway))
        .pool(empty_pool())
        .build()
        .unwrap();

    let mut v: Vec<i32> = (0..1024).map(|i| 512 - i).collect();
    let report = sorter.sort(&mut v).unwrap();
    assert_eq!(report.requested, SortDecision::External);
    assert_eq!(report.executed, SortDecision::Cpu);
    assert!(v.windows(2).all(|w| w[0] <= w[1]));
}

/// Test that a zero batch size is rejected by the builder.
#[test]
fn test_zero_batch_size_rejected() {
    // SAFETY: `vendor_sort` only touches the `len` words it is given.
    let gateway = unsafe { ForeignBatchSorter::with_batch_size(vendor_sort, 0) };
    let err = SmartSort::new()
        .gateway(Arc::new(gateway))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        SortError::InvalidParameter {
            parameter: "gateway",
            ..
        }
    ));
}

// ============================================================================
// Process-Wide Gateway Tests
// ============================================================================

/// Test `smart_sort` with an installed gateway.
#[test]
fn test_installed_gateway_with_smart_sort() {
    install_gateway(vendor_gateway());

    let mut v: Vec<u32> = (0..1024).map(|i| (i * 7919) % 1024).collect();
    let report = smart_sort(&mut v, true).unwrap();
    assert_eq!(report.executed, SortDecision::External);
    assert_eq!(v, (0..1024).collect::<Vec<u32>>());

    assert!(remove_gateway().is_some());
    assert!(remove_gateway().is_none());
}
