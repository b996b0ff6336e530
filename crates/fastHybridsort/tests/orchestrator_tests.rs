#![cfg(feature = "dev")]
//! Tests for multi-device partitioning.
//!
//! ## Test Organization
//!
//! 1. **Partitioning** - Chunk sizes and remainder placement
//! 2. **Orchestration** - Empty pools and merged results

use fastHybridsort::internals::engine::orchestrator::{partition, sort_across_devices};
use fastHybridsort::prelude::*;

// ============================================================================
// Partitioning Tests
// ============================================================================

/// Test that the remainder goes to the last chunk.
#[test]
fn test_partition_remainder_in_last_chunk() {
    let keys: Vec<u32> = (0..10).collect();
    let chunks = partition(&keys, 3);

    let lens: Vec<usize> = chunks.iter().map(|c| c.keys.len()).collect();
    assert_eq!(lens, [3, 3, 4]);
    assert_eq!(chunks.iter().map(|c| c.id).collect::<Vec<_>>(), [0, 1, 2]);

    let joined: Vec<u32> = chunks.iter().flat_map(|c| c.keys.iter().copied()).collect();
    assert_eq!(joined, keys);
}

/// Test fewer keys than chunks.
#[test]
fn test_partition_short_input() {
    let chunks = partition(&[5, 6], 4);
    let lens: Vec<usize> = chunks.iter().map(|c| c.keys.len()).collect();
    assert_eq!(lens, [0, 0, 0, 2]);
}

// ============================================================================
// Orchestration Tests
// ============================================================================

/// Test hardware absence on an empty pool.
#[test]
fn test_empty_pool_error() {
    let mut keys = vec![2u32, 1];
    assert_eq!(
        sort_across_devices(&AcceleratorPool::empty(), &mut keys),
        Err(SortError::NoAcceleratorAvailable)
    );
    assert_eq!(keys, [2, 1]);
}

/// Test that chunk results are merged in order.
#[test]
fn test_merge_across_three_devices() {
    let pool = AcceleratorPool::from_handles(
        (0..3).map(|i| HostAccelerator::new(format!("dev{i}"), 1).unwrap()),
    );
    let mut keys: Vec<u32> = vec![9, 1, 8, 2, 7, 3, 6, 4, 5, 0, 9];
    sort_across_devices(&pool, &mut keys).unwrap();
    assert_eq!(keys, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 9]);
}
