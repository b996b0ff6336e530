//! Tests for the size-adaptive CPU sort engine.
//!
//! These tests verify the public sorting entry points:
//! - Every tier produces a sorted permutation of its input
//! - Tier boundaries (31/32/33 and 100000/100001)
//! - Idempotence and stability
//!
//! ## Test Organization
//!
//! 1. **Tier Boundaries** - Sizes around each threshold
//! 2. **Idempotence** - Sorting twice changes nothing
//! 3. **Stability** - Equal keys keep their input order
//! 4. **Comparators** - `sort_by`, `sort_by_key`, `Copy` path

use hybridsort::prelude::*;
use rand::prelude::*;

fn random_vec(len: usize, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(-5_000..5_000)).collect()
}

fn assert_sorted_permutation(original: &[i64], sorted: &[i64]) {
    let mut expected = original.to_vec();
    expected.sort();
    assert_eq!(sorted, expected.as_slice());
}

// ============================================================================
// Tier Boundary Tests
// ============================================================================

/// Test sizes on both sides of every threshold.
///
/// Verifies the output is a non-decreasing permutation of the input.
#[test]
fn test_sort_boundary_sizes() {
    for (i, &len) in [0usize, 1, 2, 31, 32, 33, 64, 65, 1000, 100_000, 100_001]
        .iter()
        .enumerate()
    {
        let original = random_vec(len, i as u64);
        let mut v = original.clone();
        adaptive_sort(&mut v);
        assert_sorted_permutation(&original, &v);
    }
}

/// Test reverse-ordered and already sorted inputs in the hybrid tier.
#[test]
fn test_sort_presorted_inputs() {
    let mut ascending: Vec<i64> = (0..5_000).collect();
    let expected = ascending.clone();
    adaptive_sort(&mut ascending);
    assert_eq!(ascending, expected);

    let mut descending: Vec<i64> = (0..5_000).rev().collect();
    adaptive_sort(&mut descending);
    assert_eq!(descending, expected);
}

/// Test inputs with many duplicates.
#[test]
fn test_sort_many_duplicates() {
    let original: Vec<i64> = (0..3_000).map(|i| (i * 7919) % 5).collect();
    let mut v = original.clone();
    adaptive_sort(&mut v);
    assert_sorted_permutation(&original, &v);
}

/// Test non-numeric elements.
#[test]
fn test_sort_strings() {
    let mut words: Vec<String> = (0..200).map(|i| format!("w{:03}", (i * 37) % 200)).collect();
    adaptive_sort(&mut words);
    assert!(words.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(words.first().map(String::as_str), Some("w000"));
    assert_eq!(words.last().map(String::as_str), Some("w199"));
}

// ============================================================================
// Idempotence Tests
// ============================================================================

/// Test that sorting an already sorted output is a no-op.
#[test]
fn test_sort_idempotent() {
    for (i, &len) in [5usize, 40, 4_096, 100_001].iter().enumerate() {
        let mut once = random_vec(len, 100 + i as u64);
        adaptive_sort(&mut once);
        let mut twice = once.clone();
        adaptive_sort(&mut twice);
        assert_eq!(once, twice, "length {len}");
    }
}

// ============================================================================
// Stability Tests
// ============================================================================

/// Test that equal keys keep input order in every tier.
///
/// Elements are tagged with their input position; only the key is compared.
#[test]
fn test_sort_stability_all_tiers() {
    for &len in &[20usize, 33, 777, 100_001] {
        let mut rng = StdRng::seed_from_u64(len as u64);
        let mut v: Vec<(u8, usize)> = (0..len).map(|i| (rng.random_range(0..8), i)).collect();

        adaptive_sort_by(&mut v, |a, b| a.0.cmp(&b.0));

        for w in v.windows(2) {
            assert!(w[0].0 <= w[1].0, "keys out of order at length {len}");
            if w[0].0 == w[1].0 {
                assert!(w[0].1 < w[1].1, "equal keys reordered at length {len}");
            }
        }
    }
}

/// Test left-before-right on ties across a single merge.
///
/// Two runs of 32 with identical keys: the left run must come out first.
#[test]
fn test_merge_prefers_left_run_on_ties() {
    let mut v: Vec<(u8, &str)> = Vec::new();
    v.extend(std::iter::repeat_n((1, "left"), 32));
    v.extend(std::iter::repeat_n((0, "right"), 16));
    v.extend(std::iter::repeat_n((1, "right"), 16));

    adaptive_sort_by(&mut v, |a, b| a.0.cmp(&b.0));

    assert!(v[..16].iter().all(|e| *e == (0, "right")));
    assert!(v[16..48].iter().all(|e| *e == (1, "left")));
    assert!(v[48..].iter().all(|e| *e == (1, "right")));
}

// ============================================================================
// Comparator Tests
// ============================================================================

/// Test descending order via comparator.
#[test]
fn test_sort_by_descending() {
    let original = random_vec(500, 7);
    let mut v = original.clone();
    adaptive_sort_by(&mut v, |a, b| b.cmp(a));
    let mut expected = original;
    expected.sort_by(|a, b| b.cmp(a));
    assert_eq!(v, expected);
}

/// Test key extraction.
#[test]
fn test_sort_by_key_abs() {
    let mut v = vec![-3i64, 2, -1, 0, 5, -4];
    adaptive_sort_by_key(&mut v, |x| x.abs());
    assert_eq!(v, [0, -1, 2, -3, -4, 5]);
}

/// Test the `Copy` entry point on inline and heap scratch sizes.
#[test]
fn test_sort_copy_matches_clone_path() {
    for &len in &[10usize, 300, 512, 513, 20_000] {
        let original = random_vec(len, 900 + len as u64);
        let mut a = original.clone();
        let mut b = original.clone();
        adaptive_sort(&mut a);
        adaptive_sort_copy(&mut b);
        assert_eq!(a, b, "length {len}");
    }
}

/// Test that an inconsistent comparator does not panic.
#[test]
fn test_inconsistent_comparator_does_not_panic() {
    let mut v = random_vec(2_000, 11);
    let mut flip = false;
    adaptive_sort_by(&mut v, |a, b| {
        flip = !flip;
        if flip { a.cmp(b) } else { b.cmp(a) }
    });
    assert_eq!(v.len(), 2_000);
}
