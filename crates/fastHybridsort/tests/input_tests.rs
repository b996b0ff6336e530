//! Tests for slice, vector and ndarray inputs.
//!
//! ## Test Organization
//!
//! 1. **Standard Containers** - Slices and vectors
//! 2. **ndarray** - Owned arrays, contiguous and strided views

use fastHybridsort::prelude::*;
use ndarray::{Array1, s};

fn cpu_sorter() -> SmartSorter {
    SmartSort::new().backend(CPU).build().unwrap()
}

// ============================================================================
// Standard Container Tests
// ============================================================================

/// Test sorting a sub-slice in place.
#[test]
fn test_slice_input() {
    let mut v = vec![9, 8, 7, 6, 5, 4];
    cpu_sorter().sort(&mut v[1..5]).unwrap();
    assert_eq!(v, [9, 5, 6, 7, 8, 4]);
}

/// Test sorting keyed containers from the extension prelude.
#[test]
fn test_keyed_container_reexport() {
    let mut pairs = vec![("b", 2), ("a", 1), ("c", 3)];
    sort_keyed(&mut pairs);
    assert_eq!(pairs, [("a", 1), ("b", 2), ("c", 3)]);
}

// ============================================================================
// ndarray Tests
// ============================================================================

/// Test an owned one-dimensional array.
#[test]
fn test_ndarray_owned() {
    let mut a = Array1::from_vec(vec![3i64, -2, 7, 0]);
    let report = cpu_sorter().sort(&mut a).unwrap();
    assert_eq!(report.len, 4);
    assert_eq!(a.to_vec(), [-2, 0, 3, 7]);
}

/// Test a contiguous view sorts only its window.
#[test]
fn test_ndarray_contiguous_view() {
    let mut a = Array1::from_vec((0..10).rev().collect::<Vec<i32>>());
    {
        let mut view = a.slice_mut(s![2..6]);
        cpu_sorter().sort(&mut view).unwrap();
    }
    assert_eq!(a.to_vec(), [9, 8, 4, 5, 6, 7, 3, 2, 1, 0]);
}

/// Test that a strided view is rejected and left untouched.
#[test]
fn test_ndarray_strided_view_rejected() {
    let mut a = Array1::from_vec((0..10).rev().collect::<Vec<i32>>());
    let mut view = a.slice_mut(s![..;2]);
    let err = cpu_sorter().sort(&mut view).unwrap_err();
    assert!(matches!(err, SortError::PreconditionViolated(_)));
    assert!(!err.is_accelerator_failure());
    assert_eq!(a.to_vec(), (0..10).rev().collect::<Vec<i32>>());
}
