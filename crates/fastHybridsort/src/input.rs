//! Input abstractions for in-place sorting.
//!
//! ## Purpose
//!
//! This module lets `SmartSorter::sort` accept slices, vectors and
//! one-dimensional `ndarray` arrays through a single interface.
//!
//! ## Design notes
//!
//! * **Zero-copy**: Every implementation hands out a mutable view of the
//!   caller's own memory; sorting happens in place.
//! * **Fail-fast validation**: Non-contiguous arrays are rejected before any
//!   backend is chosen.
//!
//! ## Invariants
//!
//! * Returned slices cover every element of the input container.
//! * Inputs must be contiguous in memory; non-contiguous inputs return an error.
//!
//! ## Non-goals
//!
//! * This module does not copy strided data into temporary buffers.

// External dependencies
use ndarray::{ArrayBase, DataMut, Ix1};

// Export dependencies from hybridsort crate
use hybridsort::internals::primitives::errors::SortError;

/// Types that can be sorted in place.
pub trait SortInput<T> {
    /// Mutable contiguous view of every element.
    fn as_sort_slice_mut(&mut self) -> Result<&mut [T], SortError>;
}

impl<T> SortInput<T> for [T] {
    fn as_sort_slice_mut(&mut self) -> Result<&mut [T], SortError> {
        Ok(self)
    }
}

impl<T> SortInput<T> for Vec<T> {
    fn as_sort_slice_mut(&mut self) -> Result<&mut [T], SortError> {
        Ok(self.as_mut_slice())
    }
}

impl<T, S> SortInput<T> for ArrayBase<S, Ix1>
where
    S: DataMut<Elem = T>,
{
    fn as_sort_slice_mut(&mut self) -> Result<&mut [T], SortError> {
        self.as_slice_mut().ok_or_else(|| {
            SortError::PreconditionViolated("ndarray input must be contiguous in memory".to_string())
        })
    }
}
