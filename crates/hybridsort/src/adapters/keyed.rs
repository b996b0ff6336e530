//! Keyed-container adapter.
//!
//! ## Purpose
//!
//! Sorts map-like and set-like containers by key: keys are extracted, sorted
//! with the adaptive engine, and the container is rebuilt by reinserting its
//! entries in ascending key order.
//!
//! ## Design notes
//!
//! * **Index permutation**: Keys are sorted together with their original
//!   position, so values are moved, never cloned.
//! * **Ordered containers**: `Vec` and `VecDeque` of pairs keep the rebuilt order.
//! * **Hash containers**: `HashMap` and `HashSet` are rebuilt the same way, but their
//!   iteration order is decided by the hasher. The rebuild is best effort only.
//! * **B-tree containers**: Already iterate in key order; sorting them is a no-op.
//!
//! ## Invariants
//!
//! * The rebuilt container holds exactly the entries it held before.
//! * Duplicate keys (pair sequences only) keep their relative order.
//!
//! ## Non-goals
//!
//! * This module does not guarantee any iteration order for hash containers.

// External dependencies
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::mem;

// Internal dependencies
use crate::engine::executor::adaptive_sort;

// ============================================================================
// Trait
// ============================================================================

/// A container whose entries can be reordered by key.
pub trait KeyedContainer {
    /// Key type entries are ordered by.
    type Key: Ord + Clone;

    /// Rebuild the container with entries in ascending key order.
    fn sort_by_keys(&mut self);
}

/// Rebuild `container` in ascending key order.
#[inline]
pub fn sort_keyed<C: KeyedContainer + ?Sized>(container: &mut C) {
    container.sort_by_keys();
}

// ============================================================================
// Rebuild Helper
// ============================================================================

/// Order `entries` by key through the adaptive engine.
fn rebuild_in_key_order<K, E>(entries: Vec<E>, key: impl Fn(&E) -> &K) -> Vec<E>
where
    K: Ord + Clone,
{
    let mut order: Vec<(K, usize)> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (key(e).clone(), i))
        .collect();
    adaptive_sort(&mut order);

    let mut slots: Vec<Option<E>> = entries.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|(_, i)| slots[i].take())
        .collect()
}

// ============================================================================
// Implementations
// ============================================================================

impl<K: Ord + Clone, V> KeyedContainer for Vec<(K, V)> {
    type Key = K;

    fn sort_by_keys(&mut self) {
        let entries = mem::take(self);
        *self = rebuild_in_key_order(entries, |(k, _)| k);
    }
}

impl<K: Ord + Clone, V> KeyedContainer for VecDeque<(K, V)> {
    type Key = K;

    fn sort_by_keys(&mut self) {
        let entries: Vec<(K, V)> = self.drain(..).collect();
        self.extend(rebuild_in_key_order(entries, |(k, _)| k));
    }
}

impl<K, V, S> KeyedContainer for HashMap<K, V, S>
where
    K: Ord + Clone + Hash + Eq,
    S: BuildHasher,
{
    type Key = K;

    fn sort_by_keys(&mut self) {
        let entries: Vec<(K, V)> = self.drain().collect();
        self.extend(rebuild_in_key_order(entries, |(k, _)| k));
    }
}

impl<K, S> KeyedContainer for HashSet<K, S>
where
    K: Ord + Clone + Hash + Eq,
    S: BuildHasher,
{
    type Key = K;

    fn sort_by_keys(&mut self) {
        let entries: Vec<K> = self.drain().collect();
        self.extend(rebuild_in_key_order(entries, |k| k));
    }
}

impl<K: Ord + Clone, V> KeyedContainer for BTreeMap<K, V> {
    type Key = K;

    // Iteration is already ascending by key
    fn sort_by_keys(&mut self) {}
}

impl<K: Ord + Clone> KeyedContainer for BTreeSet<K> {
    type Key = K;

    fn sort_by_keys(&mut self) {}
}
