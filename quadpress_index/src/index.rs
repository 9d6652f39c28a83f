// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `PriorityIndex` API and generic implementation over a pluggable backend.

use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::avl::Avl;
use crate::backends::sorted_vec::SortedVec;

/// An ordered multimap from priority keys to candidates, parameterized by a backend.
///
/// Smaller keys come first. Entries sharing a key are served newest first.
#[derive(Debug)]
pub struct PriorityIndexGeneric<K: Copy + PartialOrd + Debug, V: Copy + Debug, B: Backend<K, V>> {
    backend: B,
    _marker: core::marker::PhantomData<(K, V)>,
}

impl<K, V, B> PriorityIndexGeneric<K, V, B>
where
    K: Copy + PartialOrd + Debug,
    V: Copy + Debug,
    B: Backend<K, V> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self::with_backend(B::default())
    }
}

impl<K, V, B> PriorityIndexGeneric<K, V, B>
where
    K: Copy + PartialOrd + Debug,
    V: Copy + Debug,
    B: Backend<K, V>,
{
    /// Wrap an existing backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            _marker: core::marker::PhantomData,
        }
    }

    /// Insert `value` under `key`.
    ///
    /// A key already present gains one more entry; the new entry becomes the
    /// one reported by [`get`](Self::get) and [`find_min`](Self::find_min).
    pub fn insert(&mut self, key: K, value: V) {
        self.backend.insert(key, value);
    }

    /// Remove the most recently inserted entry under `key` and return it.
    ///
    /// Removing an absent key, or removing from an empty index, does nothing.
    pub fn remove(&mut self, key: K) -> Option<V> {
        self.backend.remove(key)
    }

    /// The smallest key and the most recent entry under it.
    pub fn find_min(&self) -> Option<(K, V)> {
        self.backend.first()
    }

    /// Remove and return the entry [`find_min`](Self::find_min) reports.
    pub fn pop_min(&mut self) -> Option<(K, V)> {
        let (key, _) = self.backend.first()?;
        let value = self.backend.remove(key)?;
        Some((key, value))
    }

    /// The most recent entry under `key`.
    pub fn get(&self, key: K) -> Option<V> {
        self.backend.get(key)
    }

    /// Whether at least one entry is stored under `key`.
    pub fn contains_key(&self, key: K) -> bool {
        self.backend.get(key).is_some()
    }

    /// Number of entries, counting every duplicate.
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    /// True if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.backend.key_count()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.backend.clear();
    }

    /// Distinct keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.backend.buckets().map(|(k, _)| k)
    }

    /// Every entry in ascending key order; entries of one key oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (K, V)> + '_ {
        self.backend
            .buckets()
            .flat_map(|(k, values)| values.iter().map(move |v| (k, *v)))
    }

    /// Access the backend, for example to inspect tree height.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Default index using the AVL backend.
pub type PriorityIndex<K, V> = PriorityIndexGeneric<K, V, Avl<K, V>>;

impl<K: Copy + PartialOrd + Debug, V: Copy + Debug> Default for PriorityIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + PartialOrd + Debug, V: Copy + Debug> PriorityIndex<K, V> {
    /// Create an index backed by a sorted vector instead of the AVL tree.
    pub fn with_sorted_vec() -> PriorityIndexGeneric<K, V, SortedVec<K, V>> {
        PriorityIndexGeneric::with_backend(SortedVec::default())
    }

    /// Height of the underlying AVL tree.
    pub fn height(&self) -> u32 {
        self.backend.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn pop_min_drains_in_key_order() {
        let mut idx: PriorityIndex<f64, u32> = PriorityIndex::new();
        for (k, v) in [(0.2, 1), (0.5, 2), (0.1, 3), (0.8, 4), (0.3, 5), (0.7, 6), (0.1, 6)] {
            idx.insert(k, v);
        }
        let mut drained = Vec::new();
        while let Some(e) = idx.pop_min() {
            drained.push(e);
        }
        assert_eq!(
            drained,
            [(0.1, 6), (0.1, 3), (0.2, 1), (0.3, 5), (0.5, 2), (0.7, 6), (0.8, 4)]
        );
        assert!(idx.is_empty());
        assert_eq!(idx.height(), 0);
    }

    #[test]
    fn iter_lists_buckets_oldest_first() {
        let mut idx = PriorityIndex::<i64, char>::with_sorted_vec();
        idx.insert(2, 'a');
        idx.insert(1, 'b');
        idx.insert(2, 'c');
        let all: Vec<_> = idx.iter().collect();
        assert_eq!(all, [(1, 'b'), (2, 'a'), (2, 'c')]);
        assert_eq!(idx.key_count(), 2);
        assert_eq!(idx.len(), 3);
    }

    #[test]
    fn contains_key_and_clear() {
        let mut idx: PriorityIndex<i64, u8> = PriorityIndex::default();
        idx.insert(4, 0);
        assert!(idx.contains_key(4));
        assert!(!idx.contains_key(5));
        idx.clear();
        assert!(!idx.contains_key(4));
        assert_eq!(idx.find_min(), None);
    }
}
