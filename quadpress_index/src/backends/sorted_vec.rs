// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sorted vector backend. Binary-search lookups, linear-time inserts and removals.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Bucket, key_order};

/// Buckets kept in a vector sorted by key.
///
/// Simple and compact; fine for small candidate sets and useful as a reference
/// when checking the tree backends.
pub struct SortedVec<K, V> {
    buckets: Vec<Bucket<K, V>>,
    len: usize,
}

impl<K, V> Default for SortedVec<K, V> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
            len: 0,
        }
    }
}

impl<K, V> Debug for SortedVec<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SortedVec")
            .field("keys", &self.buckets.len())
            .field("entries", &self.len)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + PartialOrd + Debug, V: Copy + Debug> SortedVec<K, V> {
    /// Position of the first bucket whose key is not less than `key`.
    fn lower_bound(&self, key: K) -> usize {
        self.buckets
            .partition_point(|b| key_order(&b.key, &key) == Ordering::Less)
    }

    fn position(&self, key: K) -> Option<usize> {
        let i = self.lower_bound(key);
        let b = self.buckets.get(i)?;
        (key_order(&b.key, &key) == Ordering::Equal).then_some(i)
    }
}

impl<K: Copy + PartialOrd + Debug, V: Copy + Debug> Backend<K, V> for SortedVec<K, V> {
    fn insert(&mut self, key: K, value: V) {
        let i = self.lower_bound(key);
        match self.buckets.get_mut(i) {
            Some(b) if key_order(&b.key, &key) == Ordering::Equal => b.push(value),
            _ => self.buckets.insert(i, Bucket::new(key, value)),
        }
        self.len += 1;
    }

    fn remove(&mut self, key: K) -> Option<V> {
        let i = self.position(key)?;
        let removed = self.buckets[i].pop();
        if self.buckets[i].len() == 0 {
            self.buckets.remove(i);
        }
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    fn first(&self) -> Option<(K, V)> {
        let b = self.buckets.first()?;
        Some((b.key, b.latest()?))
    }

    fn get(&self, key: K) -> Option<V> {
        self.buckets[self.position(key)?].latest()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn key_count(&self) -> usize {
        self.buckets.len()
    }

    fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    fn buckets<'a>(&'a self) -> Box<dyn Iterator<Item = (K, &'a [V])> + 'a> {
        Box::new(self.buckets.iter().map(|b| (b.key, b.values())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_keys_sorted_and_merges_duplicates() {
        let mut s: SortedVec<f64, u8> = SortedVec::default();
        for (k, v) in [(0.5, 1), (0.1, 2), (0.9, 3), (0.5, 4)] {
            s.insert(k, v);
        }
        let keys: Vec<f64> = s.buckets().map(|(k, _)| k).collect();
        assert_eq!(keys, [0.1, 0.5, 0.9]);
        assert_eq!(s.get(0.5), Some(4));
        assert_eq!(s.len(), 4);
        assert_eq!(s.remove(0.5), Some(4));
        assert_eq!(s.remove(0.5), Some(1));
        assert_eq!(s.remove(0.5), None);
        assert_eq!(s.key_count(), 2);
        assert_eq!(s.first(), Some((0.1, 2)));
    }
}
