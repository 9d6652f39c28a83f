// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for ordered multimap implementations.

use alloc::boxed::Box;
use core::fmt::Debug;

/// Ordered multimap abstraction used by `PriorityIndexGeneric`.
///
/// Keys may repeat. All entries under one key form a bucket in insertion
/// order, and every operation that picks a single entry out of a bucket picks
/// the most recently inserted one.
pub trait Backend<K: Copy + PartialOrd + Debug, V: Copy + Debug> {
    /// Insert an entry, appending to the key's bucket if the key is present.
    fn insert(&mut self, key: K, value: V);

    /// Remove the most recent entry under `key`. Absent keys are a no-op.
    fn remove(&mut self, key: K) -> Option<V>;

    /// Smallest key and the most recent entry under it.
    fn first(&self) -> Option<(K, V)>;

    /// Most recent entry under `key`.
    fn get(&self, key: K) -> Option<V>;

    /// Number of entries, counting duplicates.
    fn len(&self) -> usize;

    /// True if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct keys.
    fn key_count(&self) -> usize;

    /// Drop every entry.
    fn clear(&mut self);

    /// Buckets in ascending key order, each oldest entry first.
    fn buckets<'a>(&'a self) -> Box<dyn Iterator<Item = (K, &'a [V])> + 'a>;
}
