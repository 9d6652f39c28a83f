// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key ordering helpers and the per-key bucket shared by the backends.

use alloc::vec::Vec;
use core::cmp::Ordering;

/// All entries that share one key, oldest first.
///
/// The "current" entry of a bucket is always the most recently inserted one:
/// it is what lookups report and what removal takes out.
#[derive(Clone, Debug)]
pub(crate) struct Bucket<K, V> {
    pub(crate) key: K,
    values: Vec<V>,
}

impl<K, V: Copy> Bucket<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        let mut values = Vec::with_capacity(1);
        values.push(value);
        Self { key, values }
    }

    pub(crate) fn push(&mut self, value: V) {
        self.values.push(value);
    }

    /// Remove and return the most recent entry.
    pub(crate) fn pop(&mut self) -> Option<V> {
        self.values.pop()
    }

    /// The most recent entry.
    pub(crate) fn latest(&self) -> Option<V> {
        self.values.last().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn values(&self) -> &[V] {
        &self.values
    }
}

/// Compare two keys. Assumes no NaN; debug builds assert.
#[inline]
pub(crate) fn key_order<K: PartialOrd>(a: &K, b: &K) -> Ordering {
    let ord = a.partial_cmp(b);
    debug_assert!(ord.is_some(), "priority keys must be totally ordered (no NaN)");
    ord.unwrap_or(Ordering::Equal)
}
