// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Height-balanced (AVL) backend with one tree node per distinct key.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Bucket, key_order};

/// AVL tree backend.
///
/// Each distinct key owns one arena node holding a bucket of entries. A
/// duplicate key appends to the existing bucket and leaves the tree shape
/// alone; only the first entry and the last removal of a key touch the tree.
/// The heights of the two subtrees of every node differ by at most one, so
/// insert, remove and lookup are `O(log k)` in the number of distinct keys.
pub struct Avl<K, V> {
    root: Option<NodeIdx>,
    arena: Vec<Option<AvlNode<K, V>>>,
    free_list: Vec<usize>,
    len: usize,
}

struct AvlNode<K, V> {
    bucket: Bucket<K, V>,
    left: Option<NodeIdx>,
    right: Option<NodeIdx>,
    height: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

impl<K, V> Default for Avl<K, V> {
    fn default() -> Self {
        Self {
            root: None,
            arena: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }
}

impl<K: Copy + PartialOrd + Debug, V: Copy + Debug> Avl<K, V> {
    /// Height of the tree; `0` when empty, `1` for a single key.
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    fn node(&self, idx: NodeIdx) -> &AvlNode<K, V> {
        self.arena[idx.get()].as_ref().expect("dangling AVL node")
    }

    fn node_mut(&mut self, idx: NodeIdx) -> &mut AvlNode<K, V> {
        self.arena[idx.get()].as_mut().expect("dangling AVL node")
    }

    fn alloc(&mut self, key: K, value: V) -> NodeIdx {
        let node = AvlNode {
            bucket: Bucket::new(key, value),
            left: None,
            right: None,
            height: 1,
        };
        if let Some(i) = self.free_list.pop() {
            self.arena[i] = Some(node);
            NodeIdx::new(i)
        } else {
            self.arena.push(Some(node));
            NodeIdx::new(self.arena.len() - 1)
        }
    }

    fn release(&mut self, idx: NodeIdx) -> AvlNode<K, V> {
        let node = self.arena[idx.get()].take().expect("dangling AVL node");
        self.free_list.push(idx.get());
        node
    }

    #[inline]
    fn height_of(&self, idx: Option<NodeIdx>) -> u32 {
        idx.map_or(0, |i| self.node(i).height)
    }

    /// Right height minus left height.
    fn balance_factor(&self, idx: NodeIdx) -> i64 {
        let n = self.node(idx);
        i64::from(self.height_of(n.right)) - i64::from(self.height_of(n.left))
    }

    fn update_height(&mut self, idx: NodeIdx) {
        let (left, right) = {
            let n = self.node(idx);
            (n.left, n.right)
        };
        let height = 1 + self.height_of(left).max(self.height_of(right));
        self.node_mut(idx).height = height;
    }

    fn rotate_left(&mut self, x: NodeIdx) -> NodeIdx {
        let y = self
            .node(x)
            .right
            .expect("left rotation requires a right child");
        let y_left = self.node(y).left;
        self.node_mut(x).right = y_left;
        self.node_mut(y).left = Some(x);
        self.update_height(x);
        self.update_height(y);
        y
    }

    fn rotate_right(&mut self, y: NodeIdx) -> NodeIdx {
        let x = self
            .node(y)
            .left
            .expect("right rotation requires a left child");
        let x_right = self.node(x).right;
        self.node_mut(y).left = x_right;
        self.node_mut(x).right = Some(y);
        self.update_height(y);
        self.update_height(x);
        x
    }

    /// Refresh the height of `idx` and restore the AVL bound there.
    ///
    /// Returns the root of the (possibly rotated) subtree.
    fn rebalance(&mut self, idx: NodeIdx) -> NodeIdx {
        self.update_height(idx);
        let bal = self.balance_factor(idx);
        if bal > 1 {
            let right = self
                .node(idx)
                .right
                .expect("right-heavy node has a right child");
            if self.balance_factor(right) < 0 {
                let r = self.rotate_right(right);
                self.node_mut(idx).right = Some(r);
            }
            self.rotate_left(idx)
        } else if bal < -1 {
            let left = self
                .node(idx)
                .left
                .expect("left-heavy node has a left child");
            if self.balance_factor(left) > 0 {
                let l = self.rotate_left(left);
                self.node_mut(idx).left = Some(l);
            }
            self.rotate_right(idx)
        } else {
            idx
        }
    }

    fn insert_at(&mut self, node: Option<NodeIdx>, key: K, value: V) -> NodeIdx {
        let Some(idx) = node else {
            return self.alloc(key, value);
        };
        match key_order(&key, &self.node(idx).bucket.key) {
            Ordering::Less => {
                let left = self.node(idx).left;
                let left = self.insert_at(left, key, value);
                self.node_mut(idx).left = Some(left);
            }
            Ordering::Greater => {
                let right = self.node(idx).right;
                let right = self.insert_at(right, key, value);
                self.node_mut(idx).right = Some(right);
            }
            Ordering::Equal => {
                self.node_mut(idx).bucket.push(value);
                return idx;
            }
        }
        self.rebalance(idx)
    }

    fn remove_at(
        &mut self,
        node: Option<NodeIdx>,
        key: K,
        removed: &mut Option<V>,
    ) -> Option<NodeIdx> {
        let idx = node?;
        match key_order(&key, &self.node(idx).bucket.key) {
            Ordering::Less => {
                let left = self.node(idx).left;
                let left = self.remove_at(left, key, removed);
                self.node_mut(idx).left = left;
            }
            Ordering::Greater => {
                let right = self.node(idx).right;
                let right = self.remove_at(right, key, removed);
                self.node_mut(idx).right = right;
            }
            Ordering::Equal => {
                if self.node(idx).bucket.len() > 1 {
                    *removed = self.node_mut(idx).bucket.pop();
                    return Some(idx);
                }
                let (left, right) = {
                    let n = self.node(idx);
                    (n.left, n.right)
                };
                match (left, right) {
                    (Some(_), Some(right)) => {
                        // The in-order successor takes this node's place: its key and
                        // its whole bucket move here, then its old node is freed.
                        let (rest, successor) = self.detach_min(right);
                        let successor = self.release(successor);
                        let n = self.node_mut(idx);
                        n.right = rest;
                        let old = core::mem::replace(&mut n.bucket, successor.bucket);
                        *removed = old.latest();
                    }
                    (child, None) | (None, child) => {
                        *removed = self.release(idx).bucket.latest();
                        return child;
                    }
                }
            }
        }
        Some(self.rebalance(idx))
    }

    /// Unlink the leftmost node below `idx`.
    ///
    /// Returns the new subtree root and the detached node (still allocated).
    fn detach_min(&mut self, idx: NodeIdx) -> (Option<NodeIdx>, NodeIdx) {
        match self.node(idx).left {
            None => (self.node(idx).right, idx),
            Some(left) => {
                let (rest, min) = self.detach_min(left);
                self.node_mut(idx).left = rest;
                (Some(self.rebalance(idx)), min)
            }
        }
    }

    fn leftmost(&self) -> Option<NodeIdx> {
        let mut idx = self.root?;
        while let Some(left) = self.node(idx).left {
            idx = left;
        }
        Some(idx)
    }

    fn find(&self, key: K) -> Option<NodeIdx> {
        let mut cur = self.root;
        while let Some(idx) = cur {
            let n = self.node(idx);
            cur = match key_order(&key, &n.bucket.key) {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => return Some(idx),
            };
        }
        None
    }
}

impl<K: Copy + PartialOrd + Debug, V: Copy + Debug> Backend<K, V> for Avl<K, V> {
    fn insert(&mut self, key: K, value: V) {
        let root = self.insert_at(self.root, key, value);
        self.root = Some(root);
        self.len += 1;
    }

    fn remove(&mut self, key: K) -> Option<V> {
        let mut removed = None;
        self.root = self.remove_at(self.root, key, &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    fn first(&self) -> Option<(K, V)> {
        let bucket = &self.node(self.leftmost()?).bucket;
        Some((bucket.key, bucket.latest()?))
    }

    fn get(&self, key: K) -> Option<V> {
        self.node(self.find(key)?).bucket.latest()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn key_count(&self) -> usize {
        self.arena.len() - self.free_list.len()
    }

    fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
        self.free_list.clear();
        self.len = 0;
    }

    fn buckets<'a>(&'a self) -> Box<dyn Iterator<Item = (K, &'a [V])> + 'a> {
        let mut out = Vec::with_capacity(self.key_count());
        let mut stack = Vec::new();
        let mut cur = self.root;
        loop {
            while let Some(idx) = cur {
                stack.push(idx);
                cur = self.node(idx).left;
            }
            let Some(idx) = stack.pop() else {
                break;
            };
            let n = self.node(idx);
            out.push((n.bucket.key, n.bucket.values()));
            cur = n.right;
        }
        Box::new(out.into_iter())
    }
}

impl<K, V> Debug for Avl<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let keys = self.arena.len() - self.free_list.len();
        f.debug_struct("Avl")
            .field("arena_nodes", &self.arena.len())
            .field("keys", &keys)
            .field("entries", &self.len)
            .field("has_root", &self.root.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// Walk the whole tree checking order, stored heights and the AVL bound.
    /// Returns the subtree height.
    fn check_subtree(
        t: &Avl<i64, u32>,
        idx: Option<NodeIdx>,
        lo: Option<i64>,
        hi: Option<i64>,
    ) -> u32 {
        let Some(idx) = idx else {
            return 0;
        };
        let n = t.node(idx);
        let k = n.bucket.key;
        assert!(lo.is_none_or(|lo| lo < k), "BST order violated at {k}");
        assert!(hi.is_none_or(|hi| k < hi), "BST order violated at {k}");
        assert!(!n.bucket.values().is_empty(), "empty bucket left in tree at {k}");
        let hl = check_subtree(t, n.left, lo, Some(k));
        let hr = check_subtree(t, n.right, Some(k), hi);
        assert!(hl.abs_diff(hr) <= 1, "AVL bound violated at {k}: {hl} vs {hr}");
        assert_eq!(n.height, 1 + hl.max(hr), "stale height at {k}");
        n.height
    }

    fn check(t: &Avl<i64, u32>) {
        let h = check_subtree(t, t.root, None, None);
        assert_eq!(h, t.height());
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut t: Avl<i64, u32> = Avl::default();
        for k in 0..1024 {
            t.insert(k, 0);
            check(&t);
        }
        // A perfectly balanced tree over 1024 keys has height 11; AVL allows ~1.44 log n.
        assert!(t.height() <= 15, "height {} too large", t.height());
        assert_eq!(t.key_count(), 1024);
    }

    #[test]
    fn duplicates_share_one_node() {
        let mut t: Avl<i64, u32> = Avl::default();
        t.insert(5, 1);
        t.insert(5, 2);
        t.insert(5, 3);
        assert_eq!(t.key_count(), 1);
        assert_eq!(t.len(), 3);
        assert_eq!(t.get(5), Some(3));
        assert_eq!(t.remove(5), Some(3));
        assert_eq!(t.remove(5), Some(2));
        assert_eq!(t.key_count(), 1);
        assert_eq!(t.remove(5), Some(1));
        assert_eq!(t.key_count(), 0);
        assert!(t.root.is_none());
    }

    #[test]
    fn two_child_removal_moves_successor_bucket() {
        let mut t: Avl<i64, u32> = Avl::default();
        for (k, v) in [(20, 1), (10, 2), (30, 3), (25, 4), (40, 5)] {
            t.insert(k, v);
        }
        // Successor of 20 is 25; give it a second entry so its whole bucket must move.
        t.insert(25, 6);
        assert_eq!(t.remove(20), Some(1));
        check(&t);
        assert_eq!(t.get(20), None);
        assert_eq!(t.get(25), Some(6));
        assert_eq!(t.remove(25), Some(6));
        assert_eq!(t.remove(25), Some(4));
        let keys: Vec<i64> = t.buckets().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![10, 30, 40]);
        check(&t);
    }

    #[test]
    fn absent_and_empty_removals_are_noops() {
        let mut t: Avl<i64, u32> = Avl::default();
        assert_eq!(t.remove(1), None);
        assert_eq!(t.first(), None);
        t.insert(1, 1);
        t.insert(3, 3);
        assert_eq!(t.remove(2), None);
        assert_eq!(t.len(), 2);
        check(&t);
    }

    #[test]
    fn interleaved_churn_keeps_invariants() {
        let mut t: Avl<i64, u32> = Avl::default();
        let mut x = 0x9E37_79B9_u64;
        let mut live: Vec<i64> = Vec::new();
        for step in 0..2000_u32 {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            #[allow(clippy::cast_possible_wrap, reason = "Small test keys.")]
            let k = (x % 97) as i64;
            if x % 3 == 0 && !live.is_empty() {
                #[allow(clippy::cast_possible_truncation, reason = "Only used as an index seed.")]
                let victim = live.swap_remove((x as usize) % live.len());
                assert!(t.remove(victim).is_some(), "live key {victim} missing");
            } else {
                t.insert(k, step);
                live.push(k);
            }
            check(&t);
            assert_eq!(t.len(), live.len());
        }
        let min = live.iter().copied().min();
        assert_eq!(t.first().map(|(k, _)| k), min);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut t: Avl<i64, u32> = Avl::default();
        for k in 0..8 {
            t.insert(k, 0);
        }
        for k in 0..8 {
            t.remove(k);
        }
        for k in 0..8 {
            t.insert(k, 0);
        }
        assert_eq!(t.arena.len(), 8);
        check(&t);
    }
}
