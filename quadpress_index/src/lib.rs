// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadpress Index: an ordered multimap for greedy "cheapest first" loops.
//!
//! Quadpress Index maps priority keys (typically `f64` costs) to candidates.
//!
//! - Keys may repeat; all candidates sharing a key live in one bucket.
//! - [`PriorityIndex::find_min`] reports the smallest key and the newest candidate in its bucket.
//! - [`PriorityIndex::remove`] takes out the newest candidate under a key; the key disappears
//!   with its last candidate.
//!
//! Within one key, candidates are served last-in, first-out. That tie-break is part of the
//! contract: a greedy algorithm driven by this index makes the same choices whichever backend
//! is plugged in.
//!
//! Backends are pluggable via a small trait. The default backend is an AVL tree, which keeps
//! every operation logarithmic in the number of distinct keys. A sorted-vector backend is
//! available for small sets and as a reference implementation.
//!
//! # Example
//!
//! ```rust
//! use quadpress_index::PriorityIndex;
//!
//! let mut idx: PriorityIndex<f64, &str> = PriorityIndex::new();
//! idx.insert(0.5, "b");
//! idx.insert(0.1, "a");
//! idx.insert(0.1, "c");
//!
//! // Smallest key first; the newest entry of that key wins the tie.
//! assert_eq!(idx.find_min(), Some((0.1, "c")));
//!
//! // Removing by key takes out that same entry.
//! assert_eq!(idx.remove(0.1), Some("c"));
//! assert_eq!(idx.find_min(), Some((0.1, "a")));
//!
//! // Absent keys are ignored.
//! assert_eq!(idx.remove(0.3), None);
//! assert_eq!(idx.len(), 2);
//! ```
//!
//! ## Choosing a backend
//!
//! - `Avl` (default): height-balanced tree. `O(log k)` insert, remove and lookup.
//! - `SortedVec`: binary search over a sorted vector of buckets. Cheap lookups,
//!   `O(k)` inserts and removals of new keys. Good for a handful of keys.
//!
//! ### Float semantics
//!
//! This crate assumes no NaN keys. Debug builds assert.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod index;
mod types;

pub use backend::Backend;
pub use backends::avl::Avl;
pub use backends::sorted_vec::SortedVec;
pub use index::{PriorityIndex, PriorityIndexGeneric};
