// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for the ordered multimap.
//!
//! - `avl`: height-balanced binary search tree, one node per distinct key (default).
//! - `sorted_vec`: buckets in a key-sorted vector; binary search, linear-time shifts.
//!
//! Tie-breaking
//! ------------
//! Both backends keep every entry of a key in one bucket, oldest first. Lookups
//! and removals always address the newest entry of a bucket, so two candidates
//! with an identical key come back in last-in, first-out order. Greedy callers
//! such as the quadtree merge loop depend on this: swapping backends never
//! changes which of two equal-cost candidates is taken first.

pub mod avl;
pub mod sorted_vec;
