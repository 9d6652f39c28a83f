// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadpress Tree: lossy image compression with region quadtrees.
//!
//! A square, power-of-two grid of samples (for example a grayscale image) is
//! turned into a quadtree whose leaves are uniform squares. The tree is then
//! shrunk by merging "twigs" (internal nodes whose four children are leaves)
//! into single leaves holding a representative value.
//!
//! - [`QuadTree::build`] constructs the tree bottom-up, collapsing uniform squares on the fly.
//! - [`QuadTree::lambda_compress`] merges every twig of the tree once.
//! - [`QuadTree::rho_compress`] merges the twig with the smallest error first, repeatedly,
//!   until the node count is at most `rho` percent of what it was.
//! - [`QuadTree::render`] expands the tree back into a [`Grid`].
//! - [`QuadTree::serialize`] / [`QuadTree::deserialize`] convert to and from a parenthesized text form.
//! - [`pgm::parse_pgm`] / [`pgm::write_pgm`] read and write plain PGM images.
//!
//! The merge order of the ratio-bounded pass is driven by a [`quadpress_index::PriorityIndex`];
//! see [`metrics`] for the representative value and error of a twig.
//!
//! # Example
//!
//! ```rust
//! use quadpress_tree::{Compression, QuadTree, Rho};
//!
//! let mut tree = QuadTree::from_rows(
//!     &[
//!         [10, 10, 200, 201],
//!         [10, 10, 199, 200],
//!         [50, 50, 0, 0],
//!         [50, 50, 0, 0],
//!     ],
//!     255,
//! )
//! .unwrap();
//!
//! // Three uniform quadrants are already single leaves.
//! assert_eq!(tree.node_count(), 9);
//! assert_eq!(tree.serialize(), "(10  (200  201  200  199 ) 0  50 )");
//!
//! let stats = tree.compress(Compression::Rho(Rho::new(60).unwrap()));
//! assert_eq!(stats.merges, 1);
//! assert_eq!(tree.node_count(), 5);
//! assert_eq!(tree.render().get(0, 3), Some(200));
//! ```
//!
//! ## Features
//!
//! - `std` (default): use std float math.
//! - `libm`: float math through the `libm` crate for `no_std` builds.
//! - `tracing`: spans around build and compression, with summary events.
//!
//! One of `std` or `libm` must be enabled.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("quadpress_tree requires either the `std` or `libm` feature");

extern crate alloc;

mod compress;
mod error;
mod grid;
pub mod metrics;
pub mod pgm;
pub mod text;
mod tree;
mod types;

pub use compress::{Compression, CompressionStats, Rho};
pub use error::{Error, ErrorKind};
pub use grid::Grid;
pub use tree::QuadTree;
pub use types::{NodeId, NodeKind, Quadrant, Violations};
