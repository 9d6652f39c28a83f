// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lossy compression passes: merge every twig once, or merge the cheapest twigs
//! until the tree shrinks to a target fraction of its size.

use alloc::vec::Vec;

use quadpress_index::PriorityIndex;

use crate::error::Error;
use crate::metrics;
use crate::tree::QuadTree;
use crate::types::NodeId;

/// Target size for a ratio-bounded pass: a percentage of the initial node count, in `1..=100`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rho(u8);

impl Rho {
    /// Keep the whole tree; the pass merges nothing.
    pub const FULL: Self = Self(100);

    /// Validate a percentage.
    pub fn new(percent: u32) -> Result<Self, Error> {
        match u8::try_from(percent) {
            Ok(p @ 1..=100) => Ok(Self(p)),
            _ => Err(Error::RhoOutOfRange(percent)),
        }
    }

    /// The percentage.
    pub const fn get(self) -> u32 {
        self.0 as u32
    }
}

impl TryFrom<u32> for Rho {
    type Error = Error;

    fn try_from(percent: u32) -> Result<Self, Error> {
        Self::new(percent)
    }
}

/// Which compression pass [`QuadTree::compress`] runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Compression {
    /// Merge every twig of the tree once, regardless of cost.
    #[default]
    Lambda,
    /// Merge cheapest twigs first until the node count is at most this share of the initial count.
    Rho(Rho),
}

/// What a compression pass did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CompressionStats {
    /// Live nodes before the pass.
    pub initial_nodes: usize,
    /// Live nodes after the pass.
    pub final_nodes: usize,
    /// Twigs merged because they were selected.
    pub merges: usize,
    /// Ancestors merged because a merge left all their children equal leaves.
    pub cascades: usize,
    /// Largest epsilon among the selected twigs; zero when nothing was merged.
    pub max_epsilon: f64,
}

impl CompressionStats {
    fn start(initial_nodes: usize) -> Self {
        Self {
            initial_nodes,
            final_nodes: initial_nodes,
            ..Self::default()
        }
    }

    /// `final_nodes / initial_nodes`; `1.0` for an empty tree.
    pub fn ratio(&self) -> f64 {
        if self.initial_nodes == 0 {
            return 1.0;
        }
        self.final_nodes as f64 / self.initial_nodes as f64
    }
}

/// Whether `current` nodes is still more than `rho` percent of `initial`.
fn above_target(current: usize, initial: usize, rho: Rho) -> bool {
    current as u128 * 100 > u128::from(rho.get()) * initial as u128
}

impl QuadTree {
    /// Run the pass selected by `mode`.
    pub fn compress(&mut self, mode: Compression) -> CompressionStats {
        match mode {
            Compression::Lambda => self.lambda_compress(),
            Compression::Rho(rho) => self.rho_compress_to(rho),
        }
    }

    /// Merge every twig of the current tree into a leaf holding its rounded representative value.
    ///
    /// A single pass: internal nodes that become twigs because of these merges are left alone.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "quadtree::lambda_compress")
    )]
    pub fn lambda_compress(&mut self) -> CompressionStats {
        let mut stats = CompressionStats::start(self.node_count());
        let twigs: Vec<NodeId> = self.preorder().filter(|&id| self.is_twig_root(id)).collect();
        for twig in twigs {
            if let Some(epsilon) = self.merge_twig(twig) {
                stats.merges += 1;
                stats.max_epsilon = stats.max_epsilon.max(epsilon);
            }
        }
        stats.final_nodes = self.node_count();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            initial = stats.initial_nodes,
            remaining = stats.final_nodes,
            merges = stats.merges,
            "lambda compression done"
        );
        debug_assert!(
            self.check_invariants().is_empty(),
            "lambda compression broke the tree"
        );
        stats
    }

    /// Greedily merge the twig with the smallest epsilon until the node count is at most
    /// `rho` percent of the count at entry.
    ///
    /// After every merge, ancestors whose four children are now equal leaves collapse too.
    /// Fails if `rho` is outside `1..=100`; `100` merges nothing.
    pub fn rho_compress(&mut self, rho: u32) -> Result<CompressionStats, Error> {
        Ok(self.rho_compress_to(Rho::new(rho)?))
    }

    /// [`rho_compress`](Self::rho_compress) with an already validated ratio.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "quadtree::rho_compress", fields(rho = rho.get()))
    )]
    pub fn rho_compress_to(&mut self, rho: Rho) -> CompressionStats {
        let initial = self.node_count();
        let mut stats = CompressionStats::start(initial);

        // Pre-order insertion matters: equal epsilons are served newest first.
        let mut queue: PriorityIndex<f64, NodeId> = PriorityIndex::new();
        for id in self.preorder() {
            if let Some(values) = self.twig_values(id) {
                queue.insert(metrics::epsilon(values), id);
            }
        }

        while above_target(self.node_count(), initial, rho) {
            let Some((epsilon, twig)) = queue.pop_min() else {
                break;
            };
            debug_assert!(self.is_twig_root(twig), "queued node is no longer a twig");
            if self.merge_twig(twig).is_none() {
                continue;
            }
            stats.merges += 1;
            stats.max_epsilon = stats.max_epsilon.max(epsilon);
            #[cfg(feature = "tracing")]
            tracing::trace!(epsilon, nodes = self.node_count(), "merged twig");

            let mut parent = self.parent(twig);
            while let Some(p) = parent {
                let Some(value) = self.uniform_value(p) else {
                    break;
                };
                self.destroy_children(p, value);
                stats.cascades += 1;
                parent = self.parent(p);
            }
            if let Some(p) = parent
                && let Some(values) = self.twig_values(p)
            {
                queue.insert(metrics::epsilon(values), p);
            }
        }

        stats.final_nodes = self.node_count();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            initial = stats.initial_nodes,
            remaining = stats.final_nodes,
            merges = stats.merges,
            cascades = stats.cascades,
            pending = queue.len(),
            "rho compression done"
        );
        debug_assert!(
            self.check_invariants().is_empty(),
            "rho compression broke the tree"
        );
        stats
    }

    /// Collapse a twig into one leaf. Returns the twig's epsilon, or `None` if `id` is not a twig.
    fn merge_twig(&mut self, id: NodeId) -> Option<f64> {
        let values = self.twig_values(id)?;
        self.destroy_children(id, metrics::merged_value(values));
        Some(metrics::epsilon(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn gradient(side: usize) -> QuadTree {
        let rows: Vec<Vec<u32>> = (0..side)
            .map(|r| {
                (0..side)
                    .map(|c| u32::try_from((r * 7 + c * 13) % 256).unwrap())
                    .collect()
            })
            .collect();
        QuadTree::from_rows(&rows, 255).unwrap()
    }

    #[test]
    fn rho_validation() {
        assert_eq!(Rho::new(0), Err(Error::RhoOutOfRange(0)));
        assert_eq!(Rho::new(101), Err(Error::RhoOutOfRange(101)));
        assert_eq!(Rho::new(300), Err(Error::RhoOutOfRange(300)));
        assert_eq!(Rho::try_from(100), Ok(Rho::FULL));
        assert_eq!(Rho::new(1).unwrap().get(), 1);

        let mut t = gradient(4);
        let before = t.node_count();
        let e = t.rho_compress(0).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        assert_eq!(t.node_count(), before, "failed call must not touch the tree");
    }

    #[test]
    fn target_check_uses_exact_integers() {
        assert!(!above_target(50, 100, Rho::new(50).unwrap()));
        assert!(above_target(51, 100, Rho::new(50).unwrap()));
        // 21 * 100 = 2100 > 33 * 63 = 2079
        assert!(above_target(21, 63, Rho::new(33).unwrap()));
        assert!(!above_target(20, 63, Rho::new(33).unwrap()));
    }

    #[test]
    fn lambda_merges_only_existing_twigs() {
        // Every 2x2 block is a twig; after merging them the root becomes a twig
        // but is left alone.
        let mut t = QuadTree::from_rows(
            &[[1, 2, 5, 6], [3, 4, 7, 8], [9, 10, 13, 14], [11, 12, 15, 16]],
            255,
        )
        .unwrap();
        assert_eq!(t.node_count(), 21);
        let stats = t.lambda_compress();
        assert_eq!(stats.merges, 4);
        assert_eq!(stats.cascades, 0);
        assert_eq!(t.node_count(), 5);
        assert!(t.is_twig_root(t.root()), "root should now be a twig");
        assert_eq!(t.twig_values(t.root()), Some([2, 7, 15, 11]));
    }

    #[test]
    fn rho_full_is_a_no_op() {
        let mut t = gradient(8);
        let before = t.render();
        let stats = t.compress(Compression::Rho(Rho::FULL));
        assert_eq!(stats.merges, 0);
        assert_eq!(stats.final_nodes, stats.initial_nodes);
        assert_eq!(stats.ratio(), 1.0);
        assert_eq!(t.render(), before);
    }

    #[test]
    fn rho_reaches_target() {
        for rho in [1, 10, 25, 50, 75, 99] {
            let mut t = gradient(16);
            let initial = t.node_count();
            let stats = t.rho_compress(rho).unwrap();
            assert!(
                t.node_count() * 100 <= rho as usize * initial || t.node_count() == 1,
                "rho {rho}: {} of {initial} nodes left",
                t.node_count()
            );
            assert_eq!(stats.final_nodes, t.node_count());
            assert!(t.check_invariants().is_empty());
        }
    }

    #[test]
    fn rho_is_monotonic() {
        let mut last = 0;
        for rho in [1, 5, 20, 40, 60, 80, 100] {
            let mut t = gradient(16);
            t.rho_compress(rho).unwrap();
            assert!(t.node_count() >= last, "rho {rho} left fewer nodes than a smaller rho");
            last = t.node_count();
        }
    }

    #[test]
    fn cheapest_twig_goes_first_and_ties_go_to_the_latest() {
        // Top-left and bottom-right hold the same samples, so their epsilons tie.
        let rows = [[0, 1, 5, 5], [0, 0, 5, 9], [7, 7, 0, 1], [7, 7, 0, 0]];
        let mut t = QuadTree::from_rows(&rows, 255).unwrap();
        let [tl, tr, br, bl] = t.children(t.root()).unwrap();
        assert!(t.is_leaf(bl), "uniform quadrant should already be a leaf");
        assert_eq!(t.node_count(), 17);

        // 16 * 100 > 95 * 17 = 1615, so exactly one merge is needed.
        let stats = t.rho_compress(95).unwrap();
        assert_eq!(stats.merges, 1);
        // TL and BR tie; BR was queued last and wins.
        assert!(t.is_twig_root(tl), "top-left should survive");
        assert!(t.is_leaf(br), "bottom-right should be merged");
        assert!(t.is_twig_root(tr), "top-right costs more");
        assert_eq!(t.value(br), Some(0));
    }

    #[test]
    fn merges_cascade_to_uniform_ancestors() {
        // Both 2x2 blocks of the top-left 4x4 quadrant merge to 1 with the
        // other two already 1, so the whole quadrant collapses.
        let mut rows = [[1_u32; 8]; 8];
        rows[0][0] = 2;
        rows[7][7] = 200;
        let mut t = QuadTree::from_rows(&rows, 255).unwrap();
        let tl = t.children(t.root()).unwrap()[0];
        let stats = t.rho_compress(1).unwrap();
        assert!(stats.cascades >= 1, "expected at least one cascade");
        assert!(!t.is_alive(tl) || t.is_leaf(tl), "top-left should collapse");
        assert!(t.check_invariants().is_empty());
    }
}
