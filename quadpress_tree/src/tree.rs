// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core quadtree: arena storage, construction from a grid, node queries, rendering.

use alloc::vec;
use alloc::vec::Vec;
use kurbo::{Point, Rect};

use crate::error::Error;
use crate::grid::Grid;
use crate::types::{NodeId, NodeKind, Quadrant, Violations};

/// A region quadtree over a square grid of samples.
///
/// Every node is either a leaf holding one sample value for its whole square,
/// or an internal node with exactly four children in [`Quadrant::ALL`] order.
/// Nodes live in an arena and are addressed by generational [`NodeId`]s.
#[derive(Clone)]
pub struct QuadTree {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
    side: usize,
    max_sample: u32,
    live: usize,
}

impl core::fmt::Debug for QuadTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("side", &self.side)
            .field("max_sample", &self.max_sample)
            .field("nodes_alive", &self.live)
            .field("nodes_total", &self.nodes.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    kind: NodeKind,
}

pub(crate) fn all_equal(values: [u32; 4]) -> bool {
    values.iter().all(|&v| v == values[0])
}

impl QuadTree {
    /// A tree with no nodes yet; the caller allocates nodes and sets the root.
    pub(crate) fn empty(side: usize, max_sample: u32) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 0),
            side,
            max_sample,
            live: 0,
        }
    }

    /// Build the tree for `grid`.
    ///
    /// Construction is bottom-up: four sibling leaves holding the same value are
    /// collapsed into one leaf as soon as they are produced, so a uniform square
    /// of any size ends up as a single leaf.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "quadtree::build", fields(side = grid.side()))
    )]
    pub fn build(grid: &Grid) -> Self {
        let mut tree = Self::empty(grid.side(), grid.max_sample());
        tree.root = tree.build_region(grid, 0, 0, grid.side());
        #[cfg(feature = "tracing")]
        tracing::debug!(nodes = tree.live, "built quadtree");
        debug_assert!(
            tree.check_invariants().is_empty(),
            "build produced a malformed tree"
        );
        tree
    }

    /// Validate nested rows as a [`Grid`] and build its tree.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R], max_sample: u32) -> Result<Self, Error> {
        Ok(Self::build(&Grid::from_rows(rows, max_sample)?))
    }

    fn build_region(&mut self, grid: &Grid, row: usize, col: usize, size: usize) -> NodeId {
        match size {
            1 => self.alloc(NodeKind::Leaf(grid.at(row, col))),
            2 => {
                let samples = Quadrant::ALL.map(|q| {
                    let (dr, dc) = q.offset(1);
                    grid.at(row + dr, col + dc)
                });
                let id = self.alloc(NodeKind::Leaf(samples[0]));
                if !all_equal(samples) {
                    self.split_leaf(id, samples);
                }
                id
            }
            _ => {
                let half = size / 2;
                let children = Quadrant::ALL.map(|q| {
                    let (dr, dc) = q.offset(half);
                    self.build_region(grid, row + dr, col + dc, half)
                });
                let values = children.map(|c| self.value(c));
                match values {
                    [Some(v), Some(b), Some(c), Some(d)] if all_equal([v, b, c, d]) => {
                        for child in children {
                            self.release(child);
                        }
                        self.alloc(NodeKind::Leaf(v))
                    }
                    _ => self.alloc_internal(children),
                }
            }
        }
    }

    // --- arena ---

    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, kind)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        self.live += 1;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId stores 32-bit slot indices."
        )]
        NodeId::new(idx as u32, generation)
    }

    /// Allocate an internal node over existing parentless nodes.
    pub(crate) fn alloc_internal(&mut self, children: [NodeId; 4]) -> NodeId {
        let id = self.alloc(NodeKind::Internal(children));
        self.adopt(id, children);
        id
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    fn adopt(&mut self, parent: NodeId, children: [NodeId; 4]) {
        for c in children {
            if let Some(n) = self.node_opt_mut(c) {
                n.parent = Some(parent);
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        self.live -= 1;
    }

    fn release_subtree(&mut self, id: NodeId) {
        if let Some(NodeKind::Internal(children)) = self.kind(id) {
            for c in children {
                self.release_subtree(c);
            }
        }
        self.release(id);
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    // --- node operations ---

    /// Split the leaf `id` into four leaves holding `values`.
    ///
    /// Returns the new children, or `None` if `id` is stale, not a leaf, covers
    /// a single sample, or a value exceeds [`max_sample`](Self::max_sample).
    pub fn create_children(&mut self, id: NodeId, values: [u32; 4]) -> Option<[NodeId; 4]> {
        if !self.is_leaf(id)
            || self.extent(id)? < 2
            || values.iter().any(|&v| v > self.max_sample)
        {
            return None;
        }
        self.split_leaf(id, values)
    }

    fn split_leaf(&mut self, id: NodeId, values: [u32; 4]) -> Option<[NodeId; 4]> {
        let children = values.map(|v| self.alloc(NodeKind::Leaf(v)));
        self.adopt(id, children);
        self.node_opt_mut(id)?.kind = NodeKind::Internal(children);
        Some(children)
    }

    /// Turn `id` into a leaf holding `value`, freeing its whole subtree.
    ///
    /// On a leaf this only replaces the value. Returns `false` and leaves the
    /// tree unchanged if `id` is stale or `value` exceeds the maximum sample.
    pub fn destroy_children(&mut self, id: NodeId, value: u32) -> bool {
        if value > self.max_sample {
            return false;
        }
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        let old = core::mem::replace(&mut node.kind, NodeKind::Leaf(value));
        if let NodeKind::Internal(children) = old {
            for c in children {
                self.release_subtree(c);
            }
        }
        true
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Side length of the covered grid.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Declared maximum sample value.
    pub fn max_sample(&self) -> u32 {
        self.max_sample
    }

    /// Number of live nodes, internal and leaf.
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Side length of the square covered by a live node.
    pub fn extent(&self, id: NodeId) -> Option<usize> {
        self.node_opt(id)?;
        let mut size = self.side;
        let mut cur = id;
        while let Some(p) = self.parent(cur) {
            size /= 2;
            cur = p;
        }
        Some(size)
    }

    /// Contents of a live node.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node_opt(id).map(|n| n.kind)
    }

    /// Parent of a live node; `None` for the root and for stale ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of a live internal node.
    pub fn children(&self, id: NodeId) -> Option<[NodeId; 4]> {
        match self.kind(id)? {
            NodeKind::Internal(children) => Some(children),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Sample value of a live leaf.
    pub fn value(&self, id: NodeId) -> Option<u32> {
        self.kind(id)?.value()
    }

    /// Whether `id` is a live leaf.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Leaf(_)))
    }

    /// Whether `id` is an internal node whose four children are all leaves.
    pub fn is_twig_root(&self, id: NodeId) -> bool {
        self.twig_values(id).is_some()
    }

    /// The four leaf values under a twig root, in quadrant order.
    pub fn twig_values(&self, id: NodeId) -> Option<[u32; 4]> {
        let children = self.children(id)?;
        let mut values = [0; 4];
        for (slot, c) in values.iter_mut().zip(children) {
            *slot = self.value(c)?;
        }
        Some(values)
    }

    /// Whether `id` is a twig root whose four leaves hold the same value.
    pub fn children_equal(&self, id: NodeId) -> bool {
        self.uniform_value(id).is_some()
    }

    pub(crate) fn uniform_value(&self, id: NodeId) -> Option<u32> {
        let values = self.twig_values(id)?;
        all_equal(values).then_some(values[0])
    }

    /// Live nodes in pre-order, children visited in quadrant order.
    pub fn preorder(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root];
        core::iter::from_fn(move || {
            let id = stack.pop()?;
            if let Some(children) = self.children(id) {
                stack.extend(children.iter().rev());
            }
            Some(id)
        })
    }

    // --- rendering and geometry ---

    fn for_each_leaf(&self, mut f: impl FnMut(usize, usize, usize, u32)) {
        let mut stack = vec![(self.root, 0_usize, 0_usize, self.side)];
        while let Some((id, row, col, size)) = stack.pop() {
            match self.kind(id) {
                Some(NodeKind::Leaf(v)) => f(row, col, size, v),
                Some(NodeKind::Internal(children)) => {
                    let half = size / 2;
                    for (q, c) in Quadrant::ALL.iter().zip(children).rev() {
                        let (dr, dc) = q.offset(half);
                        stack.push((c, row + dr, col + dc, half));
                    }
                }
                None => {}
            }
        }
    }

    /// Expand the tree back into a full grid.
    ///
    /// Each leaf paints its value over the whole square it covers.
    pub fn render(&self) -> Grid {
        let side = self.side;
        let mut samples = vec![0; side * side];
        self.for_each_leaf(|row, col, size, value| {
            for r in row..row + size {
                let start = r * side + col;
                samples[start..start + size].fill(value);
            }
        });
        Grid::from_parts(side, self.max_sample, samples)
    }

    /// Square covered by every leaf, in sample units with `x` as column and `y` as row.
    pub fn leaf_regions(&self) -> Vec<(Rect, u32)> {
        let mut out = Vec::with_capacity(self.live);
        self.for_each_leaf(|row, col, size, value| {
            let rect = Rect::new(col as f64, row as f64, (col + size) as f64, (row + size) as f64);
            out.push((rect, value));
        });
        out
    }

    /// Value of the leaf covering `pt`, with `x` as column and `y` as row.
    ///
    /// Returns `None` outside `[0, side)` on either axis.
    pub fn value_at(&self, pt: Point) -> Option<u32> {
        let side = self.side as f64;
        if !(pt.x >= 0.0 && pt.y >= 0.0 && pt.x < side && pt.y < side) {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Both coordinates were checked to lie in [0, side)."
        )]
        let (row, col) = (pt.y as usize, pt.x as usize);
        self.value_at_cell(row, col)
    }

    /// Value of the leaf covering sample `(row, col)`.
    pub fn value_at_cell(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.side || col >= self.side {
            return None;
        }
        let (mut id, mut top, mut left, mut size) = (self.root, 0, 0, self.side);
        loop {
            match self.kind(id)? {
                NodeKind::Leaf(v) => return Some(v),
                NodeKind::Internal(children) => {
                    size /= 2;
                    let q = Quadrant::containing(row >= top + size, col >= left + size);
                    let (dr, dc) = q.offset(size);
                    top += dr;
                    left += dc;
                    id = children[q.index()];
                }
            }
        }
    }

    // --- invariants ---

    /// Walk the tree from the root and report every structural problem found.
    pub fn check_invariants(&self) -> Violations {
        let mut found = Violations::empty();
        let Some(root) = self.node_opt(self.root) else {
            return Violations::DANGLING_CHILD;
        };
        if root.parent.is_some() {
            found |= Violations::ROOT_HAS_PARENT;
        }
        let mut reachable = 0;
        let mut stack = vec![(self.root, self.side)];
        while let Some((id, size)) = stack.pop() {
            reachable += 1;
            match self.kind(id) {
                Some(NodeKind::Leaf(v)) if v > self.max_sample => {
                    found |= Violations::SAMPLE_OUT_OF_RANGE;
                }
                Some(NodeKind::Internal(children)) => {
                    if size < 2 {
                        found |= Violations::TOO_DEEP;
                    }
                    for c in children {
                        if !self.is_alive(c) {
                            found |= Violations::DANGLING_CHILD;
                            continue;
                        }
                        if self.parent(c) != Some(id) {
                            found |= Violations::PARENT_MISMATCH;
                        }
                        stack.push((c, size / 2));
                    }
                }
                _ => {}
            }
        }
        if reachable != self.live {
            found |= Violations::COUNT_MISMATCH;
        }
        found
    }

    /// Like [`check_invariants`](Self::check_invariants), as a `Result`.
    pub fn validate(&self) -> Result<(), Error> {
        let found = self.check_invariants();
        if found.is_empty() {
            Ok(())
        } else {
            Err(Error::InvariantViolation(found))
        }
    }
}

impl Node {
    fn new(generation: u32, kind: NodeKind) -> Self {
        Self {
            generation,
            parent: None,
            kind,
        }
    }
}
