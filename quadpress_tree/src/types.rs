// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the quadtree: node identifiers, node contents, quadrants, and invariant flags.

/// Identifier for a node in a [`QuadTree`](crate::QuadTree).
///
/// This is a small, copyable handle that stays valid while the node is alive
/// and becomes stale once the node is merged away.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - A freshly allocated slot gets generation `1`.
/// - When a parent merges, the slots of its children are freed; their `NodeId`s are now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`QuadTree::is_alive`](crate::QuadTree::is_alive) to check whether a `NodeId`
/// still refers to a live node. Stale ids never alias a different live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Contents of a node: one sample, or exactly four children.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A uniform square of samples.
    Leaf(u32),
    /// Four children in [`Quadrant::ALL`] order.
    Internal([NodeId; 4]),
}

impl NodeKind {
    /// The sample value if this is a leaf.
    pub const fn value(self) -> Option<u32> {
        match self {
            Self::Leaf(v) => Some(v),
            Self::Internal(_) => None,
        }
    }
}

/// Position of a child inside its parent's square.
///
/// Children are always stored, built, rendered and serialized in the winding
/// order top-left, top-right, bottom-right, bottom-left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Rows and columns in the first half.
    TopLeft,
    /// First-half rows, second-half columns.
    TopRight,
    /// Rows and columns in the second half.
    BottomRight,
    /// Second-half rows, first-half columns.
    BottomLeft,
}

impl Quadrant {
    /// All quadrants in winding order.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// `(row, col)` offset of this quadrant inside a square whose half side is `half`.
    pub const fn offset(self, half: usize) -> (usize, usize) {
        match self {
            Self::TopLeft => (0, 0),
            Self::TopRight => (0, half),
            Self::BottomRight => (half, half),
            Self::BottomLeft => (half, 0),
        }
    }

    /// The quadrant holding a cell, given whether it lies in the bottom and right halves.
    pub const fn containing(bottom: bool, right: bool) -> Self {
        match (bottom, right) {
            (false, false) => Self::TopLeft,
            (false, true) => Self::TopRight,
            (true, true) => Self::BottomRight,
            (true, false) => Self::BottomLeft,
        }
    }

    /// Index of this quadrant in [`Quadrant::ALL`] and in [`NodeKind::Internal`].
    pub const fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomRight => 2,
            Self::BottomLeft => 3,
        }
    }
}

bitflags::bitflags! {
    /// Structural problems found by [`QuadTree::check_invariants`](crate::QuadTree::check_invariants).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Violations: u8 {
        /// A child id (or the root id) does not refer to a live node.
        const DANGLING_CHILD      = 0b0000_0001;
        /// A child's parent link does not point back at the node holding it.
        const PARENT_MISMATCH     = 0b0000_0010;
        /// The root has a parent link.
        const ROOT_HAS_PARENT     = 0b0000_0100;
        /// The live node count differs from the number of reachable nodes.
        const COUNT_MISMATCH      = 0b0000_1000;
        /// An internal node covers a single sample.
        const TOO_DEEP            = 0b0001_0000;
        /// A leaf holds a value above the declared maximum sample.
        const SAMPLE_OUT_OF_RANGE = 0b0010_0000;
    }
}
