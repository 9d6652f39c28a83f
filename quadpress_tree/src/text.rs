// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parenthesized text form of a tree.
//!
//! ```text
//! node     := leaf | internal
//! leaf     := VALUE ' '
//! internal := '(' node ' ' node ' ' node ' ' node ')'
//! ```
//!
//! Children appear in quadrant order. The parser accepts any amount of ASCII
//! whitespace between tokens.

use alloc::string::{String, ToString};
use core::fmt;

use crate::error::Error;
use crate::grid::sample_count;
use crate::tree::QuadTree;
use crate::types::{NodeId, NodeKind};

impl QuadTree {
    /// Text form of the tree; see the [module docs](crate::text) for the grammar.
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Rebuild a tree from its text form.
    ///
    /// `side` and `max_sample` are not part of the text and must be supplied.
    /// Fails if the text does not follow the grammar, nests below single samples,
    /// or holds a value above `max_sample`.
    pub fn deserialize(text: &str, side: usize, max_sample: u32) -> Result<Self, Error> {
        sample_count(side)?;
        let mut tree = Self::empty(side, max_sample);
        let mut parser = Parser {
            bytes: text.as_bytes(),
            pos: 0,
            max_sample,
        };
        let root = parser.node(&mut tree, side)?;
        parser.skip_whitespace();
        if parser.pos != parser.bytes.len() {
            return Err(parser.error("trailing input after the root node"));
        }
        tree.set_root(root);
        Ok(tree)
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        match self.kind(id) {
            Some(NodeKind::Leaf(v)) => write!(f, "{v} "),
            Some(NodeKind::Internal(children)) => {
                f.write_str("(")?;
                for (i, c) in children.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    self.write_node(f, c)?;
                }
                f.write_str(")")
            }
            None => Err(fmt::Error),
        }
    }
}

impl fmt::Display for QuadTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root())
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    max_sample: u32,
}

impl Parser<'_> {
    fn error(&self, what: &'static str) -> Error {
        Error::Syntax {
            what,
            offset: self.pos,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.bytes.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
    }

    fn node(&mut self, tree: &mut QuadTree, size: usize) -> Result<NodeId, Error> {
        self.skip_whitespace();
        match self.bytes.get(self.pos) {
            Some(b'(') => {
                if size < 2 {
                    return Err(self.error("internal node covering a single sample"));
                }
                self.pos += 1;
                let mut children = [NodeId::new(0, 0); 4];
                for slot in &mut children {
                    *slot = self.node(tree, size / 2)?;
                }
                self.skip_whitespace();
                if self.bytes.get(self.pos) != Some(&b')') {
                    return Err(self.error("expected ')' after four children"));
                }
                self.pos += 1;
                Ok(tree.alloc_internal(children))
            }
            Some(b'0'..=b'9') => {
                let start = self.pos;
                let mut value: u32 = 0;
                while let Some(&d @ b'0'..=b'9') = self.bytes.get(self.pos) {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(u32::from(d - b'0')))
                        .ok_or_else(|| self.error("sample value overflows u32"))?;
                    self.pos += 1;
                }
                if value > self.max_sample {
                    return Err(Error::Syntax {
                        what: "sample value above the declared maximum",
                        offset: start,
                    });
                }
                Ok(tree.alloc(NodeKind::Leaf(value)))
            }
            Some(_) => Err(self.error("expected '(' or a sample value")),
            None => Err(self.error("unexpected end of input")),
        }
    }
}
