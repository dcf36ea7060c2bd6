// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-tree walks built only on [`NodeRef`] accessors.
//!
//! These are what a renderer needs: every occupied box, and the point to draw for
//! every leaf.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::node::NodeRef;
use crate::tree::Tree;
use crate::types::Extent;

/// Pre-order iterator over a subtree. See [`depth_first`].
#[derive(Debug)]
pub struct DepthFirst<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<NodeRef<'a>> {
        let node = self.stack.pop()?;
        let mark = self.stack.len();
        self.stack.extend(node.children().map(|(_, c)| c));
        self.stack[mark..].reverse();
        Some(node)
    }
}

/// Visit `root` and its descendants in pre-order, children in NW, NE, SW, SE order.
pub fn depth_first(root: NodeRef<'_>) -> DepthFirst<'_> {
    DepthFirst { stack: vec![root] }
}

/// Leaves of the subtree under `root`, left to right in quadrant order.
pub fn leaves(root: NodeRef<'_>) -> impl Iterator<Item = NodeRef<'_>> {
    depth_first(root).filter(NodeRef::is_leaf)
}

/// Occupied boxes and leaf points of a subtree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    /// Extent of every materialized node, in pre-order.
    pub extents: Vec<Extent>,
    /// Aggregate position of every leaf, in pre-order.
    pub leaf_positions: Vec<Point>,
}

/// Collect every occupied extent and every leaf position under `root`.
pub fn outline(root: NodeRef<'_>) -> Outline {
    let mut out = Outline::default();
    for node in depth_first(root) {
        out.extents.push(node.extent());
        if node.is_leaf() {
            out.leaf_positions.push(node.aggregate_position());
        }
    }
    out
}

/// Indented text dump, one line per node.
///
/// Leaves list the identities they hold and their position; internal nodes their
/// aggregate position and count. Children are tagged with their quadrant.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.root(), "", None)
    }
}

fn write_node(
    f: &mut fmt::Formatter<'_>,
    node: NodeRef<'_>,
    indent: &str,
    label: Option<&str>,
) -> fmt::Result {
    write!(f, "{indent}+-")?;
    if let Some(label) = label {
        write!(f, " ({label})")?;
    }
    let p = node.aggregate_position();
    if node.is_leaf() {
        let mut ids = node.points().map(|(id, _)| id.index());
        if let Some(first) = ids.next() {
            write!(f, " #{first}")?;
        }
        for id in ids {
            write!(f, ",#{id}")?;
        }
        return writeln!(f, " ({}, {})", p.x, p.y);
    }
    writeln!(f, " n={} cm=({}, {})", node.count(), p.x, p.y)?;
    let mut child_indent = alloc::string::String::from(indent);
    child_indent.push_str("| ");
    for (q, child) in node.children() {
        write_node(f, child, &child_indent, Some(q.label()))?;
    }
    Ok(())
}
