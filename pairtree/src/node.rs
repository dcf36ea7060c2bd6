// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only node handles for introspection and rendering.

use kurbo::Point;

use crate::tree::{NodeIdx, Tree};
use crate::types::{Extent, PointId, Quadrant};

/// A borrowed view of one tree node.
///
/// Handles are cheap to copy and only valid while the tree is borrowed.
#[derive(Copy, Clone)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    idx: NodeIdx,
}

impl core::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("extent", &self.extent())
            .field("aggregate_position", &self.aggregate_position())
            .field("count", &self.count())
            .field("is_leaf", &self.is_leaf())
            .finish_non_exhaustive()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.idx == other.idx
    }
}

impl Eq for NodeRef<'_> {}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a Tree, idx: NodeIdx) -> Self {
        Self { tree, idx }
    }

    /// True if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.tree.node(self.idx).is_leaf()
    }

    /// The region this node owns.
    pub fn extent(&self) -> Extent {
        self.tree.node(self.idx).geom
    }

    /// Mean position of the subtree's points; the point itself for a single-point leaf.
    pub fn aggregate_position(&self) -> Point {
        self.tree.node(self.idx).aggregate
    }

    /// Number of points in the subtree.
    pub fn count(&self) -> usize {
        self.tree.node(self.idx).count()
    }

    /// Distance from the root, which is at depth 0.
    pub fn depth(&self) -> usize {
        self.tree.node(self.idx).depth
    }

    /// The child in quadrant `q`, if that quadrant holds any points.
    pub fn child(&self, q: Quadrant) -> Option<Self> {
        self.tree.node(self.idx).children[q.index()].map(|c| Self::new(self.tree, c))
    }

    /// Occupied children in NW, NE, SW, SE order. Empty for a leaf.
    pub fn children(&self) -> impl Iterator<Item = (Quadrant, NodeRef<'a>)> + use<'a> {
        let tree = self.tree;
        let slots = tree.node(self.idx).children;
        Quadrant::ALL
            .into_iter()
            .zip(slots)
            .filter_map(move |(q, c)| c.map(|c| (q, Self::new(tree, c))))
    }

    /// Every point in the subtree, in tree order.
    pub fn points(&self) -> impl ExactSizeIterator<Item = (PointId, Point)> + use<'a> {
        let tree = self.tree;
        tree.entries(tree.node(self.idx).span.clone())
            .iter()
            .map(|e| (e.id, e.pos))
    }

    /// Whether the point with identity `id` lies in this subtree.
    pub fn contains_id(&self, id: PointId) -> bool {
        self.tree
            .slot_of(id)
            .is_some_and(|slot| self.tree.node(self.idx).span.contains(&slot))
    }
}
