// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree construction: recursive quadrant subdivision into a node arena.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use kurbo::{Point, Vec2};

use crate::config::BuildOptions;
use crate::error::BuildError;
use crate::node::NodeRef;
use crate::types::{Extent, PointId, Quadrant};

/// Index of a node in the tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const ROOT: Self = Self(0);

    const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

/// An indexed point together with its identity.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) pos: Point,
    pub(crate) id: PointId,
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) geom: Extent,
    /// Mean position of every point in the subtree.
    pub(crate) aggregate: Point,
    /// The subtree's points as a contiguous range of `Tree::entries`.
    pub(crate) span: Range<usize>,
    /// Child per quadrant; empty quadrants are not materialized.
    pub(crate) children: [Option<NodeIdx>; 4],
    pub(crate) depth: usize,
}

impl Node {
    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.span.len()
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// A static quadtree over a 2D point set.
///
/// Built once from a finite, non-empty point sequence and immutable afterward, so a
/// shared reference can be queried from many threads at once.
///
/// Every node owns a contiguous run of the tree's reordered points. Leaves hold a
/// single point, or several points that are coincident or closer together than the
/// split threshold (a degenerate leaf).
pub struct Tree {
    nodes: Vec<Node>,
    /// Points in tree order: each node's subtree is `entries[node.span]`.
    entries: Vec<Entry>,
    /// Position in `entries` of each point, indexed by `PointId`.
    slots: Vec<usize>,
    depth: usize,
    degenerate_leaves: usize,
    min_extent: f64,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("points", &self.entries.len())
            .field("nodes", &self.nodes.len())
            .field("depth", &self.depth)
            .field("degenerate_leaves", &self.degenerate_leaves)
            .field("min_extent", &self.min_extent)
            .field("extent", &self.extent())
            .finish_non_exhaustive()
    }
}

impl Tree {
    /// Build a tree with [`BuildOptions::default`].
    ///
    /// Point identities are assigned in input order: the first point is `PointId::new(0)`.
    pub fn new<I, P>(points: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        Self::with_options(points, BuildOptions::default())
    }

    /// Build a tree with explicit options.
    ///
    /// Fails with [`BuildError::EmptyInput`] for an empty sequence and with
    /// [`BuildError::InvalidCoordinate`] for the first point that is not finite.
    pub fn with_options<I, P>(points: I, options: BuildOptions) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let mut entries: Vec<Entry> = Vec::new();
        for (index, p) in points.into_iter().enumerate() {
            let pos: Point = p.into();
            if !pos.is_finite() {
                return Err(BuildError::InvalidCoordinate {
                    index,
                    x: pos.x,
                    y: pos.y,
                });
            }
            entries.push(Entry {
                pos,
                id: PointId::new(index),
            });
        }
        let bounds =
            Extent::from_points(entries.iter().map(|e| e.pos)).ok_or(BuildError::EmptyInput)?;
        let root = bounds.padded(options.force_square);
        let min_extent = options.resolve_min_extent(root.max_side())?;

        let n = entries.len();
        let mut builder = Builder {
            nodes: Vec::with_capacity(2 * n),
            scratch: Vec::with_capacity(n),
            min_extent,
            depth: 0,
            degenerate_leaves: 0,
        };
        builder.build(&mut entries, root);

        let mut slots = vec![0; n];
        for (slot, e) in entries.iter().enumerate() {
            slots[e.id.index()] = slot;
        }

        log::debug!(
            "built quadtree: {} points, {} nodes, depth {}, {} degenerate leaves",
            n,
            builder.nodes.len(),
            builder.depth,
            builder.degenerate_leaves
        );

        Ok(Self {
            nodes: builder.nodes,
            entries,
            slots,
            depth: builder.depth,
            degenerate_leaves: builder.degenerate_leaves,
            min_extent,
        })
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a tree holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of materialized nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node (the root is at depth 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of leaves holding more than one point.
    pub fn degenerate_leaf_count(&self) -> usize {
        self.degenerate_leaves
    }

    /// Split threshold the tree was built with.
    pub fn min_extent(&self) -> f64 {
        self.min_extent
    }

    /// Extent of the root node.
    pub fn extent(&self) -> Extent {
        self.nodes[NodeIdx::ROOT.get()].geom
    }

    /// Position of an indexed point.
    pub fn point(&self, id: PointId) -> Option<Point> {
        let slot = *self.slots.get(id.index())?;
        Some(self.entries[slot].pos)
    }

    /// All indexed points in input order.
    pub fn points(&self) -> impl ExactSizeIterator<Item = (PointId, Point)> + '_ {
        self.slots.iter().map(|&slot| {
            let e = self.entries[slot];
            (e.id, e.pos)
        })
    }

    /// Read-only handle to the root node.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, NodeIdx::ROOT)
    }

    #[inline]
    pub(crate) fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.get()]
    }

    #[inline]
    pub(crate) fn entries(&self, span: Range<usize>) -> &[Entry] {
        &self.entries[span]
    }

    /// Position of `id` in tree order, if it belongs to this tree.
    #[inline]
    pub(crate) fn slot_of(&self, id: PointId) -> Option<usize> {
        self.slots.get(id.index()).copied()
    }
}

struct Builder {
    nodes: Vec<Node>,
    scratch: Vec<Entry>,
    min_extent: f64,
    depth: usize,
    degenerate_leaves: usize,
}

/// A node still to be created: its run of entries, region and parent slot.
struct Pending {
    span: Range<usize>,
    geom: Extent,
    depth: usize,
    parent: Option<(NodeIdx, Quadrant)>,
}

impl Builder {
    /// Build the whole tree over `entries` with an explicit work stack.
    ///
    /// Nodes are created in pre-order, so the root is arena slot 0 and every child
    /// sits after its parent. Aggregates of split nodes are filled in afterward by
    /// a reverse sweep over the arena.
    fn build(&mut self, entries: &mut [Entry], root: Extent) {
        let mut stack = vec![Pending {
            span: 0..entries.len(),
            geom: root,
            depth: 0,
            parent: None,
        }];
        while let Some(Pending {
            span,
            geom,
            depth,
            parent,
        }) = stack.pop()
        {
            let idx = NodeIdx::new(self.nodes.len());
            let items = &mut entries[span.clone()];
            self.nodes.push(Node {
                geom,
                aggregate: items[0].pos,
                span: span.clone(),
                children: [None; 4],
                depth,
            });
            if let Some((parent, q)) = parent {
                self.nodes[parent.get()].children[q.index()] = Some(idx);
            }
            self.depth = self.depth.max(depth);

            if items.len() == 1 || self.make_degenerate(idx, items, &geom) {
                continue;
            }

            let counts = partition(items, &mut self.scratch, geom.center());
            let quads = geom.quadrants();
            let mut start = span.end;
            // Reversed so NW is popped, and numbered, first.
            for q in Quadrant::ALL.into_iter().rev() {
                let len = counts[q.index()];
                if len == 0 {
                    continue;
                }
                stack.push(Pending {
                    span: start - len..start,
                    geom: quads[q.index()],
                    depth: depth + 1,
                    parent: Some((idx, q)),
                });
                start -= len;
            }
        }

        for i in (0..self.nodes.len()).rev() {
            let node = &self.nodes[i];
            if node.is_leaf() {
                continue;
            }
            let n = node.count() as f64;
            let mut weighted = Vec2::ZERO;
            for child in node.children.iter().flatten() {
                let c = &self.nodes[child.get()];
                weighted += c.aggregate.to_vec2() * (c.count() as f64 / n);
            }
            self.nodes[i].aggregate = weighted.to_point();
        }
    }

    /// Turn node `idx` into a degenerate leaf if splitting it cannot help.
    ///
    /// That is the case when its points are coincident, when it is at or below the
    /// split threshold, or when no axis on which the points differ can still be
    /// halved in floating point.
    fn make_degenerate(&mut self, idx: NodeIdx, items: &[Entry], geom: &Extent) -> bool {
        let first = items[0].pos;
        if items.iter().all(|e| e.pos == first) {
            self.degenerate_leaves += 1;
            log::trace!(
                "degenerate leaf: {} coincident points at ({}, {})",
                items.len(),
                first.x,
                first.y
            );
            return true;
        }
        let reason = if geom.max_side() <= self.min_extent {
            "below split threshold"
        } else if !geom.can_separate(&spread(items)) {
            "at floating-point resolution"
        } else {
            return false;
        };
        let aggregate = mean(items);
        self.degenerate_leaves += 1;
        log::trace!(
            "degenerate leaf: {} points {} at ({}, {})",
            items.len(),
            reason,
            aggregate.x,
            aggregate.y
        );
        self.nodes[idx.get()].aggregate = aggregate;
        true
    }
}

/// Tight bounding box of a non-empty run of entries.
fn spread(entries: &[Entry]) -> Extent {
    let first = Extent::from_point(entries[0].pos);
    entries[1..]
        .iter()
        .fold(first, |acc, e| acc.union_point(e.pos))
}

/// Mean position, accumulated in fractions so it cannot overflow.
fn mean(entries: &[Entry]) -> Point {
    let n = entries.len() as f64;
    entries
        .iter()
        .fold(Vec2::ZERO, |acc, e| acc + e.pos.to_vec2() / n)
        .to_point()
}

/// Stable counting sort of `entries` into quadrant order around `mid`.
///
/// Returns the number of entries per quadrant, indexed by [`Quadrant::index`].
fn partition(entries: &mut [Entry], scratch: &mut Vec<Entry>, mid: Point) -> [usize; 4] {
    let mut counts = [0_usize; 4];
    for e in entries.iter() {
        counts[Quadrant::of(e.pos, mid).index()] += 1;
    }
    let mut cursor = [0_usize; 4];
    let mut start = 0;
    for (c, n) in cursor.iter_mut().zip(counts) {
        *c = start;
        start += n;
    }
    scratch.clear();
    scratch.extend_from_slice(entries);
    for e in scratch.iter() {
        let q = Quadrant::of(e.pos, mid).index();
        entries[cursor[q]] = *e;
        cursor[q] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_invariants(tree: &Tree, root: NodeIdx) {
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let n = tree.node(idx);
            assert!(n.count() >= 1, "materialized nodes are never empty");
            assert!(n.geom.max_side().is_finite(), "extents stay finite");
            for e in tree.entries(n.span.clone()) {
                assert!(n.geom.contains(e.pos), "subtree points lie in the node extent");
            }
            // The mean may round past an edge its points sit on.
            let slack = 1e-9 * n.geom.max_side();
            let grown = Extent::from_corners(
                Point::new(n.geom.left() - slack, n.geom.bottom() - slack),
                Point::new(n.geom.right() + slack, n.geom.top() + slack),
            );
            assert!(grown.contains(n.aggregate), "aggregate lies in the node extent");
            if n.is_leaf() {
                continue;
            }
            let mut sum = 0;
            let mut next = n.span.start;
            for child in n.children.iter().flatten() {
                let c = tree.node(*child);
                assert!(child.get() > idx.get(), "children follow their parent");
                assert_eq!(c.span.start, next, "children partition the parent span in order");
                assert_eq!(c.depth, n.depth + 1);
                next = c.span.end;
                sum += c.count();
                stack.push(*child);
            }
            assert_eq!(sum, n.count(), "child counts sum to the parent count");
            assert_eq!(next, n.span.end);
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let pts: [(f64, f64); 0] = [];
        assert_eq!(Tree::new(pts).unwrap_err(), BuildError::EmptyInput);
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let err = Tree::new([(0.0, 0.0), (1.0, f64::NAN), (2.0, 2.0)]).unwrap_err();
        assert!(matches!(err, BuildError::InvalidCoordinate { index: 1, .. }));
        let err = Tree::new([(f64::INFINITY, 0.0)]).unwrap_err();
        assert!(matches!(err, BuildError::InvalidCoordinate { index: 0, .. }));
    }

    #[test]
    fn single_point_is_a_root_leaf() {
        let tree = Tree::new([(3.0, -4.0)]).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node_count(), 1);
        let root = tree.node(NodeIdx::ROOT);
        assert!(root.is_leaf());
        assert_eq!(root.aggregate, Point::new(3.0, -4.0));
        assert!(!root.geom.is_degenerate());
    }

    #[test]
    fn four_corners_split_once() {
        let tree = Tree::new([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]).unwrap();
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.depth(), 1);
        let root = tree.node(NodeIdx::ROOT);
        assert_eq!(root.count(), 4);
        assert_eq!(root.aggregate, Point::new(0.5, 0.5));
        let expected = [
            (Quadrant::NorthWest, PointId::new(2)),
            (Quadrant::NorthEast, PointId::new(3)),
            (Quadrant::SouthWest, PointId::new(0)),
            (Quadrant::SouthEast, PointId::new(1)),
        ];
        for (q, id) in expected {
            let child = tree.node(root.children[q.index()].unwrap());
            assert!(child.is_leaf());
            assert_eq!(tree.entries(child.span.clone())[0].id, id);
        }
        check_invariants(&tree, NodeIdx::ROOT);
    }

    #[test]
    fn repeated_point_terminates_as_one_degenerate_leaf() {
        let tree = Tree::new(core::iter::repeat_n((2.5, 2.5), 7)).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.degenerate_leaf_count(), 1);
        let root = tree.node(NodeIdx::ROOT);
        assert!(root.is_leaf());
        assert_eq!(root.count(), 7);
        assert_eq!(root.aggregate, Point::new(2.5, 2.5));
    }

    #[test]
    fn near_coincident_points_stop_at_threshold() {
        let pts = [(0.0, 0.0), (10.0, 10.0), (5.0, 5.0), (5.0 + 1e-9, 5.0)];
        let opts = BuildOptions {
            min_extent: Some(1e-3),
            ..BuildOptions::default()
        };
        let tree = Tree::with_options(pts, opts).unwrap();
        assert_eq!(tree.degenerate_leaf_count(), 1);
        let leaf = (0..tree.node_count())
            .map(|i| tree.node(NodeIdx::new(i)))
            .find(|n| n.is_leaf() && n.count() == 2)
            .expect("the two close points share a leaf");
        assert!(leaf.geom.max_side() <= 1e-3);
        assert!((leaf.aggregate.x - (5.0 + 0.5e-9)).abs() < 1e-12);
        check_invariants(&tree, NodeIdx::ROOT);
    }

    #[test]
    fn invariants_hold_for_scattered_points() {
        let mut state = 0x9E37_79B9_7F4A_7C15_u64;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1_u64 << 53) as f64
        };
        let pts: Vec<(f64, f64)> = (0..500).map(|_| (next() * 50.0, next() * 20.0)).collect();
        let tree = Tree::new(pts.iter().copied()).unwrap();
        assert_eq!(tree.len(), 500);
        check_invariants(&tree, NodeIdx::ROOT);
        for (i, (id, p)) in tree.points().enumerate() {
            assert_eq!(id, PointId::new(i));
            assert_eq!((p.x, p.y), pts[i]);
        }
    }

    #[test]
    fn construction_is_deterministic() {
        let pts = [(0.1, 0.7), (0.4, 0.2), (0.9, 0.9), (0.5, 0.5), (0.5, 0.1)];
        let a = Tree::new(pts).unwrap();
        let b = Tree::new(pts).unwrap();
        assert_eq!(a.node_count(), b.node_count());
        for i in 0..a.node_count() {
            let (na, nb) = (a.node(NodeIdx::new(i)), b.node(NodeIdx::new(i)));
            assert_eq!(na.geom, nb.geom);
            assert_eq!(na.aggregate, nb.aggregate);
            assert_eq!(na.span, nb.span);
        }
    }

    #[test]
    fn boundary_points_go_north_east() {
        // Root is [0, 2]²; (1, 1) sits on both split lines.
        let tree = Tree::new([(0.0, 0.0), (2.0, 2.0), (1.0, 1.0)]).unwrap();
        let root = tree.node(NodeIdx::ROOT);
        let ne = tree.node(root.children[Quadrant::NorthEast.index()].unwrap());
        assert_eq!(ne.count(), 2);
        assert!(root.children[Quadrant::NorthWest.index()].is_none());
        assert!(root.children[Quadrant::SouthEast.index()].is_none());
        check_invariants(&tree, NodeIdx::ROOT);
    }

    #[test]
    fn ulp_apart_points_terminate() {
        let tree = Tree::new([(1.0, 0.0), (1.0 + f64::EPSILON, 0.0)]).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.degenerate_leaf_count(), 1);
        let root = tree.node(NodeIdx::ROOT);
        assert!(root.is_leaf());
        assert_eq!(root.count(), 2);

        // Unresolvable along y next to a far point, and a run of adjacent floats.
        let y = 3.0_f64;
        let next_y = f64::from_bits(y.to_bits() + 1);
        let tree = Tree::new([(0.0, y), (0.0, next_y), (8.0, -2.0)]).unwrap();
        assert_eq!(tree.degenerate_leaf_count(), 1);
        check_invariants(&tree, NodeIdx::ROOT);

        let x = 1e6_f64;
        let step = |i: u64| f64::from_bits(x.to_bits() + i);
        let run: Vec<_> = (0..5).map(|i| (step(i), step(4 - i))).collect();
        let tree = Tree::new(run).unwrap();
        assert_eq!(tree.len(), 5);
        check_invariants(&tree, NodeIdx::ROOT);
    }

    #[test]
    fn coordinates_spanning_the_float_range_still_split() {
        let tree = Tree::new([(-1e308, 0.0), (1e308, 0.0), (0.0, 0.0)]).unwrap();
        assert!(tree.min_extent().is_finite());
        assert_eq!(tree.degenerate_leaf_count(), 0);
        assert!(tree.node_count() > 1);
        let e = tree.extent();
        assert!(e.left().is_finite() && e.right().is_finite() && e.top().is_finite());
        check_invariants(&tree, NodeIdx::ROOT);

        let corners = Tree::new([(f64::MAX, f64::MAX), (f64::MIN, f64::MIN)]).unwrap();
        assert_eq!(corners.degenerate_leaf_count(), 0);
        check_invariants(&corners, NodeIdx::ROOT);
    }

    #[test]
    fn tiny_threshold_builds_deep_trees_without_recursion() {
        let opts = BuildOptions {
            min_extent: Some(f64::MIN_POSITIVE),
            ..BuildOptions::default()
        };
        let tree = Tree::with_options([(0.0, 0.0), (1e-300, 1e-300), (1.0, 1.0)], opts).unwrap();
        assert!(tree.depth() > 900, "depth {}", tree.depth());
        assert_eq!(tree.degenerate_leaf_count(), 0);
        check_invariants(&tree, NodeIdx::ROOT);
    }
}
