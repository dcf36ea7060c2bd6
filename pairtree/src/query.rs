// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Barnes–Hut distance/count queries.
//!
//! For a query point `q` the traversal starts at the root and, per node:
//!
//! - **prunes** the subtree when the nearest point of the node's extent is farther
//!   than the radius (conservative: no point inside can be in range),
//! - **aggregates** a leaf, or a node whose larger side `s` and aggregate distance
//!   `d` satisfy `s / d < theta`, into one [`DistanceSample`] of weight `count`,
//!   provided `d` is within the radius,
//! - otherwise **descends** into the occupied children in NW, NE, SW, SE order.
//!
//! A node whose aggregate coincides with `q` (`d == 0`) is never aggregated unless
//! it is a leaf. Comparisons use squared distances; the square root is taken once
//! per reported sample.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::config::QueryParams;
use crate::error::QueryError;
use crate::tree::{NodeIdx, Tree};
use crate::types::PointId;

/// One observation: `weight` indexed points at (approximately) `distance`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DistanceSample {
    /// Euclidean distance from the query point to the sampled point or aggregate.
    pub distance: f64,
    /// Number of indexed points the sample stands for (at least 1).
    pub weight: usize,
}

impl DistanceSample {
    /// Create a sample.
    pub const fn new(distance: f64, weight: usize) -> Self {
        Self { distance, weight }
    }
}

/// Lazily produced samples for one query point.
///
/// Returned by [`Tree::samples`] and [`Tree::samples_excluding`]. Dropping the
/// iterator abandons the traversal.
pub struct Samples<'a> {
    tree: &'a Tree,
    query: Point,
    /// Tree-order slot of the point excluded from its own counts.
    exclude: Option<usize>,
    max_radius: f64,
    radius2: f64,
    theta: f64,
    theta2: f64,
    skip_zero_distance: bool,
    stack: Vec<NodeIdx>,
}

impl core::fmt::Debug for Samples<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Samples")
            .field("query", &self.query)
            .field("max_radius", &self.max_radius)
            .field("excluding", &self.exclude.is_some())
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Samples<'a> {
    pub(crate) fn new(
        tree: &'a Tree,
        query: Point,
        exclude: Option<usize>,
        params: &QueryParams,
    ) -> Self {
        Self {
            tree,
            query,
            exclude,
            max_radius: params.max_radius,
            radius2: params.max_radius * params.max_radius,
            theta: params.theta,
            theta2: params.theta * params.theta,
            skip_zero_distance: params.skip_zero_distance,
            stack: vec![NodeIdx::ROOT],
        }
    }
}

impl Samples<'_> {
    /// Barnes–Hut opening test `side / d < theta` for a node at offset `offset`.
    ///
    /// Squares are compared while they are finite; past that, the lengths are.
    #[inline]
    fn opens(&self, side: f64, d2: f64, offset: Vec2) -> bool {
        let side2 = side * side;
        if side2.is_finite() && d2.is_finite() {
            side2 < self.theta2 * d2
        } else {
            side < self.theta * offset.hypot()
        }
    }
}

impl Iterator for Samples<'_> {
    type Item = DistanceSample;

    fn next(&mut self) -> Option<DistanceSample> {
        while let Some(idx) = self.stack.pop() {
            let node = self.tree.node(idx);
            if node.geom.distance_squared_to(self.query) > self.radius2 {
                continue;
            }
            let offset = node.aggregate - self.query;
            let d2 = offset.hypot2();
            let aggregate =
                node.is_leaf() || (d2 > 0.0 && self.opens(node.geom.max_side(), d2, offset));
            if !aggregate {
                // Reversed so children pop in NW, NE, SW, SE order.
                self.stack.extend(node.children.iter().rev().flatten());
                continue;
            }
            if d2 > self.radius2 || (self.skip_zero_distance && d2 == 0.0) {
                continue;
            }
            let mut weight = node.count();
            if self.exclude.is_some_and(|slot| node.span.contains(&slot)) {
                weight -= 1;
            }
            if weight == 0 {
                continue;
            }
            let distance = offset.hypot();
            if distance > self.max_radius {
                continue;
            }
            return Some(DistanceSample { distance, weight });
        }
        None
    }
}

pub(crate) fn check_point(index: usize, p: Point) -> Result<Point, QueryError> {
    if p.is_finite() {
        Ok(p)
    } else {
        Err(QueryError::InvalidCoordinate {
            index,
            x: p.x,
            y: p.y,
        })
    }
}

impl Tree {
    /// Stream the samples for an arbitrary query point.
    ///
    /// No point is excluded, so an indexed point queried this way is counted
    /// against itself at distance zero (see [`Tree::samples_excluding`]).
    pub fn samples(
        &self,
        query: impl Into<Point>,
        params: &QueryParams,
    ) -> Result<Samples<'_>, QueryError> {
        params.validate()?;
        let query = check_point(0, query.into())?;
        Ok(Samples::new(self, query, None, params))
    }

    /// Stream the samples for the indexed point `id`, excluding that point itself.
    ///
    /// Other points at the same coordinates are still reported.
    pub fn samples_excluding(
        &self,
        id: PointId,
        params: &QueryParams,
    ) -> Result<Samples<'_>, QueryError> {
        params.validate()?;
        let slot = self.slot_of(id).ok_or(QueryError::UnknownPoint(id))?;
        let query = self.entries(slot..slot + 1)[0].pos;
        Ok(Samples::new(self, query, Some(slot), params))
    }

    /// Samples for each query point, in input order.
    ///
    /// The query points are treated as foreign: nothing is excluded. Every point and
    /// parameter is checked before any traversal starts.
    pub fn query<I, P>(
        &self,
        points: I,
        params: &QueryParams,
    ) -> Result<Vec<Vec<DistanceSample>>, QueryError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        params.validate()?;
        let queries = points
            .into_iter()
            .enumerate()
            .map(|(index, p)| check_point(index, p.into()))
            .collect::<Result<Vec<_>, _>>()?;
        let out: Vec<Vec<DistanceSample>> = queries
            .iter()
            .map(|&q| Samples::new(self, q, None, params).collect())
            .collect();
        log::debug!(
            "queried {} points: {} samples",
            out.len(),
            out.iter().map(Vec::len).sum::<usize>()
        );
        Ok(out)
    }

    /// Samples for every indexed point against the tree itself, in input order.
    ///
    /// Each point is excluded from its own counts by identity.
    pub fn query_self(&self, params: &QueryParams) -> Result<Vec<Vec<DistanceSample>>, QueryError> {
        params.validate()?;
        let out: Vec<Vec<DistanceSample>> = (0..self.len())
            .map(|i| self.self_samples(PointId::new(i), params).collect())
            .collect();
        log::debug!(
            "self-queried {} points: {} samples",
            out.len(),
            out.iter().map(Vec::len).sum::<usize>()
        );
        Ok(out)
    }

    /// All self-query samples as one flat stream, suitable for histogramming.
    ///
    /// Every unordered pair appears twice, once from each end.
    pub fn pair_samples<'a>(
        &'a self,
        params: &QueryParams,
    ) -> Result<impl Iterator<Item = DistanceSample> + use<'a>, QueryError> {
        params.validate()?;
        let params = *params;
        Ok((0..self.len()).flat_map(move |i| self.self_samples(PointId::new(i), &params)))
    }

    /// Samples for an indexed point that is known to exist; parameters already checked.
    pub(crate) fn self_samples(&self, id: PointId, params: &QueryParams) -> Samples<'_> {
        let slot = self.slot_of(id).unwrap_or(usize::MAX);
        let query = self.point(id).unwrap_or(Point::ORIGIN);
        Samples::new(self, query, Some(slot), params)
    }
}
