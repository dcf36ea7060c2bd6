// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validated, sorted bin edges.

use alloc::vec::Vec;

use crate::error::HistogramError;

/// Sorted, strictly increasing, finite bin edges.
///
/// `n + 1` edges describe `n` bins. Bin `i` is the half-open interval
/// `[edges[i], edges[i + 1])`, except the last bin, which also includes its upper
/// edge. Distances outside `[min, max]` fall in no bin.
#[derive(Clone, Debug, PartialEq)]
pub struct BinEdges(Vec<f64>);

impl BinEdges {
    /// Validate and sort `edges`.
    ///
    /// Edges may come in any order. They must be finite and distinct, and there
    /// must be at least two of them.
    pub fn new(edges: impl IntoIterator<Item = f64>) -> Result<Self, HistogramError> {
        let mut edges: Vec<f64> = edges.into_iter().collect();
        if edges.len() < 2 {
            return Err(HistogramError::TooFewEdges(edges.len()));
        }
        if let Some(&bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(HistogramError::NonFiniteEdge(bad));
        }
        edges.sort_by(f64::total_cmp);
        if let Some(w) = edges.windows(2).find(|w| w[0] == w[1]) {
            return Err(HistogramError::DuplicateEdge(w[0]));
        }
        Ok(Self(edges))
    }

    /// `bins` equal-width bins spanning `lo..=hi`.
    ///
    /// The outer edges are exactly `lo` and `hi`.
    pub fn linear(lo: f64, hi: f64, bins: usize) -> Result<Self, HistogramError> {
        if bins == 0 {
            return Err(HistogramError::TooFewEdges(1));
        }
        let step = (hi - lo) / bins as f64;
        Self::new((0..=bins).map(|i| if i == bins { hi } else { lo + step * i as f64 }))
    }

    /// The edges, ascending.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of bins, one less than the number of edges.
    pub fn bin_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Lowest edge.
    pub fn min(&self) -> f64 {
        self.0[0]
    }

    /// Highest edge.
    pub fn max(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Width of every bin, in order.
    pub fn widths(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.0.windows(2).map(|w| w[1] - w[0])
    }

    /// The bin `value` falls in, if any.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        if !(value >= self.min() && value <= self.max()) {
            return None;
        }
        if value == self.max() {
            return Some(self.bin_count() - 1);
        }
        Some(self.0.partition_point(|&e| e <= value) - 1)
    }
}
