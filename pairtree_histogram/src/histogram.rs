// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weighted binning of distance samples.

use alloc::vec;
use alloc::vec::Vec;

use pairtree::{DistanceSample, QueryError, QueryParams, Tree};

use crate::edges::BinEdges;

/// Weighted counts of distance samples over a fixed set of bins.
///
/// Each sample adds its full weight to the bin containing its distance. Samples
/// outside the edges are not binned; their weight is tallied separately.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    edges: BinEdges,
    counts: Vec<usize>,
    dropped: usize,
}

impl Histogram {
    /// An empty histogram over `edges`.
    pub fn new(edges: BinEdges) -> Self {
        let counts = vec![0; edges.bin_count()];
        Self {
            edges,
            counts,
            dropped: 0,
        }
    }

    /// Bin every sample of `samples`.
    pub fn from_samples(
        edges: BinEdges,
        samples: impl IntoIterator<Item = DistanceSample>,
    ) -> Self {
        let mut hist = Self::new(edges);
        hist.extend(samples);
        log::debug!(
            "binned weight {} into {} bins, {} outside",
            hist.total_weight(),
            hist.counts.len(),
            hist.dropped
        );
        hist
    }

    /// Histogram of every pair distance in `tree`, each pair counted from both ends.
    pub fn from_pairs(
        tree: &Tree,
        params: &QueryParams,
        edges: BinEdges,
    ) -> Result<Self, QueryError> {
        Ok(Self::from_samples(edges, tree.pair_samples(params)?))
    }

    /// Add one sample. Returns `false` if its distance falls outside the edges.
    pub fn add(&mut self, sample: DistanceSample) -> bool {
        match self.edges.bin_of(sample.distance) {
            Some(bin) => {
                self.counts[bin] += sample.weight;
                true
            }
            None => {
                self.dropped += sample.weight;
                false
            }
        }
    }

    /// The bin edges.
    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    /// Weighted count per bin.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Sum of all binned weights.
    pub fn total_weight(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Weight of the samples that fell outside the edges.
    pub fn dropped_weight(&self) -> usize {
        self.dropped
    }

    /// Width of every bin, in order.
    pub fn bin_widths(&self) -> Vec<f64> {
        self.edges.widths().collect()
    }

    /// Probability density per bin: `count / (width * total_weight)`.
    ///
    /// Integrates to one over the edges. All zeros when nothing was binned.
    pub fn density(&self) -> Vec<f64> {
        let total = self.total_weight();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        let total = total as f64;
        self.counts
            .iter()
            .zip(self.edges.widths())
            .map(|(&c, w)| c as f64 / w / total)
            .collect()
    }
}

impl Extend<DistanceSample> for Histogram {
    fn extend<T: IntoIterator<Item = DistanceSample>>(&mut self, iter: T) {
        for sample in iter {
            self.add(sample);
        }
    }
}
