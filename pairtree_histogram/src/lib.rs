// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pairtree Histogram: weighted histograms of pair distances.
//!
//! Turns the [`DistanceSample`](pairtree::DistanceSample) stream of a `pairtree`
//! query into per-bin counts and a probability density, the usual last step of a
//! pair-correlation estimate.
//!
//! - [`BinEdges`] validates and sorts the edges once.
//! - [`Histogram`] adds each sample's full weight to the bin holding its distance.
//! - [`Histogram::density`] normalizes by bin width and total binned weight.
//!
//! # Example
//!
//! ```rust
//! use pairtree::{QueryParams, Tree};
//! use pairtree_histogram::{BinEdges, Histogram};
//!
//! let tree = Tree::new([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]).unwrap();
//! let params = QueryParams::new(1.5).with_theta(0.0);
//! let edges = BinEdges::linear(0.0, 1.5, 3).unwrap();
//!
//! let hist = Histogram::from_pairs(&tree, &params, edges).unwrap();
//! // Four unit sides and two diagonals, each counted from both ends.
//! assert_eq!(hist.counts(), [0, 0, 12]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod edges;
mod error;
mod histogram;

pub use edges::BinEdges;
pub use error::HistogramError;
pub use histogram::Histogram;
