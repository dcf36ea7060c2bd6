// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pairtree: a static Barnes–Hut quadtree for approximate pair-distance counts.
//!
//! Pairtree indexes a fixed set of 2D points and answers, for any query point,
//! "how many points lie at roughly which distance from here, out to a radius".
//! The answer is a stream of [`DistanceSample`]s, each a distance and a weight.
//!
//! - Distant clusters are collapsed into one sample at their mean position, under
//!   the Barnes–Hut opening criterion `size / distance < theta`.
//! - `theta = 0` turns the approximation off: results match a brute-force count.
//! - Self-queries exclude each point from its own counts by identity, so
//!   coincident duplicates are still counted against each other.
//!
//! Samples are typically binned into a histogram of pair distances; see the
//! `pairtree_histogram` crate.
//!
//! # Example
//!
//! ```rust
//! use pairtree::{PointId, QueryParams, Tree};
//!
//! let tree = Tree::new([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]).unwrap();
//! let params = QueryParams::new(1.5).with_theta(0.0);
//!
//! // A foreign query at the first corner sees every point, itself at distance 0.
//! let mut d: Vec<_> = tree
//!     .samples((0.0, 0.0), &params)
//!     .unwrap()
//!     .map(|s| (s.distance, s.weight))
//!     .collect();
//! d.sort_by(|a, b| a.0.total_cmp(&b.0));
//! assert_eq!(d[..3], [(0.0, 1), (1.0, 1), (1.0, 1)]);
//! assert!((d[3].0 - 2.0_f64.sqrt()).abs() < 1e-12);
//!
//! // Queried as a member of the tree, the point does not count itself.
//! let own: usize = tree
//!     .samples_excluding(PointId::new(0), &params)
//!     .unwrap()
//!     .map(|s| s.weight)
//!     .sum();
//! assert_eq!(own, 3);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` in `kurbo` and `thiserror`.
//! - `libm`: floating-point support for `no_std` builds through `kurbo`.
//! - `parallel`: [`Tree::par_query`] and [`Tree::par_query_self`] on rayon.
//!
//! ### Float semantics
//!
//! Coordinates must be finite; construction and queries reject anything else.
//! A radius of `f64::INFINITY` is accepted and disables the cutoff.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod config;
mod error;
mod node;
mod query;
mod tree;
mod types;

#[cfg(feature = "parallel")]
mod parallel;

pub mod walk;

pub use config::{BuildOptions, DEFAULT_MIN_EXTENT_RATIO, DEFAULT_THETA, QueryParams};
pub use error::{BuildError, QueryError};
pub use kurbo::Point;
pub use node::NodeRef;
pub use query::{DistanceSample, Samples};
pub use tree::Tree;
pub use types::{Extent, PointId, Quadrant};
