// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported at the boundary of tree construction and queries.

use thiserror::Error;

use crate::types::PointId;

/// Reasons [`Tree::new`](crate::Tree::new) can refuse a point set.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum BuildError {
    /// The point sequence was empty.
    #[error("cannot build a tree from an empty point set")]
    EmptyInput,
    /// A point had a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate ({x}, {y})")]
    InvalidCoordinate {
        /// Position of the offending point in the input.
        index: usize,
        /// Its x coordinate.
        x: f64,
        /// Its y coordinate.
        y: f64,
    },
    /// [`BuildOptions::min_extent`](crate::BuildOptions::min_extent) was not a positive finite number.
    #[error("minimum extent must be positive and finite, got {0}")]
    InvalidMinExtent(f64),
}

/// Reasons a query is rejected before any sample is produced.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum QueryError {
    /// The maximum radius was zero, negative or NaN.
    #[error("maximum radius must be positive, got {0}")]
    InvalidRadius(f64),
    /// The opening angle was negative or NaN.
    #[error("opening angle theta must be non-negative, got {0}")]
    InvalidTheta(f64),
    /// A query point had a NaN or infinite coordinate.
    #[error("query point {index} has a non-finite coordinate ({x}, {y})")]
    InvalidCoordinate {
        /// Position of the offending point in the query batch.
        index: usize,
        /// Its x coordinate.
        x: f64,
        /// Its y coordinate.
        y: f64,
    },
    /// The identity to exclude does not belong to the queried tree.
    #[error("{0:?} is not indexed by this tree")]
    UnknownPoint(PointId),
}
