// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported when validating bin edges.

use thiserror::Error;

/// Reasons a set of bin edges is rejected.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum HistogramError {
    /// Fewer than two edges, so not even one bin.
    #[error("need at least two bin edges, got {0}")]
    TooFewEdges(usize),
    /// An edge was NaN or infinite.
    #[error("bin edge {0} is not finite")]
    NonFiniteEdge(f64),
    /// The same edge appeared twice, which would make an empty bin.
    #[error("bin edge {0} appears more than once")]
    DuplicateEdge(f64),
}
