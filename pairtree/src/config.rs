// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction options and query parameters.

use crate::error::{BuildError, QueryError};

/// Opening angle used when none is given.
pub const DEFAULT_THETA: f64 = 0.2;

/// Default split threshold as a fraction of the root extent's larger side (2⁻⁴⁰).
///
/// Nodes whose larger side is at or below this size are not split further and keep
/// all of their points as a degenerate leaf.
pub const DEFAULT_MIN_EXTENT_RATIO: f64 = 1.0 / 1_099_511_627_776.0;

/// Options controlling [`Tree::with_options`](crate::Tree::with_options).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildOptions {
    /// Make the root extent a square anchored at the bounding box's lower-left corner.
    ///
    /// Square cells keep the opening-angle test isotropic. Defaults to `true`.
    pub force_square: bool,
    /// Absolute split threshold. `None` derives it from the root extent using
    /// [`DEFAULT_MIN_EXTENT_RATIO`].
    pub min_extent: Option<f64>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            force_square: true,
            min_extent: None,
        }
    }
}

impl BuildOptions {
    /// Split threshold for a root extent whose larger side is `root_side`.
    pub(crate) fn resolve_min_extent(&self, root_side: f64) -> Result<f64, BuildError> {
        match self.min_extent {
            Some(m) if m.is_finite() && m > 0.0 => Ok(m),
            Some(m) => Err(BuildError::InvalidMinExtent(m)),
            None => {
                let side = root_side.min(f64::MAX);
                Ok((side * DEFAULT_MIN_EXTENT_RATIO).max(f64::MIN_POSITIVE))
            }
        }
    }
}

/// Parameters of a distance/count query.
///
/// ```
/// use pairtree::QueryParams;
///
/// let exact = QueryParams::new(0.5).with_theta(0.0);
/// assert_eq!(exact.theta, 0.0);
/// assert!(QueryParams::new(-1.0).validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueryParams {
    /// Hard cutoff: no sample farther than this is reported. May be infinite.
    pub max_radius: f64,
    /// Opening angle. A subtree of size `s` at distance `d` is aggregated when
    /// `s / d < theta`; `0.0` forces full descent and exact results.
    pub theta: f64,
    /// Drop leaf samples at distance zero regardless of identity.
    pub skip_zero_distance: bool,
}

impl QueryParams {
    /// Parameters with the given radius and [`DEFAULT_THETA`].
    pub const fn new(max_radius: f64) -> Self {
        Self {
            max_radius,
            theta: DEFAULT_THETA,
            skip_zero_distance: false,
        }
    }

    /// Replace the opening angle.
    #[must_use]
    pub const fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Replace the zero-distance policy.
    #[must_use]
    pub const fn with_skip_zero_distance(mut self, skip: bool) -> Self {
        self.skip_zero_distance = skip;
        self
    }

    /// Check the radius and opening angle.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.max_radius.is_nan() || self.max_radius <= 0.0 {
            return Err(QueryError::InvalidRadius(self.max_radius));
        }
        if self.theta.is_nan() || self.theta < 0.0 {
            return Err(QueryError::InvalidTheta(self.theta));
        }
        Ok(())
    }
}
