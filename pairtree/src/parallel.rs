// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batched queries fanned out over rayon's thread pool.
//!
//! A built [`Tree`] is immutable, so every worker traverses the same shared tree
//! and produces its own sample list. Results keep query input order.

use alloc::vec::Vec;

use kurbo::Point;
use rayon::prelude::*;

use crate::config::QueryParams;
use crate::error::QueryError;
use crate::query::{DistanceSample, Samples, check_point};
use crate::tree::Tree;
use crate::types::PointId;

impl Tree {
    /// Parallel counterpart of [`Tree::query`].
    pub fn par_query(
        &self,
        points: &[Point],
        params: &QueryParams,
    ) -> Result<Vec<Vec<DistanceSample>>, QueryError> {
        params.validate()?;
        for (index, &p) in points.iter().enumerate() {
            check_point(index, p)?;
        }
        let out: Vec<Vec<DistanceSample>> = points
            .par_iter()
            .map(|&q| Samples::new(self, q, None, params).collect())
            .collect();
        log::debug!("parallel query over {} points", out.len());
        Ok(out)
    }

    /// Parallel counterpart of [`Tree::query_self`].
    pub fn par_query_self(
        &self,
        params: &QueryParams,
    ) -> Result<Vec<Vec<DistanceSample>>, QueryError> {
        params.validate()?;
        let out: Vec<Vec<DistanceSample>> = (0..self.len())
            .into_par_iter()
            .map(|i| self.self_samples(PointId::new(i), params).collect())
            .collect();
        log::debug!("parallel self-query over {} points", out.len());
        Ok(out)
    }
}
