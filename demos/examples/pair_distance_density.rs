// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pair-distance density.
//!
//! Scatter points in a few tight clusters, estimate the density of pair distances
//! with the default opening angle, and print it next to the exact answer.
//!
//! Run:
//! - `cargo run -p pairtree_demos --example pair_distance_density`

use kurbo::Point;
use pairtree::{QueryParams, Tree};
use pairtree_histogram::{BinEdges, Histogram};

fn clustered(count: usize) -> Vec<Point> {
    let centers = [
        Point::new(0.2, 0.3),
        Point::new(0.7, 0.8),
        Point::new(0.8, 0.2),
    ];
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    let mut unit = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..count)
        .map(|i| {
            let c = centers[i % centers.len()];
            Point::new(c.x + (unit() - 0.5) * 0.1, c.y + (unit() - 0.5) * 0.1)
        })
        .collect()
}

fn main() {
    let points = clustered(3_000);
    let tree = Tree::new(points.iter().copied()).unwrap();
    println!(
        "{} points, {} nodes, depth {}",
        tree.len(),
        tree.node_count(),
        tree.depth()
    );

    let edges = BinEdges::linear(0.0, 1.0, 20).unwrap();
    let exact = Histogram::from_pairs(
        &tree,
        &QueryParams::new(1.0).with_theta(0.0),
        edges.clone(),
    )
    .unwrap();
    let approx = Histogram::from_pairs(&tree, &QueryParams::new(1.0), edges).unwrap();

    println!("{:>12} {:>10} {:>10}", "bin", "exact", "theta=0.2");
    let lower = exact.edges().as_slice();
    for (i, (e, a)) in exact.density().iter().zip(approx.density()).enumerate() {
        println!(
            "[{:.2}, {:.2}) {:>10.4} {:>10.4}",
            lower[i],
            lower[i + 1],
            e,
            a
        );
    }
    println!(
        "pairs within range: exact {}, approximate {}",
        exact.total_weight(),
        approx.total_weight()
    );
    // Every pair is seen from both ends, so exact bins hold even counts.
    assert!(exact.counts().iter().all(|c| c % 2 == 0), "pairs counted once");
    assert_eq!(exact.dropped_weight(), 0, "samples beyond the radius");
}
