// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pairtree::{Point, QueryParams, Tree};

use rstar::RTree;

fn gen_grid_points(n: usize, cell: f64) -> Vec<Point> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            // Offset odd rows so the lattice is not perfectly aligned with the splits.
            let shift = if y % 2 == 1 { cell * 0.37 } else { 0.0 };
            out.push(Point::new(x as f64 * cell + shift, y as f64 * cell));
        }
    }
    out
}

fn to_rstar_points(v: &[Point]) -> Vec<[f64; 2]> {
    v.iter().map(|p| [p.x, p.y]).collect()
}

fn bench_radius_counts_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("radius_external_compare_f64");
    for &n in &[64usize, 128] {
        let points = gen_grid_points(n, 1.0);
        let radius = 4.5;
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("pairtree_build_count_n{}", n), |b| {
            b.iter_batched(
                || points.clone(),
                |pts| {
                    let tree = Tree::new(pts).unwrap();
                    let params = QueryParams::new(radius).with_theta(0.0);
                    let total: usize = tree.pair_samples(&params).unwrap().map(|s| s.weight).sum();
                    black_box(total);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_count_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_points(&points),
                |pts| {
                    let tree = RTree::bulk_load(pts.clone());
                    let total: usize = pts
                        .iter()
                        .map(|&p| tree.locate_within_distance(p, radius * radius).count() - 1)
                        .sum();
                    black_box(total);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_radius_counts_f64);
criterion_main!(benches);
