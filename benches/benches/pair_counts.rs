// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pairtree::{Point, QueryParams, Tree};
use pairtree_histogram::{BinEdges, Histogram};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_uniform_points(count: usize, side: f64, seed: u64) -> Vec<Point> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| Point::new(rng.next_f64() * side, rng.next_f64() * side))
        .collect()
}

/// Points scattered around a handful of cluster centers.
fn gen_clustered_points(count: usize, clusters: usize, spread: f64, seed: u64) -> Vec<Point> {
    let mut rng = Rng::new(seed);
    let centers = gen_uniform_points(clusters, 1.0, seed ^ 0x5555);
    (0..count)
        .map(|i| {
            let c = centers[i % clusters];
            Point::new(
                c.x + (rng.next_f64() - 0.5) * spread,
                c.y + (rng.next_f64() - 0.5) * spread,
            )
        })
        .collect()
}

fn brute_pair_count(points: &[Point], r: f64) -> usize {
    let r2 = r * r;
    let mut n = 0;
    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate() {
            if i != j && (*a - *b).hypot2() <= r2 {
                n += 1;
            }
        }
    }
    n
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000usize, 10_000, 100_000] {
        let points = gen_uniform_points(n, 1.0, 0xC0FFEE);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("uniform_n{}", n), |b| {
            b.iter_batched(
                || points.clone(),
                |pts| {
                    let tree = Tree::new(pts).unwrap();
                    black_box(tree.node_count());
                },
                BatchSize::LargeInput,
            )
        });
    }
    let clustered = gen_clustered_points(10_000, 8, 0.02, 0xBEEF);
    group.throughput(Throughput::Elements(clustered.len() as u64));
    group.bench_function("clustered_n10000", |b| {
        b.iter_batched(
            || clustered.clone(),
            |pts| {
                let tree = Tree::new(pts).unwrap();
                black_box(tree.depth());
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_self_query_by_theta(c: &mut Criterion) {
    let mut group = c.benchmark_group("self_query_theta");
    let points = gen_uniform_points(5_000, 1.0, 0xDEADBEEF);
    let tree = Tree::new(points.iter().copied()).unwrap();
    group.throughput(Throughput::Elements(points.len() as u64));
    for &theta in &[0.0, 0.2, 0.5, 1.0] {
        let params = QueryParams::new(0.1).with_theta(theta);
        group.bench_function(format!("theta_{}", theta), |b| {
            b.iter(|| {
                let total: usize = tree.pair_samples(&params).unwrap().map(|s| s.weight).sum();
                black_box(total);
            })
        });
    }
    group.finish();
}

fn bench_against_brute_force(c: &mut Criterion) {
    let mut group = c.benchmark_group("pair_count_vs_brute");
    for &n in &[500usize, 2_000] {
        let points = gen_uniform_points(n, 1.0, 0xFACE);
        let tree = Tree::new(points.iter().copied()).unwrap();
        let params = QueryParams::new(0.05).with_theta(0.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("tree_exact_n{}", n), |b| {
            b.iter(|| {
                let total: usize = tree.pair_samples(&params).unwrap().map(|s| s.weight).sum();
                black_box(total);
            })
        });
        group.bench_function(format!("brute_n{}", n), |b| {
            b.iter(|| black_box(brute_pair_count(&points, 0.05)))
        });
    }
    group.finish();
}

fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("pair_histogram");
    let points = gen_clustered_points(5_000, 12, 0.05, 0xABCD);
    let tree = Tree::new(points.iter().copied()).unwrap();
    let edges = BinEdges::linear(0.0, 0.2, 40).unwrap();
    let params = QueryParams::new(0.2);
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("clustered_n5000_default_theta", |b| {
        b.iter(|| {
            let hist = Histogram::from_pairs(&tree, &params, edges.clone()).unwrap();
            black_box(hist.density());
        })
    });
    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_parallel_self_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("self_query_parallel");
    let points = gen_uniform_points(20_000, 1.0, 0x1234);
    let tree = Tree::new(points.iter().copied()).unwrap();
    let params = QueryParams::new(0.05);
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("sequential_n20000", |b| {
        b.iter(|| black_box(tree.query_self(&params).unwrap().len()))
    });
    group.bench_function("rayon_n20000", |b| {
        b.iter(|| black_box(tree.par_query_self(&params).unwrap().len()))
    });
    group.finish();
}

#[cfg(not(feature = "parallel"))]
fn bench_parallel_self_query(_c: &mut Criterion) {}

criterion_group!(
    benches,
    bench_build,
    bench_self_query_by_theta,
    bench_against_brute_force,
    bench_histogram,
    bench_parallel_self_query
);
criterion_main!(benches);
