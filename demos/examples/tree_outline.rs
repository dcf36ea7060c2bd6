// Copyright 2025 the Pairtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree outline.
//!
//! Build a small tree, print its text dump, then collect the occupied boxes and
//! leaf positions a renderer would draw.
//!
//! Run:
//! - `cargo run -p pairtree_demos --example tree_outline`

use kurbo::Rect;
use pairtree::walk::{depth_first, outline};
use pairtree::{BuildOptions, Tree};

fn main() {
    let points = [
        (0.1, 0.1),
        (0.15, 0.12),
        (0.9, 0.8),
        (0.4, 0.6),
        (0.4, 0.6),
        (0.7, 0.05),
    ];
    let tree = Tree::new(points).unwrap();
    print!("{tree}");

    let o = outline(tree.root());
    println!("{} boxes, {} leaves", o.extents.len(), o.leaf_positions.len());
    for node in depth_first(tree.root()) {
        let r: Rect = node.extent().into();
        println!(
            "{:indent$}depth {} count {} box {:?}",
            "",
            node.depth(),
            node.count(),
            r,
            indent = node.depth() * 2
        );
    }
    assert_eq!(o.extents.len(), tree.node_count());

    // Keep the bounding box's aspect ratio instead of squaring it.
    let native = Tree::with_options(
        points,
        BuildOptions {
            force_square: false,
            ..BuildOptions::default()
        },
    )
    .unwrap();
    let e = native.extent();
    println!("native extent {} x {}", e.width(), e.height());
}
