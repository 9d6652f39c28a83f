// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree basics.
//!
//! Build a tree from a small grid, inspect it, merge its twigs, and render it back.
//!
//! Run:
//! - `cargo run -p quadpress_demos --example tree_basics`

use kurbo::Point;
use quadpress_tree::QuadTree;

fn main() -> anyhow::Result<()> {
    let rows = [
        [12, 12, 12, 12, 90, 91, 30, 30],
        [12, 12, 12, 12, 92, 90, 30, 30],
        [12, 12, 12, 12, 30, 30, 30, 30],
        [12, 12, 12, 12, 30, 30, 30, 30],
        [70, 70, 71, 70, 5, 5, 5, 5],
        [70, 70, 70, 70, 5, 5, 5, 5],
        [70, 70, 70, 70, 5, 5, 0, 9],
        [70, 70, 70, 70, 5, 5, 9, 0],
    ];
    let mut tree = QuadTree::from_rows(&rows, 255)?;
    println!("nodes after build: {}", tree.node_count());
    println!("tree: {tree}");

    // Every leaf covers a square of the image.
    for (rect, value) in tree.leaf_regions() {
        println!("  {value:>3} over {rect:?}");
    }
    println!("value at (4.5, 0.5): {:?}", tree.value_at(Point::new(4.5, 0.5)));

    let stats = tree.lambda_compress();
    println!(
        "lambda: {} -> {} nodes ({} merges, worst error {:.3})",
        stats.initial_nodes, stats.final_nodes, stats.merges, stats.max_epsilon
    );
    println!("tree: {tree}");

    for row in tree.render().rows() {
        println!("  {row:?}");
    }
    tree.validate()?;
    Ok(())
}
