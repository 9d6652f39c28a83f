// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compress a PGM image both ways.
//!
//! Reads a plain (`P2`) PGM image, then runs lambda compression and rho
//! compression on two fresh trees. Each result is written next to the input as
//! an image (`Lambda-<name>.pgm`, `RHO-<name>.pgm`) and as the tree's text form
//! (`.txt`).
//!
//! Run:
//! - `cargo run -p quadpress_demos --example compress_pgm -- image.pgm 30`

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use quadpress_tree::pgm::{parse_pgm, write_pgm};
use quadpress_tree::{Compression, CompressionStats, QuadTree, Rho};

fn output_path(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{prefix}-{stem}.{extension}"))
}

fn run(
    input: &Path,
    label: &str,
    base: &QuadTree,
    mode: Compression,
) -> anyhow::Result<CompressionStats> {
    let mut tree = base.clone();
    let start = Instant::now();
    let stats = tree.compress(mode);
    let elapsed = start.elapsed();
    println!(
        "{label}: {} -> {} nodes ({:.1}%), {} merges, {} cascades, {elapsed:?}",
        stats.initial_nodes,
        stats.final_nodes,
        stats.ratio() * 100.0,
        stats.merges,
        stats.cascades,
    );

    let image = output_path(input, label, "pgm");
    std::fs::write(&image, write_pgm(&tree.render()))
        .with_context(|| format!("writing {}", image.display()))?;
    let text = output_path(input, label, "txt");
    std::fs::write(&text, tree.serialize())
        .with_context(|| format!("writing {}", text.display()))?;
    Ok(stats)
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [path, rho] = args.as_slice() else {
        bail!("usage: compress_pgm <image.pgm> <rho 1..=100>");
    };
    let rho: u32 = rho.parse().with_context(|| format!("rho {rho:?} is not a number"))?;
    let rho = Rho::new(rho)?;

    let input = Path::new(path);
    let text =
        std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let grid = parse_pgm(&text).with_context(|| format!("parsing {}", input.display()))?;

    let start = Instant::now();
    let tree = QuadTree::build(&grid);
    println!(
        "built {}x{} image into {} nodes in {:?}",
        grid.side(),
        grid.side(),
        tree.node_count(),
        start.elapsed()
    );

    run(input, "Lambda", &tree, Compression::Lambda)?;
    run(input, "RHO", &tree, Compression::Rho(rho))?;
    Ok(())
}
