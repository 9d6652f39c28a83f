// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quadpress_tree::{Grid, QuadTree};

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
}

/// A smooth diagonal ramp with light noise and a few flat patches, loosely photo-like.
fn gen_image(side: usize, seed: u64) -> Grid {
    let mut rng = Rng::new(seed);
    let mut samples = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let flat = (row / 32 + col / 32) % 5 == 0;
            let v = if flat {
                128
            } else {
                let ramp = (row + col) * 255 / (2 * side);
                let noise = (rng.next_u64() % 9) as usize;
                (ramp + noise).min(255)
            };
            samples.push(v as u32);
        }
    }
    Grid::new(side, samples, 255).expect("generated image is valid")
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &side in &[64usize, 256, 512] {
        let image = gen_image(side, 0xC1A5_7E55_9999_ABCD);
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_function(format!("side{}", side), |b| {
            b.iter(|| black_box(QuadTree::build(&image).node_count()))
        });
    }
    group.finish();
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for &side in &[64usize, 256] {
        let tree = QuadTree::build(&gen_image(side, 0xFACE_FEED_CAFE_BABE));
        group.throughput(Throughput::Elements(tree.node_count() as u64));
        group.bench_function(format!("lambda_side{}", side), |b| {
            b.iter_batched(
                || tree.clone(),
                |mut t| black_box(t.lambda_compress()),
                BatchSize::LargeInput,
            )
        });
        for rho in [75, 25, 5] {
            group.bench_function(format!("rho{}_side{}", rho, side), |b| {
                b.iter_batched(
                    || tree.clone(),
                    |mut t| black_box(t.rho_compress(rho).expect("valid rho")),
                    BatchSize::LargeInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let mut tree = QuadTree::build(&gen_image(512, 0xDEAD_BEEF));
    tree.rho_compress(20).expect("valid rho");
    group.throughput(Throughput::Elements(512 * 512));
    group.bench_function("side512_rho20", |b| b.iter(|| black_box(tree.render())));
    group.bench_function("serialize_side512_rho20", |b| {
        b.iter(|| black_box(tree.serialize().len()))
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_compress, bench_render);
criterion_main!(benches);
