// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quadpress_index::{Backend, PriorityIndex, PriorityIndexGeneric};

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

/// Epsilon-like keys: many distinct values with a sprinkling of exact ties.
fn gen_keys(count: usize, seed: u64) -> Vec<f64> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            if rng.next_u64() % 8 == 0 {
                0.1
            } else {
                rng.next_f64() * 255.0
            }
        })
        .collect()
}

fn fill_and_drain<B: Backend<f64, u32>>(mut idx: PriorityIndexGeneric<f64, u32, B>, keys: &[f64]) {
    for (i, k) in keys.iter().copied().enumerate() {
        idx.insert(k, i as u32);
    }
    let mut sum = 0_u64;
    while let Some((_, v)) = idx.pop_min() {
        sum += u64::from(v);
    }
    black_box(sum);
}

/// Pop the minimum and push a couple of successors, the shape of a greedy merge loop.
fn greedy_churn<B: Backend<f64, u32>>(mut idx: PriorityIndexGeneric<f64, u32, B>, keys: &[f64]) {
    let (seed, rest) = keys.split_at(keys.len() / 2);
    for (i, k) in seed.iter().copied().enumerate() {
        idx.insert(k, i as u32);
    }
    for (i, k) in rest.iter().copied().enumerate() {
        if let Some((min, _)) = idx.pop_min() {
            idx.insert(min + k, i as u32);
        }
    }
    black_box(idx.len());
}

fn bench_fill_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_and_drain");
    for &n in &[256usize, 4096, 32768] {
        let keys = gen_keys(n, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("avl_n{}", n), |b| {
            b.iter_batched(
                PriorityIndex::<f64, u32>::new,
                |idx| fill_and_drain(idx, &keys),
                BatchSize::SmallInput,
            )
        });
        if n <= 4096 {
            group.bench_function(format!("sorted_vec_n{}", n), |b| {
                b.iter_batched(
                    PriorityIndex::<f64, u32>::with_sorted_vec,
                    |idx| fill_and_drain(idx, &keys),
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_greedy_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("greedy_churn");
    for &n in &[1024usize, 16384] {
        let keys = gen_keys(n, 0xBADC_F00D_1234_5678);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("avl_n{}", n), |b| {
            b.iter_batched(
                PriorityIndex::<f64, u32>::new,
                |idx| greedy_churn(idx, &keys),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("sorted_vec_n{}", n), |b| {
            b.iter_batched(
                PriorityIndex::<f64, u32>::with_sorted_vec,
                |idx| greedy_churn(idx, &keys),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fill_and_drain, bench_greedy_churn);
criterion_main!(benches);
