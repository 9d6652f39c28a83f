// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Priority index basics.
//!
//! Queue a few candidates by cost, including ties, and serve them cheapest first.
//!
//! Run:
//! - `cargo run -p quadpress_demos --example priority_index_basics`

use quadpress_index::PriorityIndex;

fn main() {
    let mut idx: PriorityIndex<f64, &str> = PriorityIndex::new();
    for (cost, name) in [
        (1.5, "alpha"),
        (0.25, "beta"),
        (3.0, "gamma"),
        (0.25, "delta"),
        (0.75, "epsilon"),
    ] {
        idx.insert(cost, name);
    }
    println!(
        "{} entries under {} keys, tree height {}",
        idx.len(),
        idx.key_count(),
        idx.height()
    );

    // "delta" was queued after "beta" under the same cost, so it comes out first.
    println!("cheapest: {:?}", idx.find_min());

    // Removing by key takes the newest entry under that key; unknown keys are ignored.
    println!("remove(3.0) -> {:?}", idx.remove(3.0));
    println!("remove(9.9) -> {:?}", idx.remove(9.9));

    while let Some((cost, name)) = idx.pop_min() {
        println!("  {cost:>5.2} {name}");
    }
}
