// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Quadpress Index: insert costs, inspect the minimum, drain.

use quadpress_index::PriorityIndex;

fn main() {
    let mut idx: PriorityIndex<f64, &str> = PriorityIndex::new();
    idx.insert(0.2, "north");
    idx.insert(0.5, "east");
    idx.insert(0.1, "south");
    idx.insert(0.1, "west");

    // Equal costs: the newest candidate comes out first.
    println!("min: {:?}", idx.find_min());
    println!("height: {}, keys: {}", idx.height(), idx.key_count());

    while let Some((cost, name)) = idx.pop_min() {
        println!("{cost:.2} {name}");
    }
}
