//! Benchmark profiles for the Weft workspace engine.
//!
//! Provides pre-built workspace graphs for benchmarking:
//!
//! - [`fan_out_profile`]: one seeded source feeding N gain stages.
//! - [`chain_profile`]: a pipeline of N gain stages in series.
//! - [`table_profile`]: an iterating table driving a pie chart, N columns.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use weft_components::{DataTable, Gain, PieChart, RandomSource};
use weft_core::AttributeRef;
use weft_engine::Workspace;

/// One seeded random source fanned out to `consumers` gain stages.
pub fn fan_out_profile(consumers: usize, seed: u64) -> Workspace {
    let mut ws = Workspace::new();
    ws.add_component(Box::new(RandomSource::new("rng", seed, 0.0, 1.0)))
        .expect("fresh workspace has no name collisions");
    for i in 0..consumers {
        let name = format!("gain{i}");
        ws.add_component(Box::new(Gain::new(&name, 2.0)))
            .expect("generated names are unique");
        ws.couple(
            &AttributeRef::new("rng", "value"),
            &AttributeRef::new(&name, "input"),
        )
        .expect("endpoints were just registered");
    }
    ws
}

/// A chain of `depth` gain stages: rng -> gain0 -> gain1 -> ... Each tick
/// moves every value one stage down the pipeline.
pub fn chain_profile(depth: usize, seed: u64) -> Workspace {
    let mut ws = Workspace::new();
    ws.add_component(Box::new(RandomSource::new("rng", seed, 0.0, 1.0)))
        .expect("fresh workspace has no name collisions");
    let mut upstream = AttributeRef::new("rng", "value");
    for i in 0..depth {
        let name = format!("gain{i}");
        ws.add_component(Box::new(Gain::new(&name, 1.0)))
            .expect("generated names are unique");
        ws.couple(&upstream, &AttributeRef::new(&name, "input"))
            .expect("endpoints were just registered");
        upstream = AttributeRef::new(&name, "output");
    }
    ws
}

/// An iterating `columns`-wide table driving a pie chart slice per column.
pub fn table_profile(columns: usize, rows: usize) -> Workspace {
    let names: Vec<String> = (0..columns).map(|i| format!("c{i}")).collect();
    let borrowed: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut table = DataTable::new("table", &borrowed, rows);
    for (col, name) in names.iter().enumerate() {
        for row in 0..rows {
            table.set(row, name, (row * columns + col) as f64);
        }
    }
    table.set_iterate(true);

    let mut ws = Workspace::new();
    ws.add_component(Box::new(table))
        .expect("fresh workspace has no name collisions");
    ws.add_component(Box::new(PieChart::new("chart", &borrowed)))
        .expect("chart name is unique");
    for name in &names {
        ws.couple(
            &AttributeRef::new("table", name.as_str()),
            &AttributeRef::new("chart", name.as_str()),
        )
        .expect("endpoints were just registered");
    }
    ws
}
