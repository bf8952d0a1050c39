//! Reference components for the Weft workspace engine.
//!
//! Four components that exercise the full coupling surface:
//!
//! - [`DataTable`] — tabular data with per-column attributes, row
//!   iteration, and round-buffered writes.
//! - [`RandomSource`] — seeded uniform random producer.
//! - [`Gain`] — minimal consumer-to-producer pass-through.
//! - [`PieChart`] — write-only sink with per-slice attributes, fractions
//!   recomputed once per round.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod data_table;
pub mod gain;
pub mod pie_chart;
pub mod random_source;

pub use data_table::DataTable;
pub use gain::Gain;
pub use pie_chart::PieChart;
pub use random_source::RandomSource;

use weft_archive::OpenerRegistry;

/// Register openers for all four reference component types.
pub fn register_openers(registry: &mut OpenerRegistry) {
    registry.register("data_table", DataTable::open);
    registry.register("random_source", RandomSource::open);
    registry.register("gain", Gain::open);
    registry.register("pie_chart", PieChart::open);
}
