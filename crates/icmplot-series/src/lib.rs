//! Aggregation of flat probe-record batches into a plottable layout.

pub mod aggregate;
pub mod error;
pub mod load;

pub use aggregate::{prepare_plot_data, PlotData};
pub use error::SeriesError;
pub use load::load_records;
