//! Bar-chart rendering of aggregated ping batches.

pub mod backend;
pub mod chart;
pub mod layout;

pub use backend::verify_backend;
pub use chart::{image_file_name, render_chart};
pub use layout::{layout_for, panel_count, ChartLayout};
