//! Terminal plotting.

mod ascii;

pub use ascii::{render_ascii_plot, render_ascii_plot_from_forecast_file};
