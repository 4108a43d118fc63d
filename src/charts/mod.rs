//! Charts module - Chart rendering

mod plotter;

pub use plotter::{format_percent, format_rate, BarColors, ChartPlotter, BAR_COLOR, PLASMA, REDS};
