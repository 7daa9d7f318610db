//! Terminal plotting for one-shot output.

pub mod ascii;

pub use ascii::render_ascii_chart;
