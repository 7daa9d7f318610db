//! Command-line parsing for the COVID trends dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the data/selection code.

use clap::{Parser, Subcommand};

use crate::domain::{Metric, Window};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covid", version, about = "COVID-19 daily case trends in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI dashboard (the default).
    Tui(TuiArgs),
    /// Fetch once, print a summary and an ASCII chart, and exit.
    Show(ShowArgs),
    /// Fetch per-state data and print regions ranked by the latest metric value.
    Regions(RegionsArgs),
}

/// Options for the interactive dashboard.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Metric shown at startup.
    #[arg(short = 'm', long, value_enum, default_value_t = Metric::Positive)]
    pub metric: Metric,

    /// Time window shown at startup.
    #[arg(short = 'w', long, value_enum, default_value_t = Window::All)]
    pub window: Window,

    /// Region code to preselect once per-state data arrives (e.g. WA).
    #[arg(short = 'r', long)]
    pub region: Option<String>,
}

/// Options for one-shot output.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Region code (e.g. WA). Omit to choose interactively; `US` or `all`
    /// selects the national series.
    #[arg(short = 'r', long)]
    pub region: Option<String>,

    /// Metric to display.
    #[arg(short = 'm', long, value_enum, default_value_t = Metric::Positive)]
    pub metric: Metric,

    /// Time window to display.
    #[arg(short = 'w', long, value_enum, default_value_t = Window::All)]
    pub window: Window,

    /// Render an ASCII chart under the summary (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for the region ranking table.
#[derive(Debug, Parser, Clone)]
pub struct RegionsArgs {
    /// Metric to rank by.
    #[arg(short = 'm', long, value_enum, default_value_t = Metric::Positive)]
    pub metric: Metric,

    /// Show the top-N regions.
    #[arg(long, default_value_t = 20)]
    pub top: usize,
}
