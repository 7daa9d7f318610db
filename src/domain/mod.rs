//! Domain types used throughout the application.
//!
//! This module defines:
//!
//! - selection enums (`Metric`, `Window`)
//! - daily observation records (`DailyRecord`) and ordered series (`Series`)
//! - the per-region index (`RegionIndex`)
//! - the derived chart view (`ChartView`)

pub mod types;

pub use types::*;
