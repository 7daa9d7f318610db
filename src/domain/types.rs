//! Shared domain types.
//!
//! These types are intentionally kept lightweight:
//!
//! - records and series are built once per fetch and replaced wholesale
//! - the chart view is recomputed on every selection change (series are
//!   bounded by days since tracking began, so recomputation is cheap)

use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Region identifier used for the nationwide series.
pub const NATIONAL_REGION: &str = "US";

/// Synthetic first entry of the region display list, mapped back to the
/// national series.
pub const ALL_REGIONS: &str = "All (Nationwide)";

/// Which daily count drives the displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Positive,
    Negative,
    Deaths,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Positive, Metric::Negative, Metric::Deaths];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Positive => "new positive",
            Metric::Negative => "new negative",
            Metric::Deaths => "new deaths",
        }
    }

    /// The record field selected by this metric. No unit conversion.
    pub fn value_of(self, record: &DailyRecord) -> u32 {
        match self {
            Metric::Positive => record.new_positive,
            Metric::Negative => record.new_negative,
            Metric::Deaths => record.new_deaths,
        }
    }

    /// Cycle order used by the TUI metric key.
    pub fn next(self) -> Metric {
        match self {
            Metric::Positive => Metric::Negative,
            Metric::Negative => Metric::Deaths,
            Metric::Deaths => Metric::Positive,
        }
    }
}

impl std::fmt::Display for Metric {
    /// The CLI token form (`positive`, `negative`, `deaths`).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Metric::Positive => "positive",
            Metric::Negative => "negative",
            Metric::Deaths => "deaths",
        })
    }
}

/// How many most-recent days to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Week,
    Month,
    All,
}

impl Window {
    /// Day count for finite windows; `None` means the full series.
    pub fn days(self) -> Option<usize> {
        match self {
            Window::Week => Some(7),
            Window::Month => Some(30),
            Window::All => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Window::Week => "week",
            Window::Month => "month",
            Window::All => "all",
        }
    }

    /// Cycle order used by the TUI window key.
    pub fn next(self) -> Window {
        match self {
            Window::Week => Window::Month,
            Window::Month => Window::All,
            Window::All => Window::Week,
        }
    }
}

impl std::fmt::Display for Window {
    /// The CLI token form (`week`, `month`, `all`).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Window::Week => "week",
            Window::Month => "month",
            Window::All => "all",
        })
    }
}

/// One day's case counts for one region. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub new_positive: u32,
    pub new_negative: u32,
    pub new_deaths: u32,
    pub region: String,
}

/// Chronologically ordered records for one region (or the nation).
///
/// Invariant: dates strictly increasing, no duplicates.
#[derive(Debug, Clone, Default)]
pub struct Series {
    records: Vec<DailyRecord>,
}

impl Series {
    /// Build a series from records in arbitrary order.
    ///
    /// Records are stable-sorted ascending by date; when the source repeats a
    /// date, the first record after sorting wins and the rest are dropped.
    pub fn from_unordered(mut records: Vec<DailyRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        records.dedup_by(|a, b| a.date == b.date);
        Self { records }
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DailyRecord> {
        self.records.get(index)
    }

    pub fn last(&self) -> Option<&DailyRecord> {
        self.records.last()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }
}

/// Region identifier → series, built once from a flat record list.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    by_region: BTreeMap<String, Series>,
}

impl RegionIndex {
    /// Partition a flat record list by region and build one series per group.
    ///
    /// Every source record lands in exactly one partition; partition order
    /// preserves the chronological order of the source.
    pub fn from_records(records: Vec<DailyRecord>) -> Self {
        let by_region = partition_by_region(records)
            .into_iter()
            .map(|(region, group)| (region, Series::from_unordered(group)))
            .collect();
        Self { by_region }
    }

    pub fn get(&self, region: &str) -> Option<&Series> {
        self.by_region.get(region)
    }

    /// Region identifiers in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_region.keys().map(String::as_str)
    }

    /// Names presented to the selection surface: the synthetic all-regions
    /// entry first, then the sorted region identifiers.
    pub fn display_names(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.by_region.len() + 1);
        out.push(ALL_REGIONS.to_string());
        out.extend(self.by_region.keys().cloned());
        out
    }

    pub fn len(&self) -> usize {
        self.by_region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_region.is_empty()
    }
}

/// Group records by region, preserving source order within each group.
fn partition_by_region(records: Vec<DailyRecord>) -> BTreeMap<String, Vec<DailyRecord>> {
    let mut groups: BTreeMap<String, Vec<DailyRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.region.clone()).or_default().push(record);
    }
    groups
}

/// Visible-range start index for a series of `len` records.
///
/// `max(0, len - window_days)` for finite windows, `0` for "all".
pub fn visible_start(len: usize, window: Window) -> usize {
    match window.days() {
        Some(days) => len.saturating_sub(days),
        None => 0,
    }
}

/// A transformed view of a series for the chart surface: one y-value per
/// record plus the visible-range start index.
///
/// An empty series yields an empty view; callers must handle zero-length
/// display without failing.
#[derive(Debug, Clone)]
pub struct ChartView {
    ys: Vec<f64>,
    visible_start: usize,
}

impl ChartView {
    pub fn build(series: &Series, metric: Metric, window: Window) -> Self {
        let ys: Vec<f64> = series
            .records()
            .iter()
            .map(|r| f64::from(metric.value_of(r)))
            .collect();
        let visible_start = visible_start(ys.len(), window);
        Self { ys, visible_start }
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn visible_start(&self) -> usize {
        self.visible_start
    }

    /// The y-values inside the visible window.
    pub fn visible(&self) -> &[f64] {
        &self.ys[self.visible_start..]
    }

    pub fn len(&self) -> usize {
        self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, pos: u32, region: &str) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2021, 3, day).unwrap(),
            new_positive: pos,
            new_negative: pos * 10,
            new_deaths: pos / 2,
            region: region.to_string(),
        }
    }

    #[test]
    fn visible_start_finite_window() {
        assert_eq!(visible_start(100, Window::Week), 93);
        assert_eq!(visible_start(100, Window::Month), 70);
        assert_eq!(visible_start(3, Window::Week), 0);
        assert_eq!(visible_start(0, Window::Week), 0);
    }

    #[test]
    fn visible_start_all_is_zero() {
        for len in [0usize, 1, 7, 30, 1000] {
            assert_eq!(visible_start(len, Window::All), 0);
        }
    }

    #[test]
    fn chart_view_selects_metric_field() {
        let series = Series::from_unordered(vec![
            record(1, 5, "US"),
            record(2, 9, "US"),
            record(3, 2, "US"),
        ]);

        let view = ChartView::build(&series, Metric::Positive, Window::Week);
        assert_eq!(view.visible_start(), 0); // 3 - 7 < 0
        assert_eq!(view.ys(), &[5.0, 9.0, 2.0]);

        let view = ChartView::build(&series, Metric::Negative, Window::All);
        assert_eq!(view.ys(), &[50.0, 90.0, 20.0]);

        let view = ChartView::build(&series, Metric::Deaths, Window::All);
        assert_eq!(view.ys(), &[2.0, 4.0, 1.0]);
    }

    #[test]
    fn chart_view_empty_series() {
        let view = ChartView::build(&Series::default(), Metric::Positive, Window::Month);
        assert!(view.is_empty());
        assert_eq!(view.visible_start(), 0);
        assert!(view.visible().is_empty());
    }

    #[test]
    fn series_sorts_and_drops_duplicate_dates() {
        let series = Series::from_unordered(vec![
            record(3, 2, "US"),
            record(1, 5, "US"),
            record(2, 9, "US"),
            record(2, 7, "US"),
        ]);

        let dates: Vec<u32> = series
            .records()
            .iter()
            .map(|r| r.date.format("%d").to_string().parse().unwrap())
            .collect();
        assert_eq!(dates, vec![1, 2, 3]);
        // First record per date after the stable sort wins.
        assert_eq!(series.get(1).unwrap().new_positive, 9);
    }

    #[test]
    fn partition_is_lossless_and_order_preserving() {
        let source = vec![
            record(1, 1, "WA"),
            record(1, 2, "NY"),
            record(2, 3, "WA"),
            record(2, 4, "NY"),
            record(3, 5, "WA"),
        ];

        let groups = partition_by_region(source.clone());

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, source.len());

        // Each group preserves source order.
        let wa: Vec<u32> = groups["WA"].iter().map(|r| r.new_positive).collect();
        assert_eq!(wa, vec![1, 3, 5]);
        let ny: Vec<u32> = groups["NY"].iter().map(|r| r.new_positive).collect();
        assert_eq!(ny, vec![2, 4]);

        // Re-flattening reproduces a permutation of the source.
        let mut flattened: Vec<DailyRecord> = groups.into_values().flatten().collect();
        let mut expected = source;
        let key = |r: &DailyRecord| (r.region.clone(), r.date, r.new_positive);
        flattened.sort_by_key(key);
        expected.sort_by_key(key);
        assert_eq!(flattened, expected);
    }

    #[test]
    fn display_names_put_synthetic_entry_first() {
        let index = RegionIndex::from_records(vec![
            record(1, 1, "WA"),
            record(1, 2, "AK"),
            record(1, 3, "NY"),
        ]);
        assert_eq!(index.display_names(), vec![ALL_REGIONS, "AK", "NY", "WA"]);
    }

    #[test]
    fn empty_index_has_only_synthetic_entry() {
        let index = RegionIndex::from_records(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.display_names(), vec![ALL_REGIONS]);
        assert!(index.get("WA").is_none());
    }
}
