//! Reporting utilities: series summaries, region rankings, and formatted
//! terminal output.
//!
//! We keep formatting code in one place so:
//! - the data/selection code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use chrono::NaiveDate;

use crate::domain::{Metric, RegionIndex, Series};

pub mod format;

pub use format::*;

/// Per-series figures for one metric.
#[derive(Debug, Clone)]
pub struct SeriesSummary {
    pub label: String,
    pub n_days: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub latest: Option<u32>,
    pub peak: Option<(NaiveDate, u32)>,
    pub total: u64,
}

/// Compute summary figures for a series under the chosen metric.
pub fn summarize(label: &str, series: &Series, metric: Metric) -> SeriesSummary {
    let mut peak: Option<(NaiveDate, u32)> = None;
    let mut total: u64 = 0;

    for record in series.records() {
        let value = metric.value_of(record);
        total += u64::from(value);
        if peak.is_none_or(|(_, best)| value > best) {
            peak = Some((record.date, value));
        }
    }

    SeriesSummary {
        label: label.to_string(),
        n_days: series.len(),
        first_date: series.first_date(),
        last_date: series.last_date(),
        latest: series.last().map(|r| metric.value_of(r)),
        peak,
        total,
    }
}

/// One row of the region ranking table.
#[derive(Debug, Clone)]
pub struct RegionRow {
    pub region: String,
    pub latest: u32,
    pub latest_date: Option<NaiveDate>,
    pub total: u64,
}

/// Rank regions by the latest value of the chosen metric, descending.
/// Ties keep lexicographic region order.
pub fn rank_regions(index: &RegionIndex, metric: Metric) -> Vec<RegionRow> {
    let mut rows: Vec<RegionRow> = index
        .names()
        .filter_map(|region| {
            let series = index.get(region)?;
            let summary = summarize(region, series, metric);
            Some(RegionRow {
                region: region.to_string(),
                latest: summary.latest.unwrap_or(0),
                latest_date: summary.last_date,
                total: summary.total,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.latest.cmp(&a.latest).then_with(|| a.region.cmp(&b.region)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyRecord;

    fn record(day: u32, pos: u32, region: &str) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2021, 3, day).unwrap(),
            new_positive: pos,
            new_negative: 0,
            new_deaths: 0,
            region: region.to_string(),
        }
    }

    #[test]
    fn summarize_basic() {
        let series = Series::from_unordered(vec![
            record(1, 5, "US"),
            record(2, 9, "US"),
            record(3, 2, "US"),
        ]);
        let summary = summarize("US", &series, Metric::Positive);

        assert_eq!(summary.n_days, 3);
        assert_eq!(summary.latest, Some(2));
        assert_eq!(
            summary.peak,
            Some((NaiveDate::from_ymd_opt(2021, 3, 2).unwrap(), 9))
        );
        assert_eq!(summary.total, 16);
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2021, 3, 1));
        assert_eq!(summary.last_date, NaiveDate::from_ymd_opt(2021, 3, 3));
    }

    #[test]
    fn summarize_empty_series() {
        let summary = summarize("US", &Series::default(), Metric::Deaths);
        assert_eq!(summary.n_days, 0);
        assert_eq!(summary.latest, None);
        assert_eq!(summary.peak, None);
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn rank_regions_orders_by_latest_desc() {
        let index = RegionIndex::from_records(vec![
            record(1, 3, "WA"),
            record(2, 8, "WA"),
            record(1, 20, "NY"),
            record(2, 4, "NY"),
            record(2, 8, "AK"),
        ]);

        let rows = rank_regions(&index, Metric::Positive);
        let regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
        // WA and AK tie on latest=8; ties keep lexicographic order.
        assert_eq!(regions, vec!["AK", "WA", "NY"]);
        assert_eq!(rows[2].latest, 4);
        assert_eq!(rows[2].total, 24);
    }
}
