//! Shared one-shot pipeline used by the CLI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> series store -> chart view -> summary
//!
//! The CLI handlers can then focus on presentation (printing), and the TUI
//! keeps its own incremental flow driven by the fetch worker.

use crate::data::CovidClient;
use crate::domain::{ALL_REGIONS, ChartView, Metric, NATIONAL_REGION, RegionIndex, Series, Window};
use crate::error::AppError;
use crate::report::{RegionRow, SeriesSummary, rank_regions, summarize};

/// All computed outputs of a single `covid show` run.
#[derive(Debug, Clone)]
pub struct ShowOutput {
    pub label: String,
    pub series: Series,
    pub view: ChartView,
    pub summary: SeriesSummary,
}

/// Does a region selection mean the national series?
pub fn is_national(selection: &str) -> bool {
    selection.eq_ignore_ascii_case(NATIONAL_REGION)
        || selection.eq_ignore_ascii_case("all")
        || selection.eq_ignore_ascii_case(ALL_REGIONS)
}

/// Fetch and derive the requested view in one pass.
pub fn run_show(
    client: &CovidClient,
    region: &str,
    metric: Metric,
    window: Window,
) -> Result<ShowOutput, AppError> {
    if is_national(region) {
        return national_show(client, metric, window);
    }
    let index = client.fetch_regional()?;
    regional_show(&index, region, metric, window)
}

/// Derive the national view.
pub fn national_show(
    client: &CovidClient,
    metric: Metric,
    window: Window,
) -> Result<ShowOutput, AppError> {
    let series = client.fetch_national()?;
    Ok(build_show(ALL_REGIONS, series, metric, window))
}

/// Derive the view for one region out of a fetched index.
pub fn regional_show(
    index: &RegionIndex,
    region: &str,
    metric: Metric,
    window: Window,
) -> Result<ShowOutput, AppError> {
    let name = index
        .names()
        .find(|name| name.eq_ignore_ascii_case(region))
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::usage(format!(
                "Unknown region: {region}. Run `covid regions` to list the {} known codes.",
                index.len()
            ))
        })?;

    // The name came out of the index, so the series is present.
    let series = index.get(&name).cloned().unwrap_or_default();
    Ok(build_show(&name, series, metric, window))
}

/// Rank regions for the `covid regions` table.
pub fn run_regions(client: &CovidClient, metric: Metric) -> Result<Vec<RegionRow>, AppError> {
    let index = client.fetch_regional()?;
    Ok(rank_regions(&index, metric))
}

fn build_show(label: &str, series: Series, metric: Metric, window: Window) -> ShowOutput {
    let view = ChartView::build(&series, metric, window);
    let summary = summarize(label, &series, metric);
    ShowOutput {
        label: label.to_string(),
        series,
        view,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyRecord;
    use chrono::NaiveDate;

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
    fn is_national_accepts_aliases() {
        assert!(is_national("US"));
        assert!(is_national("us"));
        assert!(is_national("all"));
        assert!(is_national(ALL_REGIONS));
        assert!(!is_national("WA"));
    }

    #[test]
    fn regional_show_matches_case_insensitively() {
        let index = RegionIndex::from_records(vec![record(1, 5, "WA"), record(2, 9, "WA")]);

        let output = regional_show(&index, "wa", Metric::Positive, Window::All).unwrap();
        assert_eq!(output.label, "WA");
        assert_eq!(output.view.ys(), &[5.0, 9.0]);
        assert_eq!(output.summary.latest, Some(9));
    }

    #[test]
    fn regional_show_rejects_unknown_region() {
        let index = RegionIndex::from_records(vec![record(1, 5, "WA")]);
        let err = regional_show(&index, "ZZ", Metric::Positive, Window::All).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
