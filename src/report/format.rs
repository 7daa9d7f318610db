//! Text formatting for terminal output.

use chrono::NaiveDate;

use crate::domain::{Metric, Window};
use crate::report::{RegionRow, SeriesSummary};

/// Format the `covid show` summary block.
pub fn format_show_summary(summary: &SeriesSummary, metric: Metric, window: Window) -> String {
    let mut out = String::new();

    out.push_str("=== covid — daily case trends ===\n");
    out.push_str(&format!("Region: {}\n", summary.label));
    out.push_str(&format!("Metric: {}\n", metric.display_name()));
    out.push_str(&format!("Window: {}\n", window.display_name()));

    match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => {
            out.push_str(&format!(
                "Days: {} | span=[{}, {}]\n",
                summary.n_days,
                format_date(first),
                format_date(last),
            ));
        }
        _ => {
            out.push_str("Days: 0\n");
        }
    }

    if let Some(latest) = summary.latest {
        out.push_str(&format!("Latest: {}\n", format_count(u64::from(latest))));
    }
    if let Some((date, value)) = summary.peak {
        out.push_str(&format!(
            "Peak: {} on {}\n",
            format_count(u64::from(value)),
            format_date(date),
        ));
    }
    out.push_str(&format!("Total: {}\n", format_count(summary.total)));

    out
}

/// Format the region ranking table.
pub fn format_region_table(rows: &[RegionRow], metric: Metric, top: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Regions by latest {} (top {}):\n",
        metric.display_name(),
        top.min(rows.len()),
    ));
    out.push_str(&format!(
        "{:<8} {:>14} {:>14} {:<14}\n",
        "region", "latest", "total", "as of"
    ));
    out.push_str(&format!("{:-<8} {:-<14} {:-<14} {:-<14}\n", "", "", "", ""));

    for row in rows.iter().take(top) {
        let as_of = row
            .latest_date
            .map(format_date)
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<8} {:>14} {:>14} {:<14}\n",
            truncate(&row.region, 8),
            format_count(u64::from(row.latest)),
            format_count(row.total),
            as_of,
        ));
    }

    out
}

/// Format a count with thousands separators (`1234567` → `1,234,567`).
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Compact count for axis labels (`1234567.0` → `1.2M`).
pub fn format_count_compact(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

/// Dates as e.g. `Mar 07, 2021`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DailyRecord, Series};
    use crate::report::summarize;

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(45_312), "45,312");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn format_count_compact_scales() {
        assert_eq!(format_count_compact(312.0), "312");
        assert_eq!(format_count_compact(45_300.0), "45.3k");
        assert_eq!(format_count_compact(1_200_000.0), "1.2M");
        assert_eq!(format_count_compact(0.0), "0");
    }

    #[test]
    fn format_date_style() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
        assert_eq!(format_date(date), "Mar 07, 2021");
    }

    #[test]
    fn show_summary_contains_key_lines() {
        let series = Series::from_unordered(vec![
            DailyRecord {
                date: NaiveDate::from_ymd_opt(2021, 3, 6).unwrap(),
                new_positive: 45_312,
                new_negative: 0,
                new_deaths: 0,
                region: "US".to_string(),
            },
            DailyRecord {
                date: NaiveDate::from_ymd_opt(2021, 3, 7).unwrap(),
                new_positive: 41_265,
                new_negative: 0,
                new_deaths: 0,
                region: "US".to_string(),
            },
        ]);
        let summary = summarize("US", &series, Metric::Positive);
        let text = format_show_summary(&summary, Metric::Positive, Window::All);

        assert!(text.contains("Region: US"));
        assert!(text.contains("Metric: new positive"));
        assert!(text.contains("Latest: 41,265"));
        assert!(text.contains("Peak: 45,312 on Mar 06, 2021"));
        assert!(text.contains("Total: 86,577"));
    }

    #[test]
    fn region_table_truncates_to_top() {
        let rows = vec![
            RegionRow {
                region: "NY".to_string(),
                latest: 100,
                latest_date: NaiveDate::from_ymd_opt(2021, 3, 7),
                total: 1_000,
            },
            RegionRow {
                region: "WA".to_string(),
                latest: 50,
                latest_date: NaiveDate::from_ymd_opt(2021, 3, 7),
                total: 500,
            },
        ];
        let text = format_region_table(&rows, Metric::Deaths, 1);
        assert!(text.contains("NY"));
        assert!(!text.contains("WA"));
    }
}
