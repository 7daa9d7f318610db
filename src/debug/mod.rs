//! Debug bundle writer for inspecting the in-memory series store.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::domain::{Metric, RegionIndex, Series, Window, visible_start};
use crate::error::AppError;
use crate::report::summarize;

/// Dump the current session state to a timestamped Markdown file under
/// `debug/`. Returns the path written.
pub fn write_debug_bundle(
    national: Option<&Series>,
    regions: &RegionIndex,
    metric: Metric,
    window: Window,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir).map_err(|e| AppError::data(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("covid_debug_{ts}.md"));

    let mut file =
        File::create(&path).map_err(|e| AppError::data(format!("Failed to create debug file: {e}")))?;

    let mut out = String::new();
    out.push_str("# covid debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- metric: {}\n", metric.display_name()));
    out.push_str(&format!("- window: {}\n", window.display_name()));

    match national {
        Some(series) => {
            out.push_str(&format!(
                "- national: {} day(s), span=[{}, {}], visible_start={}\n",
                series.len(),
                fmt_opt_date(series.first_date()),
                fmt_opt_date(series.last_date()),
                visible_start(series.len(), window),
            ));
        }
        None => out.push_str("- national: (not loaded)\n"),
    }
    out.push_str(&format!("- regions: {}\n", regions.len()));

    out.push_str("\n## National latest\n");
    match national {
        Some(series) if !series.is_empty() => {
            for m in Metric::ALL {
                let summary = summarize("US", series, m);
                out.push_str(&format!(
                    "- {}: latest={}, peak={}, total={}\n",
                    m.display_name(),
                    summary.latest.unwrap_or(0),
                    summary.peak.map(|(_, v)| v).unwrap_or(0),
                    summary.total,
                ));
            }
        }
        _ => out.push_str("- (no data)\n"),
    }

    out.push_str("\n## Regions\n");
    for name in regions.names() {
        let Some(series) = regions.get(name) else {
            continue;
        };
        out.push_str(&format!(
            "- {name}: {} day(s), span=[{}, {}]\n",
            series.len(),
            fmt_opt_date(series.first_date()),
            fmt_opt_date(series.last_date()),
        ));
    }

    file.write_all(out.as_bytes())
        .map_err(|e| AppError::data(format!("Failed to write debug bundle: {e}")))?;

    Ok(path)
}

fn fmt_opt_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}
