//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - the metric series: `-` line
//! - the latest day: `o`

use crate::domain::{ChartView, Series};
use crate::report::format_date;

/// Render the visible window of a chart view as a fixed-size ASCII chart.
pub fn render_ascii_chart(series: &Series, view: &ChartView, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let ys = view.visible();
    if ys.is_empty() {
        return "Plot: no data\n".to_string();
    }

    let (y_min, y_max) = y_range(ys).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    draw_series(&mut grid, ys, y_min, y_max);

    // Mark the latest day (the scrub default in the TUI).
    let last_x = map_x(ys.len() - 1, ys.len(), width);
    let last_y = map_y(ys[ys.len() - 1], y_min, y_max, height);
    grid[last_y][last_x] = 'o';

    // Build final string. We include a small header with ranges.
    let start = view.visible_start();
    let first_date = series.get(start).map(|r| format_date(r.date));
    let last_date = series.last().map(|r| format_date(r.date));
    let mut out = String::new();
    match (first_date, last_date) {
        (Some(first), Some(last)) => {
            out.push_str(&format!(
                "Plot: {} day(s) [{first} .. {last}] | y=[{y_min:.2}, {y_max:.2}]\n",
                ys.len(),
            ));
        }
        _ => {
            out.push_str(&format!(
                "Plot: {} day(s) | y=[{y_min:.2}, {y_max:.2}]\n",
                ys.len(),
            ));
        }
    }

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn y_range(ys: &[f64]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &y in ys {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(index: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = (index as f64 / (n as f64 - 1.0)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_series(grid: &mut [Vec<char>], ys: &[f64], y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for (i, &y) in ys.iter().enumerate() {
        let x = map_x(i, ys.len(), width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DailyRecord, Metric, Window};
    use chrono::NaiveDate;

    fn record(day: u32, pos: u32) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2021, 3, day).unwrap(),
            new_positive: pos,
            new_negative: 0,
            new_deaths: 0,
            region: "US".to_string(),
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let series = Series::from_unordered(vec![record(1, 5), record(2, 9), record(3, 2)]);
        let view = ChartView::build(&series, Metric::Positive, Window::All);

        let txt = render_ascii_chart(&series, &view, 10, 5);
        let expected = concat!(
            "Plot: 3 day(s) [Mar 01, 2021 .. Mar 03, 2021] | y=[1.65, 9.35]\n",
            "    --    \n",
            "  --  -   \n",
            "--     -  \n",
            "        - \n",
            "         o\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn plot_empty_view() {
        let series = Series::default();
        let view = ChartView::build(&series, Metric::Positive, Window::All);
        assert_eq!(
            render_ascii_chart(&series, &view, 40, 10),
            "Plot: no data\n"
        );
    }

    #[test]
    fn plot_windows_to_visible_range() {
        // 10 days, week window -> only the last 7 appear in the header count.
        let records: Vec<DailyRecord> = (1..=10).map(|d| record(d, d * 10)).collect();
        let series = Series::from_unordered(records);
        let view = ChartView::build(&series, Metric::Positive, Window::Week);

        let txt = render_ascii_chart(&series, &view, 40, 10);
        assert!(txt.starts_with("Plot: 7 day(s) [Mar 04, 2021 .. Mar 10, 2021]"));
    }
}
