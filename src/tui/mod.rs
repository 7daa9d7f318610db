//! Ratatui-based terminal UI.
//!
//! The TUI renders the active series as a line chart with a scrubbable
//! readout, a region list for switching series, and single-key cycles for
//! the metric and time window.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::cli::TuiArgs;
use crate::data::{CovidClient, FetchResponse, spawn_fetch};
use crate::domain::{
    ALL_REGIONS, ChartView, Metric, RegionIndex, Series, Window, visible_start,
};
use crate::error::AppError;
use crate::report::{format_count, format_count_compact, format_date};

mod plotters_chart;

use plotters_chart::TrendChart;

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::data(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::data(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::data(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    client: CovidClient,
    tx: Sender<FetchResponse>,
    rx: Receiver<FetchResponse>,

    // Session state: replaced wholesale when a fetch completes.
    national: Option<Series>,
    regions: RegionIndex,

    // Selection surface.
    region_names: Vec<String>,
    selected_region: usize,
    pending_region: Option<String>,

    metric: Metric,
    window: Window,
    /// Scrub cursor as an index into the active series; `None` means the
    /// latest record.
    scrub: Option<usize>,

    status: String,
}

impl App {
    fn new(args: TuiArgs) -> Self {
        let client = CovidClient::from_env();
        let (tx, rx) = mpsc::channel();
        spawn_fetch(&client, &tx);

        Self {
            client,
            tx,
            rx,
            national: None,
            regions: RegionIndex::default(),
            region_names: vec![ALL_REGIONS.to_string()],
            selected_region: 0,
            pending_region: args.region,
            metric: args.metric,
            window: args.window,
            scrub: None,
            status: "Fetching national and per-state data...".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.drain_fetches() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::data(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::data(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::data(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply completed fetches on the rendering thread.
    ///
    /// A failed fetch only updates the status line; the current display is
    /// left unchanged. The two feeds arrive independently.
    fn drain_fetches(&mut self) -> bool {
        let mut changed = false;
        while let Ok(response) = self.rx.try_recv() {
            changed = true;
            match response {
                FetchResponse::National(Ok(series)) => {
                    self.status = format!("National data: {} day(s).", series.len());
                    self.national = Some(series);
                    if self.selected_region == 0 {
                        self.scrub = None;
                    }
                }
                FetchResponse::National(Err(err)) => {
                    self.status = format!("National fetch failed: {err}");
                }
                FetchResponse::Regional(Ok(index)) => {
                    self.status = format!("Per-state data: {} region(s).", index.len());
                    self.apply_region_index(index);
                }
                FetchResponse::Regional(Err(err)) => {
                    self.status = format!("Per-state fetch failed: {err}");
                }
            }
        }
        changed
    }

    fn apply_region_index(&mut self, index: RegionIndex) {
        let previous = self.region_names.get(self.selected_region).cloned();

        self.regions = index;
        self.region_names = self.regions.display_names();
        self.scrub = None;

        // Keep the current selection by name when possible, otherwise fall
        // back to the synthetic all-regions entry.
        self.selected_region = previous
            .and_then(|name| self.region_names.iter().position(|n| *n == name))
            .unwrap_or(0);

        if let Some(code) = self.pending_region.take() {
            match self
                .region_names
                .iter()
                .position(|n| n.eq_ignore_ascii_case(&code))
            {
                Some(pos) => {
                    self.selected_region = pos;
                    self.scrub = None;
                }
                None if crate::app::pipeline::is_national(&code) => {
                    self.selected_region = 0;
                    self.scrub = None;
                }
                None => {
                    self.status = format!("Unknown region: {code}.");
                }
            }
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_region > 0 {
                    self.selected_region -= 1;
                    self.scrub = None;
                    self.status = format!("region: {}", self.active_label());
                }
            }
            KeyCode::Down => {
                if self.selected_region + 1 < self.region_names.len() {
                    self.selected_region += 1;
                    self.scrub = None;
                    self.status = format!("region: {}", self.active_label());
                }
            }
            KeyCode::Char('m') => {
                self.metric = self.metric.next();
                self.scrub = None;
                self.status = format!("metric: {}", self.metric.display_name());
            }
            KeyCode::Char('t') => {
                self.window = self.window.next();
                self.scrub = None;
                self.status = format!("window: {}", self.window.display_name());
            }
            KeyCode::Left => self.move_scrub(-1),
            KeyCode::Right => self.move_scrub(1),
            KeyCode::Home => {
                if let Some((start, _)) = self.scrub_range() {
                    self.scrub = Some(start);
                }
            }
            KeyCode::End | KeyCode::Esc => {
                self.scrub = None;
            }
            KeyCode::Char('r') => {
                spawn_fetch(&self.client, &self.tx);
                self.status = "Refreshing national and per-state data...".to_string();
            }
            KeyCode::Char('d') => {
                match crate::debug::write_debug_bundle(
                    self.national.as_ref(),
                    &self.regions,
                    self.metric,
                    self.window,
                ) {
                    Ok(path) => {
                        self.status = format!("Wrote debug bundle: {}", path.display());
                    }
                    Err(err) => {
                        self.status = format!("Debug write failed: {err}");
                    }
                }
            }
            _ => {}
        }

        false
    }

    /// The series behind the current region selection.
    ///
    /// The synthetic first entry (and any name the index no longer knows)
    /// falls back to the national series.
    fn active_series(&self) -> Option<&Series> {
        if self.selected_region == 0 {
            return self.national.as_ref();
        }
        let name = self.region_names.get(self.selected_region)?;
        self.regions.get(name).or(self.national.as_ref())
    }

    fn active_label(&self) -> &str {
        self.region_names
            .get(self.selected_region)
            .map(String::as_str)
            .unwrap_or(ALL_REGIONS)
    }

    /// Valid scrub index bounds for the current view, if any.
    fn scrub_range(&self) -> Option<(usize, usize)> {
        let series = self.active_series()?;
        if series.is_empty() {
            return None;
        }
        let start = visible_start(series.len(), self.window);
        Some((start, series.len() - 1))
    }

    fn move_scrub(&mut self, delta: i64) {
        let Some((start, last)) = self.scrub_range() else {
            return;
        };
        let current = self.scrub.unwrap_or(last);
        let next = current
            .saturating_add_signed(delta as isize)
            .clamp(start, last);
        self.scrub = Some(next);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("covid", Style::default().fg(Color::Cyan)),
            Span::raw(" — COVID-19 daily case trends"),
        ]));

        let days = self.active_series().map(Series::len).unwrap_or(0);
        lines.push(Line::from(Span::styled(
            format!(
                "region: {} | metric: {} | window: {} | days={days}",
                self.active_label(),
                self.metric.display_name(),
                self.window.display_name(),
            ),
            Style::default().fg(Color::Gray),
        )));

        // Scrub readout: date and count for the cursor (latest by default).
        if let Some(series) = self.active_series() {
            let index = self.scrub.unwrap_or(series.len().saturating_sub(1));
            if let Some(record) = series.get(index) {
                lines.push(Line::from(Span::styled(
                    format!(
                        "{} — {} {}",
                        format_date(record.date),
                        format_count(u64::from(self.metric.value_of(record))),
                        self.metric.display_name(),
                    ),
                    Style::default()
                        .fg(metric_color(self.metric))
                        .add_modifier(Modifier::BOLD),
                )));
            }
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(9)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_regions(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Trend").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(series) = self.active_series().filter(|s| !s.is_empty()) else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let view = ChartView::build(series, self.metric, self.window);
        let scrub_index = self.scrub.unwrap_or(series.len() - 1);
        let (line, scrub, x_bounds, y_bounds) = chart_series(&view, scrub_index);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = TrendChart {
            line: &line,
            scrub,
            x_bounds,
            y_bounds,
            color: metric_rgb(self.metric),
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, series, x_bounds, y_bounds);
        }
    }

    fn draw_regions(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .region_names
            .iter()
            .map(|name| ListItem::new(name.clone()))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Regions").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_region));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ region  ←/→ scrub  m metric  t window  r refresh  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Build chart series for Plotters.
///
/// X positions are record indices; only the visible window is plotted.
fn chart_series(
    view: &ChartView,
    scrub_index: usize,
) -> (Vec<(f64, f64)>, Option<(f64, f64)>, [f64; 2], [f64; 2]) {
    let start = view.visible_start();
    let ys = view.ys();

    let mut line = Vec::with_capacity(ys.len().saturating_sub(start));
    for (i, &y) in ys.iter().enumerate().skip(start) {
        line.push((i as f64, y));
    }

    let mut x0 = start as f64;
    let mut x1 = ys.len().saturating_sub(1) as f64;
    if x1 <= x0 {
        // Degenerate (single-point) window: widen so Plotters can build axes.
        x0 -= 1.0;
        x1 += 1.0;
    }
    let x_bounds = [x0, x1];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in &line {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    if y_max <= y_min {
        // Flat series still needs a non-empty y range.
        y_min -= 1.0;
        y_max += 1.0;
    }
    // Counts never go below zero, so neither does the axis.
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [(y_min - pad).max(0.0), y_max + pad];

    let scrub = view
        .ys()
        .get(scrub_index)
        .map(|&y| (scrub_index as f64, y));

    (line, scrub, x_bounds, y_bounds)
}

fn metric_color(metric: Metric) -> Color {
    match metric {
        Metric::Positive => Color::Yellow,
        Metric::Negative => Color::Green,
        Metric::Deaths => Color::Red,
    }
}

fn metric_rgb(metric: Metric) -> RGBColor {
    match metric {
        Metric::Positive => RGBColor(255, 255, 0),
        Metric::Negative => RGBColor(0, 255, 0),
        Metric::Deaths => RGBColor(255, 0, 0),
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    series: &Series,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    // Long spans label months, short spans label days.
    let span_days = (x_bounds[1] - x_bounds[0]).round() as i64;
    let long_span = span_days > 120;

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let Some(record) = series.get(x_val.round().max(0.0) as usize) else {
            continue;
        };
        let label = if long_span {
            record.date.format("%b %y").to_string()
        } else {
            record.date.format("%m/%d").to_string()
        };

        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format_count_compact(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }
}
