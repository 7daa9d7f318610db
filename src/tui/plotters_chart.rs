//! Plotters-powered trend chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer line rendering at terminal resolution
//! - easy to extend later (multiple series, annotations, PNG/SVG export, etc.)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: the series and bounds are
/// computed outside the render call. Axis tick labels are dates looked up
/// from the active series, so the caller draws them around the chart rect
/// instead of Plotters drawing them inside it.
pub struct TrendChart<'a> {
    /// Line series for the chosen metric, x = record index.
    pub line: &'a [(f64, f64)],
    /// The scrub cursor's data point, if inside the visible window.
    pub scrub: Option<(f64, f64)>,
    /// X bounds (record indices).
    pub x_bounds: [f64; 2],
    /// Y bounds (daily counts, padded).
    pub y_bounds: [f64; 2],
    /// Line color for the current metric.
    pub color: RGBColor,
}

impl<'a> Widget for TrendChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space;
                // tick labels live outside the chart rect.
                .margin(1)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .disable_axes()
                .draw()?;

            // 1) The metric line.
            chart.draw_series(LineSeries::new(self.line.iter().copied(), &self.color))?;

            // 2) Scrub crosshair and marker.
            //
            // A colored `Pixel` gives a clean "dot" that looks good in
            // terminals and reliably overrides the line underneath; `Circle`
            // radii map poorly through the terminal backend.
            if let Some((sx, sy)) = self.scrub {
                let crosshair = RGBColor(128, 128, 128);
                chart.draw_series(LineSeries::new(
                    [(sx, y0), (sx, y1)].into_iter(),
                    &crosshair,
                ))?;
                chart.draw_series(std::iter::once(Pixel::new((sx, sy), WHITE)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
