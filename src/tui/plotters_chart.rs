//! Plotters-powered survival curve chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! All series arrive already in log10(SF) space, so the chart itself is linear.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Colors for stored comparison curves, cycled in order.
const STORED_PALETTE: [RGBColor; 5] = [
    RGBColor(0, 255, 255),
    RGBColor(0, 255, 0),
    RGBColor(255, 255, 0),
    RGBColor(255, 0, 255),
    RGBColor(100, 149, 237),
];

/// A lightweight, render-only chart description.
pub struct SfPlottersChart<'a> {
    /// Line segments of the live curve.
    pub live: &'a [Vec<(f64, f64)>],
    /// Line segments of each stored curve.
    pub stored: &'a [Vec<Vec<(f64, f64)>>],
    /// Scatter series for the observed data.
    pub points: &'a [(f64, f64)],
    /// X bounds (dose, Gy).
    pub x_bounds: [f64; 2],
    /// Y bounds (log10 SF).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for SfPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
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

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (idx, curve) in self.stored.iter().enumerate() {
                let color = STORED_PALETTE[idx % STORED_PALETTE.len()];
                for segment in curve {
                    chart.draw_series(LineSeries::new(segment.iter().copied(), &color))?;
                }
            }

            // The live curve is drawn last among lines so it stays visible.
            for segment in self.live {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &RED))?;
            }

            // `Circle` radii are mis-scaled by the backend; a `Pixel` reads as a dot.
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
