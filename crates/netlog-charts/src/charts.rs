//! PNG time-series charts, one per tracked metric.
//!
//! Each chart plots the per-second mean of a metric against its timestamp,
//! with timestamps treated as ordered categories so gaps in the capture do
//! not stretch the x axis.

use std::error::Error;
use std::path::{Path, PathBuf};

use netlog_core::error::{NetlogError, Result};
use netlog_core::models::{AggregatedRecord, Metric};
use plotters::prelude::*;
use plotters::style::FontTransform;
use tracing::{debug, info};

/// matplotlib's default `tab:blue`.
pub const TAB_BLUE: RGBColor = RGBColor(0x1f, 0x77, 0xb4);

// ── ChartStyle ────────────────────────────────────────────────────────────────

/// Size and styling shared by every rendered chart.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Colour of the line and its markers.
    pub line_color: RGBColor,
    /// Marker radius in pixels.
    pub marker_size: u32,
    pub caption_font_size: u32,
    pub label_font_size: u32,
    /// Upper bound on the number of x-axis timestamp labels.
    pub max_x_labels: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 400,
            line_color: TAB_BLUE,
            marker_size: 4,
            caption_font_size: 22,
            label_font_size: 12,
            max_x_labels: 20,
        }
    }
}

impl ChartStyle {
    /// Default style at a custom image size.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

// ── ChartRenderer ─────────────────────────────────────────────────────────────

/// Renders line-and-marker charts of aggregated metrics.
pub struct ChartRenderer {
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    /// Render the chart of `metric` over time into the PNG file at `path`.
    pub fn render_metric(
        &self,
        records: &[AggregatedRecord],
        metric: Metric,
        path: &Path,
    ) -> Result<()> {
        self.draw(records, metric, path)
            .map_err(|e| NetlogError::Chart {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        debug!("Rendered {} chart to {}", metric, path.display());
        Ok(())
    }

    /// Render `<metric>_plot.png` into `dir` for every tracked metric.
    ///
    /// Stops at the first failure. Returns the written paths in metric order.
    pub fn render_all(&self, records: &[AggregatedRecord], dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(Metric::COUNT);
        for metric in Metric::ALL {
            let path = dir.join(metric.plot_file_name());
            self.render_metric(records, metric, &path)?;
            written.push(path);
        }
        info!("Rendered {} charts into {}", written.len(), dir.display());
        Ok(written)
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn draw(
        &self,
        records: &[AggregatedRecord],
        metric: Metric,
        path: &Path,
    ) -> std::result::Result<(), Box<dyn Error>> {
        let style = &self.style;
        let labels: Vec<String> = records
            .iter()
            .map(AggregatedRecord::timestamp_label)
            .collect();
        let points: Vec<(f64, f64)> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (i as f64, r.value(metric)))
            .collect();
        let (y_min, y_max) = value_range(points.iter().map(|&(_, y)| y));
        let x_max = records.len().max(1) as f64 - 0.5;
        let x_formatter = |x: &f64| category_label(&labels, *x);

        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                metric.chart_title(),
                ("sans-serif", style.caption_font_size),
            )
            .margin(12)
            .x_label_area_size(140)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_labels(labels.len().clamp(1, style.max_x_labels))
            .x_label_formatter(&x_formatter)
            .x_label_style(
                ("sans-serif", style.label_font_size)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc("Timestamp")
            .y_desc(format!("{} (Mean)", metric))
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            style.line_color.stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, style.marker_size, style.line_color.filled())),
        )?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(ChartStyle::default())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Label for x position `x`: the timestamp at that index, or an empty string
/// between categories and outside the data.
fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (x - idx).abs() > 1e-6 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Y-axis bounds with 5 % headroom. A flat or empty series still gets a
/// non-empty range.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span.abs() < f64::EPSILON {
        let pad = (max.abs() * 0.1).max(1.0);
        return (min - pad, max + pad);
    }
    (min - span * 0.05, max + span * 0.05)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
