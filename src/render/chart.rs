//! SVG line charts with condition boundary markers.
//!
//! Each chart is described by its own [`ChartSpec`]; rendering draws into a
//! fresh in-memory SVG document, so charts never share drawing state.

use crate::core::{hr_series, rmssd_ms_series, Segment};
use crate::data::{condition_legend, Record};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Height of the condition legend strip below the plot.
const LEGEND_HEIGHT: u32 = 90;
/// Horizontal offset of a condition label from its marker, in minutes.
const LABEL_OFFSET: f64 = 3.0;
/// Fraction of the data span added above and below the series.
const Y_PADDING: f64 = 0.05;

const SERIES_COLOR: RGBColor = RGBColor(31, 119, 180);
const MARKER_COLOR: RGBColor = RGBColor(214, 39, 40);

/// Chart rendering errors.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    Draw(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Draw(e) => write!(f, "Chart drawing failed: {e}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(e.to_string())
    }
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub y_label: String,
    pub series_label: String,
    pub points: Vec<(f64, f64)>,
    /// Height of the condition labels as a fraction of the visible y-range
    pub label_fraction: f64,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    /// Heart rate chart.
    pub fn hr(records: &[Record], width: u32, height: u32) -> Self {
        Self {
            title: "HR Over Time".to_string(),
            y_label: "BPM".to_string(),
            series_label: "HR (bpm)".to_string(),
            points: hr_series(records),
            label_fraction: 0.95,
            width,
            height,
        }
    }

    /// RMSSD chart, in milliseconds.
    pub fn rmssd(records: &[Record], width: u32, height: u32) -> Self {
        Self {
            title: "RMSSD Over Time".to_string(),
            y_label: "RMSSD (ms)".to_string(),
            series_label: "RMSSD (ms)".to_string(),
            points: rmssd_ms_series(records),
            label_fraction: 0.75,
            width,
            height,
        }
    }

    /// Visible x-range: the whole recording, at least one minute wide, with
    /// room for the label of a segment starting at the last minute.
    pub fn x_range(&self) -> (f64, f64) {
        let last = self.points.iter().map(|(x, _)| *x).fold(0.0, f64::max);
        (0.0, last.max(1.0) + LABEL_OFFSET)
    }

    /// Visible y-range: the data span with a little padding.
    pub fn y_range(&self) -> (f64, f64) {
        let (min, max) = self
            .points
            .iter()
            .map(|(_, y)| *y)
            .filter(|y| y.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
                (lo.min(y), hi.max(y))
            });

        if !min.is_finite() {
            return (0.0, 1.0);
        }
        let span = max - min;
        if span <= f64::EPSILON {
            return (min - 1.0, max + 1.0);
        }
        (min - span * Y_PADDING, max + span * Y_PADDING)
    }

    /// y position of the condition labels.
    pub fn label_y(&self) -> f64 {
        let (lo, hi) = self.y_range();
        lo + (hi - lo) * self.label_fraction
    }
}

/// Render `spec` with a boundary marker and label at every segment start.
pub fn render_svg(spec: &ChartSpec, segments: &[Segment]) -> Result<String, RenderError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let plot_height = spec.height.saturating_sub(LEGEND_HEIGHT);
        let (plot_area, legend_area) = root.split_vertically(plot_height);

        let (x0, x1) = spec.x_range();
        let (y0, y1) = spec.y_range();

        let mut chart = ChartBuilder::on(&plot_area)
            .caption(spec.title.as_str(), ("sans-serif", 24))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc("Time (minute)")
            .y_desc(spec.y_label.as_str())
            .x_label_formatter(&|v| format!("{v:.0}"))
            .draw()?;

        // Missing values break the line.
        let mut labelled = false;
        for run in finite_runs(&spec.points) {
            let series = chart.draw_series(LineSeries::new(run, SERIES_COLOR.stroke_width(2)))?;
            if !labelled {
                series
                    .label(spec.series_label.as_str())
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &SERIES_COLOR));
                labelled = true;
            }
        }

        let label_y = spec.label_y();
        let label_style = ("sans-serif", 14)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));

        for seg in segments {
            let x = seg.start_index as f64;
            chart.draw_series(DashedLineSeries::new(
                vec![(x, y0), (x, y1)],
                6,
                4,
                MARKER_COLOR.stroke_width(1),
            ))?;
            chart.draw_series(std::iter::once(Text::new(
                seg.label.code().to_string(),
                (x + LABEL_OFFSET, label_y),
                label_style.clone(),
            )))?;
        }

        if labelled {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }

        let legend_style = ("sans-serif", 14).into_font().color(&BLACK);
        for (i, line) in condition_legend().into_iter().enumerate() {
            legend_area.draw(&Text::new(
                line,
                (80, 8 + 18 * i as i32),
                legend_style.clone(),
            ))?;
        }

        root.present()?;
    }

    tracing::debug!(
        title = %spec.title,
        points = spec.points.len(),
        markers = segments.len(),
        "Rendered chart"
    );
    Ok(svg)
}

/// Split points into maximal runs of finite values.
fn finite_runs(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current = Vec::new();
    for &(x, y) in points {
        if y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Number of `<text>` elements in `svg` whose content is exactly `text`.
#[cfg(test)]
pub(crate) fn count_text(svg: &str, text: &str) -> usize {
    svg.split("<text")
        .skip(1)
        .filter_map(|element| {
            let body = element.split_once('>')?.1;
            Some(body.split_once("</text>")?.0.trim())
        })
        .filter(|body| *body == text)
        .count()
}
