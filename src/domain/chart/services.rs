use chrono::NaiveDate;

use super::entities::ReturnsChart;
use super::value_objects::{AxisTick, Color, Viewport};

/// Canvas margins around the plot rectangle
pub const MARGIN_LEFT: f64 = 64.0;
pub const MARGIN_RIGHT: f64 = 120.0;
pub const MARGIN_TOP: f64 = 40.0;
pub const MARGIN_BOTTOM: f64 = 36.0;

const TARGET_Y_TICKS: usize = 6;
const TARGET_X_TICKS: usize = 6;

/// A series projected to canvas pixels. Each segment is an unbroken run of
/// defined values; a gap in the data starts a new segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub label: String,
    pub color: Color,
    pub segments: Vec<Vec<(f64, f64)>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    /// Most recent value, shown next to the label
    pub latest: Option<f64>,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub title: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub viewport: Viewport,
    pub polylines: Vec<Polyline>,
    pub y_ticks: Vec<AxisTick>,
    pub x_ticks: Vec<AxisTick>,
    /// Y of the 0% line when it falls inside the plot
    pub baseline_y: Option<f64>,
    pub legend: Vec<LegendEntry>,
}

/// Domain service turning a chart into pixel geometry
pub struct ChartLayoutService;

impl ChartLayoutService {
    pub fn new() -> Self {
        Self
    }

    /// Lays out `chart` on a `width x height` canvas.
    ///
    /// Returns `None` when the chart has no plottable point.
    pub fn layout(&self, chart: &ReturnsChart, width: f64, height: f64) -> Option<ChartLayout> {
        let (start_date, end_date) = chart.date_bounds()?;
        let (lo, hi) = chart.value_bounds()?;
        let (min_value, max_value, step) = nice_bounds(lo.min(0.0), hi.max(0.0), TARGET_Y_TICKS);

        let viewport = Viewport {
            start_date,
            end_date,
            min_value,
            max_value,
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        };

        let polylines = chart
            .series
            .iter()
            .map(|series| Polyline {
                label: series.label.clone(),
                color: series.color,
                segments: split_segments(series.points(), &viewport),
            })
            .collect();

        let legend = chart
            .series
            .iter()
            .map(|series| LegendEntry {
                label: series.label.clone(),
                color: series.color,
                latest: series.latest,
            })
            .collect();

        let baseline_y = (min_value <= 0.0 && 0.0 <= max_value).then(|| viewport.value_to_y(0.0));

        Some(ChartLayout {
            title: chart.title.clone(),
            canvas_width: width,
            canvas_height: height,
            y_ticks: y_ticks(&viewport, step),
            x_ticks: x_ticks(&viewport, TARGET_X_TICKS),
            viewport,
            polylines,
            baseline_y,
            legend,
        })
    }
}

impl Default for ChartLayoutService {
    fn default() -> Self {
        Self::new()
    }
}

fn split_segments(
    points: impl Iterator<Item = (NaiveDate, Option<f64>)>,
    viewport: &Viewport,
) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for (date, value) in points {
        match value {
            Some(v) => current.push((viewport.date_to_x(date), viewport.value_to_y(v))),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Step of 1, 2 or 5 times a power of ten giving about `target` intervals
pub fn nice_step(range: f64, target: usize) -> f64 {
    if range <= 0.0 || !range.is_finite() {
        return 1.0;
    }
    let raw = range / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Expands `[lo, hi]` outward to multiples of a nice step
pub fn nice_bounds(lo: f64, hi: f64, target: usize) -> (f64, f64, f64) {
    let (lo, hi) = if hi - lo <= f64::EPSILON { (lo - 1.0, hi + 1.0) } else { (lo, hi) };
    let step = nice_step(hi - lo, target);
    ((lo / step).floor() * step, (hi / step).ceil() * step, step)
}

fn y_ticks(viewport: &Viewport, step: f64) -> Vec<AxisTick> {
    let count = (viewport.value_range() / step).round() as i64;
    (0..=count)
        .map(|i| {
            let value = viewport.min_value + i as f64 * step;
            AxisTick {
                position: viewport.value_to_y(value),
                label: format_percent(value, step),
            }
        })
        .collect()
}

fn x_ticks(viewport: &Viewport, target: usize) -> Vec<AxisTick> {
    let span = (viewport.end_date - viewport.start_date).num_days();
    let format = if span > 365 { "%b %Y" } else { "%b %d" };
    let stride = (span / target.max(1) as i64).max(1);

    (0..=span)
        .step_by(stride as usize)
        .map(|offset| {
            let date = viewport.start_date + chrono::Duration::days(offset);
            AxisTick {
                position: viewport.date_to_x(date),
                label: date.format(format).to_string(),
            }
        })
        .collect()
}

fn format_percent(value: f64, step: f64) -> String {
    // -0 would otherwise print as "-0%"
    let value = if value.abs() < step * 1e-6 { 0.0 } else { value };
    if step >= 1.0 {
        format!("{:.0}%", value)
    } else {
        format!("{:.1}%", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{ChartSeries, SERIES_PALETTE};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn chart(values: Vec<Option<f64>>) -> ReturnsChart {
        ReturnsChart {
            title: "Cumulative Returns".to_string(),
            series: vec![ChartSeries {
                label: "QQQ".to_string(),
                color: SERIES_PALETTE[0],
                dates: (0..values.len() as u32).map(|i| date(4 + i)).collect(),
                latest: values.iter().rev().find_map(|v| *v),
                values,
            }],
        }
    }

    #[test]
    fn nice_steps_are_one_two_five() {
        assert_eq!(nice_step(10.0, 5), 2.0);
        assert_eq!(nice_step(23.0, 5), 5.0);
        assert!((nice_step(0.9, 6) - 0.2).abs() < 1e-12);
        assert_eq!(nice_step(0.0, 6), 1.0);
    }

    #[test]
    fn gaps_split_the_line() {
        let layout = ChartLayoutService::new()
            .layout(&chart(vec![Some(0.0), Some(2.0), None, Some(1.0), Some(3.0)]), 800.0, 400.0)
            .unwrap();
        let lengths: Vec<usize> = layout.polylines[0].segments.iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![2, 2]);
    }

    #[test]
    fn baseline_is_inside_the_plot() {
        let layout = ChartLayoutService::new()
            .layout(&chart(vec![Some(0.0), Some(12.0), Some(7.0)]), 800.0, 400.0)
            .unwrap();

        assert_eq!(layout.viewport.min_value, 0.0);
        let baseline = layout.baseline_y.unwrap();
        assert_eq!(baseline, layout.viewport.top + layout.viewport.height);
        assert!(layout.y_ticks.iter().any(|t| t.label == "0%"));
        assert_eq!(layout.legend[0].latest, Some(7.0));
    }

    #[test]
    fn flat_series_still_gets_a_range() {
        let layout = ChartLayoutService::new()
            .layout(&chart(vec![Some(0.0), Some(0.0)]), 800.0, 400.0)
            .unwrap();
        assert!(layout.viewport.value_range() > 0.0);
        assert_eq!(layout.x_ticks.first().unwrap().label, "Mar 04");
    }

    #[test]
    fn nothing_to_plot_gives_no_layout() {
        assert!(ChartLayoutService::new().layout(&chart(vec![None, None]), 800.0, 400.0).is_none());
    }
}
