//! Chart specifications
//!
//! Renderer-independent descriptions of the charts in a report. The x axis is
//! always one slot per calendar day of the reporting window: slot `i` spans
//! `i - 0.5 .. i + 0.5` and is labelled with that day's date.

use serde::Serialize;

use super::Rgb;

/// A horizontal guide line, e.g. the bounds of the normal range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub color: Rgb,
}

/// Daily min-max envelope drawn behind a line series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band {
    /// (slot, min, max) per day with data
    pub points: Vec<(f64, f64, f64)>,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub color: Rgb,
    /// (x, y) in chronological order
    pub points: Vec<(f64, f64)>,
    /// Marker color per point, parallel to `points`
    pub point_colors: Vec<Rgb>,
    pub band: Option<Band>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub y_label: String,
    pub x_labels: Vec<String>,
    pub series: Vec<LineSeries>,
    pub reference_lines: Vec<ReferenceLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub slot: usize,
    pub value: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub x_labels: Vec<String>,
    pub bars: Vec<Bar>,
    pub reference_lines: Vec<ReferenceLine>,
}

/// One layer of a stacked bar chart, with one value per slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackSegment {
    pub name: String,
    pub color: Rgb,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedBarChart {
    pub title: String,
    pub y_label: String,
    pub x_labels: Vec<String>,
    /// Bottom to top
    pub segments: Vec<StackSegment>,
    pub reference_lines: Vec<ReferenceLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Line(LineChart),
    Bar(BarChart),
    StackedBar(StackedBarChart),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Line(c) => &c.title,
            ChartSpec::Bar(c) => &c.title,
            ChartSpec::StackedBar(c) => &c.title,
        }
    }

    pub fn x_labels(&self) -> &[String] {
        match self {
            ChartSpec::Line(c) => &c.x_labels,
            ChartSpec::Bar(c) => &c.x_labels,
            ChartSpec::StackedBar(c) => &c.x_labels,
        }
    }

    pub fn y_label(&self) -> &str {
        match self {
            ChartSpec::Line(c) => &c.y_label,
            ChartSpec::Bar(c) => &c.y_label,
            ChartSpec::StackedBar(c) => &c.y_label,
        }
    }

    pub fn reference_lines(&self) -> &[ReferenceLine] {
        match self {
            ChartSpec::Line(c) => &c.reference_lines,
            ChartSpec::Bar(c) => &c.reference_lines,
            ChartSpec::StackedBar(c) => &c.reference_lines,
        }
    }

    /// True when there is nothing to plot
    pub fn is_empty(&self) -> bool {
        match self {
            ChartSpec::Line(c) => c.series.iter().all(|s| s.points.is_empty()),
            ChartSpec::Bar(c) => c.bars.is_empty(),
            ChartSpec::StackedBar(c) => {
                c.segments.iter().all(|s| s.values.iter().all(|v| *v == 0.0))
            }
        }
    }

    /// Lowest and highest y value the chart must show, reference lines included
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        let mut values: Vec<f64> = self.reference_lines().iter().map(|r| r.value).collect();

        match self {
            ChartSpec::Line(c) => {
                for series in &c.series {
                    values.extend(series.points.iter().map(|(_, y)| *y));
                    if let Some(band) = &series.band {
                        values.extend(band.points.iter().flat_map(|(_, lo, hi)| [*lo, *hi]));
                    }
                }
            }
            ChartSpec::Bar(c) => {
                values.push(0.0);
                values.extend(c.bars.iter().map(|b| b.value));
            }
            ChartSpec::StackedBar(c) => {
                values.push(0.0);
                let slots = c.x_labels.len();
                for slot in 0..slots {
                    let total: f64 = c.segments.iter().filter_map(|s| s.values.get(slot)).sum();
                    values.push(total);
                }
            }
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if min.is_finite() && max.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }
}
