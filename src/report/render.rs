//! Chart rasterization (plotters)
//!
//! Draws a [`ChartSpec`] onto an in-memory RGB bitmap and encodes it as PNG.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use tracing::{debug, warn};

use super::chart::{BarChart, ChartSpec, LineChart, StackedBarChart};
use super::{Report, Rgb};
use crate::error::{ReportError, ReportResult};

type Canvas<'b> = DrawingArea<BitMapBackend<'b>, Shift>;
type Plot<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const BAR_HALF_WIDTH: f64 = 0.35;

/// One chart of a section after rasterization
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub title: String,
    /// PNG bytes, or the reason the chart could not be drawn
    pub png: Result<Vec<u8>, String>,
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

// ============================================================================
// Rasterization
// ============================================================================

/// Render a chart spec as PNG bytes
pub fn rasterize(spec: &ChartSpec, width: u32, height: u32) -> ReportResult<Vec<u8>> {
    if spec.is_empty() || spec.x_labels().is_empty() {
        return Err(ReportError::chart("No data to chart"));
    }
    if width == 0 || height == 0 {
        return Err(ReportError::chart("Chart dimensions must be non-zero"));
    }

    let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(ReportError::chart)?;

        match spec {
            ChartSpec::Line(chart) => draw_line_chart(&root, spec, chart)?,
            ChartSpec::Bar(chart) => draw_bar_chart(&root, spec, chart)?,
            ChartSpec::StackedBar(chart) => draw_stacked_chart(&root, spec, chart)?,
        }

        root.present().map_err(ReportError::chart)?;
    }

    // Convert RGB buffer to PNG
    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ReportError::chart("Failed to create image from buffer"))?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(ReportError::chart)?;

    Ok(png_bytes)
}

/// y-axis bounds with some headroom; charts anchored at zero stay anchored
fn padded_y_range(spec: &ChartSpec) -> (f64, f64) {
    let (lo, hi) = spec.y_extent().unwrap_or((0.0, 1.0));
    let pad = ((hi - lo) * 0.1).max(1.0);
    let lo = if lo == 0.0 && !matches!(spec, ChartSpec::Line(_)) { 0.0 } else { lo - pad };
    (lo, hi + pad)
}

/// Axes, mesh and reference lines shared by every chart kind
fn build_axes<'a, 'b>(root: &'a Canvas<'b>, spec: &ChartSpec) -> ReportResult<Plot<'a, 'b>> {
    let labels = spec.x_labels();
    let slots = labels.len();
    let (y_lo, y_hi) = padded_y_range(spec);
    let x_max = slots as f64 - 0.5;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5..x_max, y_lo..y_hi)
        .map_err(ReportError::chart)?;

    chart
        .configure_mesh()
        .x_labels(slots + 1)
        // Only ticks on a slot center get that day's label
        .x_label_formatter(&|x: &f64| {
            let slot = x.round();
            if (x - slot).abs() < 1e-6 && slot >= 0.0 {
                labels.get(slot as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .y_desc(spec.y_label())
        .draw()
        .map_err(ReportError::chart)?;

    for line in spec.reference_lines() {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(-0.5, line.value), (x_max, line.value)],
                ShapeStyle::from(&rgb(line.color).mix(0.5)).stroke_width(1),
            )))
            .map_err(ReportError::chart)?;
    }

    Ok(chart)
}

fn draw_legend<'a, 'b: 'a>(chart: &mut Plot<'a, 'b>) -> ReportResult<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(ReportError::chart)
}

fn draw_line_chart(root: &Canvas<'_>, spec: &ChartSpec, line: &LineChart) -> ReportResult<()> {
    let mut chart = build_axes(root, spec)?;

    // Min-max bands go underneath every line
    for series in &line.series {
        let Some(band) = &series.band else { continue };
        if band.points.is_empty() {
            continue;
        }
        // Along the maxima, then back along the minima
        let mut polygon: Vec<(f64, f64)> = band.points.iter().map(|(x, _, hi)| (*x, *hi)).collect();
        polygon.extend(band.points.iter().rev().map(|(x, lo, _)| (*x, *lo)));
        chart
            .draw_series(std::iter::once(Polygon::new(polygon, rgb(band.color).mix(0.15))))
            .map_err(ReportError::chart)?;
    }

    for series in &line.series {
        if series.points.is_empty() {
            continue;
        }
        let color = rgb(series.color);
        chart
            .draw_series(LineSeries::new(series.points.iter().copied(), color.stroke_width(2)))
            .map_err(ReportError::chart)?
            .label(series.name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });

        chart
            .draw_series(series.points.iter().enumerate().map(|(i, (x, y))| {
                let marker = series.point_colors.get(i).copied().unwrap_or(series.color);
                Circle::new((*x, *y), 4, rgb(marker).filled())
            }))
            .map_err(ReportError::chart)?;
    }

    draw_legend(&mut chart)
}

fn draw_bar_chart(root: &Canvas<'_>, spec: &ChartSpec, bars: &BarChart) -> ReportResult<()> {
    let mut chart = build_axes(root, spec)?;

    chart
        .draw_series(bars.bars.iter().map(|bar| {
            let x = bar.slot as f64;
            Rectangle::new(
                [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, bar.value)],
                rgb(bar.color).filled(),
            )
        }))
        .map_err(ReportError::chart)?;

    Ok(())
}

fn draw_stacked_chart(
    root: &Canvas<'_>,
    spec: &ChartSpec,
    stacked: &StackedBarChart,
) -> ReportResult<()> {
    let mut chart = build_axes(root, spec)?;
    let mut base = vec![0.0_f64; stacked.x_labels.len()];

    for segment in &stacked.segments {
        let color = rgb(segment.color);
        let mut rects = Vec::new();
        for (slot, value) in segment.values.iter().enumerate().take(base.len()) {
            if *value <= 0.0 {
                continue;
            }
            let x = slot as f64;
            rects.push(Rectangle::new(
                [(x - BAR_HALF_WIDTH, base[slot]), (x + BAR_HALF_WIDTH, base[slot] + value)],
                color.filled(),
            ));
            base[slot] += value;
        }

        chart
            .draw_series(rects)
            .map_err(ReportError::chart)?
            .label(segment.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    draw_legend(&mut chart)
}

// ============================================================================
// Report Charts
// ============================================================================

/// Rasterize every chart of every section. Failures are kept per chart so the
/// PDF can still be written.
pub fn render_report_charts(report: &Report, width: u32, height: u32) -> Vec<Vec<RenderedChart>> {
    report
        .sections
        .iter()
        .map(|section| {
            section
                .charts
                .iter()
                .map(|spec| {
                    let png = rasterize(spec, width, height).map_err(|e| {
                        warn!(
                            section = section.kind.as_str(),
                            chart = spec.title(),
                            error = %e,
                            "chart failed"
                        );
                        e.to_string()
                    });
                    if let Ok(bytes) = &png {
                        debug!(
                            section = section.kind.as_str(),
                            chart = spec.title(),
                            bytes = bytes.len(),
                            "chart rendered"
                        );
                    }
                    RenderedChart {
                        title: spec.title().to_string(),
                        png,
                    }
                })
                .collect()
        })
        .collect()
}

/// Write each successfully rendered chart as `<section>_<n>.png`. Returns the
/// number of files written.
pub fn save_chart_images<P: AsRef<Path>>(
    report: &Report,
    rendered: &[Vec<RenderedChart>],
    dir: P,
) -> ReportResult<usize> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = 0;
    for (section, charts) in report.sections.iter().zip(rendered) {
        for (i, chart) in charts.iter().enumerate() {
            if let Ok(png) = &chart.png {
                let path = dir.join(format!("{}_{}.png", section.kind.as_str(), i + 1));
                fs::write(&path, png)?;
                written += 1;
            }
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::chart::{Band, Bar, LineSeries as Series, ReferenceLine, StackSegment};

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("03/{:02}", i + 1)).collect()
    }

    #[test]
    fn test_empty_chart_is_an_error() {
        let spec = ChartSpec::Bar(BarChart {
            title: "Daily Calories".to_string(),
            y_label: "kcal".to_string(),
            x_labels: labels(7),
            bars: vec![],
            reference_lines: vec![],
        });
        let err = rasterize(&spec, 400, 200).unwrap_err();
        assert!(err.to_string().contains("No data to chart"));
    }

    #[test]
    fn test_padded_range_keeps_bars_on_zero() {
        let spec = ChartSpec::Bar(BarChart {
            title: "Daily Calories".to_string(),
            y_label: "kcal".to_string(),
            x_labels: labels(3),
            bars: vec![Bar { slot: 1, value: 2000.0, color: (0, 0, 0) }],
            reference_lines: vec![ReferenceLine { value: 2200.0, color: (0, 0, 0) }],
        });
        let (lo, hi) = padded_y_range(&spec);
        assert_eq!(lo, 0.0);
        assert!(hi > 2200.0);
    }

    fn assert_png(spec: &ChartSpec, width: u32, height: u32) {
        let png = rasterize(spec, width, height).unwrap();
        assert!(png.starts_with(&PNG_MAGIC));
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (width, height));
    }

    #[test]
    fn test_each_chart_kind_renders_png() {
        let line = ChartSpec::Line(LineChart {
            title: "Heart Rate Trend".to_string(),
            y_label: "bpm".to_string(),
            x_labels: labels(3),
            series: vec![Series {
                name: "Heart Rate".to_string(),
                color: (112, 48, 160),
                points: vec![(-0.2, 70.0), (0.1, 74.0), (1.2, 85.0), (2.3, 102.0)],
                point_colors: vec![(0, 176, 80), (0, 176, 80), (0, 176, 80), (255, 165, 0)],
                band: Some(Band {
                    points: vec![(0.0, 70.0, 74.0), (1.0, 85.0, 85.0), (2.0, 102.0, 102.0)],
                    color: (112, 48, 160),
                }),
            }],
            reference_lines: vec![
                ReferenceLine { value: 60.0, color: (0, 176, 80) },
                ReferenceLine { value: 100.0, color: (0, 176, 80) },
            ],
        });
        assert_png(&line, 600, 300);

        let bars = ChartSpec::Bar(BarChart {
            title: "Daily Calories".to_string(),
            y_label: "kcal".to_string(),
            x_labels: labels(7),
            bars: vec![
                Bar { slot: 0, value: 1950.0, color: (0, 176, 80) },
                Bar { slot: 4, value: 2600.0, color: (255, 0, 0) },
            ],
            reference_lines: vec![ReferenceLine { value: 2200.0, color: (0, 176, 80) }],
        });
        assert_png(&bars, 800, 320);

        let stacked = ChartSpec::StackedBar(StackedBarChart {
            title: "Daily Hydration".to_string(),
            y_label: "ml".to_string(),
            x_labels: labels(2),
            segments: vec![
                StackSegment {
                    name: "Intake".to_string(),
                    color: (0, 112, 192),
                    values: vec![800.0, 2000.0],
                },
                StackSegment {
                    name: "Remaining".to_string(),
                    color: (220, 220, 220),
                    values: vec![1200.0, 0.0],
                },
                StackSegment {
                    name: "Over".to_string(),
                    color: (112, 48, 160),
                    values: vec![0.0, 500.0],
                },
            ],
            reference_lines: vec![ReferenceLine { value: 2000.0, color: (0, 176, 80) }],
        });
        assert_png(&stacked, 500, 250);
    }
}
