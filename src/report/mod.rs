//! Report generation
//!
//! Builds the in-memory report from a filtered bundle, rasterizes its charts and
//! writes the PDF. Every section is built from its own series only, so leaving
//! an optional series out of the input never changes another section.

pub mod chart;
pub mod pdf;
pub mod render;
mod sections;

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::{Classification, Timeframe};
use crate::build_info::BuildInfo;
use crate::config::ReportConfig;
use crate::error::ReportResult;
use crate::models::{HealthLogBundle, PatientInfo};

pub use chart::ChartSpec;
pub use render::RenderedChart;

/// RGB color, 0-255 per channel
pub type Rgb = (u8, u8, u8);

// ============================================================================
// Color Constants
// ============================================================================

pub const COLOR_NORMAL: Rgb = (0, 176, 80);        // Green
pub const COLOR_BORDERLINE: Rgb = (255, 165, 0);   // Orange
pub const COLOR_OUTLIER: Rgb = (255, 0, 0);        // Red
pub const COLOR_BLACK: Rgb = (0, 0, 0);
pub const COLOR_GRAY: Rgb = (128, 128, 128);
pub const COLOR_LIGHT_GRAY: Rgb = (220, 220, 220);

pub const COLOR_TEMPERATURE_TITLE: Rgb = (230, 81, 0);
pub const COLOR_HR_TITLE: Rgb = (112, 48, 160);
pub const COLOR_BP_TITLE: Rgb = (192, 0, 0);
pub const COLOR_GLUCOSE_TITLE: Rgb = (0, 112, 192);
pub const COLOR_NUTRITION_TITLE: Rgb = (84, 130, 53);
pub const COLOR_HYDRATION_TITLE: Rgb = (0, 150, 199);

pub fn class_color(class: Classification) -> Rgb {
    match class {
        Classification::Normal => COLOR_NORMAL,
        Classification::Borderline => COLOR_BORDERLINE,
        Classification::Outlier => COLOR_OUTLIER,
    }
}

// ============================================================================
// Report Model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Temperature,
    HeartRate,
    BloodPressure,
    BloodGlucose,
    Nutrition,
    Hydration,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Temperature => "temperature",
            SectionKind::HeartRate => "heart_rate",
            SectionKind::BloodPressure => "blood_pressure",
            SectionKind::BloodGlucose => "blood_glucose",
            SectionKind::Nutrition => "nutrition",
            SectionKind::Hydration => "hydration",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportHeader {
    pub patient: PatientInfo,
    pub period: String,
    pub timezone: String,
    pub generated_on: NaiveDate,
}

/// One "label: value" line in a section summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub label: String,
    pub value: String,
    pub color: Option<Rgb>,
}

impl SummaryLine {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            color: None,
        }
    }

    pub fn colored(label: impl Into<String>, value: impl Into<String>, color: Rgb) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            color: Some(color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    /// Column widths in millimetres
    pub widths: Vec<f32>,
    /// Cells from this column on are printed in the row color
    pub colored_from: usize,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}

impl LegendEntry {
    pub fn new(label: impl Into<String>, color: Rgb) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub title_color: Rgb,
    /// Records inside the reporting window
    pub record_count: usize,
    pub summary: Vec<SummaryLine>,
    pub charts: Vec<ChartSpec>,
    pub legend: Vec<LegendEntry>,
    pub table: Option<Table>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub header: ReportHeader,
    pub sections: Vec<Section>,
    pub notes: Vec<String>,
}

impl Report {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn record_count(&self) -> usize {
        self.sections.iter().map(|s| s.record_count).sum()
    }
}

/// Filter the bundle to the window and build every section it has data for
pub fn build_report(
    bundle: &HealthLogBundle,
    timeframe: &Timeframe,
    generated_on: NaiveDate,
) -> Report {
    let filtered = bundle.within(timeframe);

    let mut report_sections = vec![
        sections::temperature_section(&filtered.temperature, timeframe),
        sections::heart_rate_section(&filtered.heart_rate, timeframe),
    ];

    if let Some(series) = &filtered.blood_pressure {
        report_sections.push(sections::blood_pressure_section(series, timeframe));
    }
    if let Some(series) = &filtered.blood_glucose {
        report_sections.push(sections::glucose_section(series, timeframe));
    }
    if let Some(series) = &filtered.nutrition {
        report_sections.push(sections::nutrition_section(series, timeframe));
    }
    if let Some(series) = &filtered.hydration {
        report_sections.push(sections::hydration_section(series, timeframe));
    }

    for section in &report_sections {
        debug!(section = section.kind.as_str(), records = section.record_count, "section built");
    }

    Report {
        header: ReportHeader {
            patient: filtered.patient.clone(),
            period: timeframe.label(),
            timezone: timeframe.timezone().to_string(),
            generated_on,
        },
        sections: report_sections,
        notes: filtered.notes.iter().filter(|n| !n.trim().is_empty()).cloned().collect(),
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub file_path: String,
    pub sections: Vec<&'static str>,
    pub total_records: usize,
    pub pages: usize,
    pub charts_failed: usize,
    pub date_range: String,
    pub build: BuildInfo,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SectionCount {
    pub section: &'static str,
    pub records_total: usize,
    pub records_in_window: usize,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub patient: String,
    pub date_range: String,
    pub sections: Vec<SectionCount>,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Per-section record counts before and after filtering, without rendering anything
pub fn check_bundle(bundle: &HealthLogBundle, timeframe: &Timeframe) -> CheckResponse {
    let filtered = bundle.within(timeframe);

    let mut counts = vec![
        SectionCount {
            section: SectionKind::Temperature.as_str(),
            records_total: bundle.temperature.logs.len(),
            records_in_window: filtered.temperature.logs.len(),
        },
        SectionCount {
            section: SectionKind::HeartRate.as_str(),
            records_total: bundle.heart_rate.logs.len(),
            records_in_window: filtered.heart_rate.logs.len(),
        },
    ];

    let optional = [
        (
            SectionKind::BloodPressure,
            bundle.blood_pressure.as_ref().map(|s| s.logs.len()),
            filtered.blood_pressure.as_ref().map(|s| s.logs.len()),
        ),
        (
            SectionKind::BloodGlucose,
            bundle.blood_glucose.as_ref().map(|s| s.logs.len()),
            filtered.blood_glucose.as_ref().map(|s| s.logs.len()),
        ),
        (
            SectionKind::Nutrition,
            bundle.nutrition.as_ref().map(|s| s.logs.len()),
            filtered.nutrition.as_ref().map(|s| s.logs.len()),
        ),
        (
            SectionKind::Hydration,
            bundle.hydration.as_ref().map(|s| s.logs.len()),
            filtered.hydration.as_ref().map(|s| s.logs.len()),
        ),
    ];
    for (kind, total, in_window) in optional {
        if let (Some(total), Some(in_window)) = (total, in_window) {
            counts.push(SectionCount {
                section: kind.as_str(),
                records_total: total,
                records_in_window: in_window,
            });
        }
    }

    CheckResponse {
        patient: bundle.patient.name.clone(),
        date_range: timeframe.label(),
        sections: counts,
    }
}

/// Run the whole pipeline and write the PDF to `output_path`
pub fn generate_report<P: AsRef<Path>>(
    bundle: &HealthLogBundle,
    config: &ReportConfig,
    output_path: P,
) -> ReportResult<GenerateReportResponse> {
    let output_path = output_path.as_ref();
    let timeframe = config.timeframe()?;
    info!(period = %timeframe.label(), tz = %timeframe.timezone(), "building report");

    let report = build_report(bundle, &timeframe, config.today);

    let rendered = render::render_report_charts(&report, config.chart_width, config.chart_height);
    let charts_failed = rendered
        .iter()
        .flatten()
        .filter(|c| c.png.is_err())
        .count();
    if charts_failed > 0 {
        warn!(charts_failed, "some charts could not be rendered");
    }

    if let Some(dir) = &config.charts_dir {
        let written = render::save_chart_images(&report, &rendered, dir)?;
        info!(dir = %dir.display(), written, "chart images saved");
    }

    let pages = pdf::write_pdf(&report, &rendered, output_path)?;
    let total_records = report.record_count();
    info!(path = %output_path.display(), pages, total_records, "report written");

    Ok(GenerateReportResponse {
        success: true,
        file_path: output_path.display().to_string(),
        sections: report.sections.iter().map(|s| s.kind.as_str()).collect(),
        total_records,
        pages,
        charts_failed,
        date_range: report.header.period.clone(),
        build: BuildInfo::current(),
        message: format!(
            "Health report generated with {} records across {} sections",
            total_records,
            report.sections.len()
        ),
    })
}
