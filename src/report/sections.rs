//! Section builders
//!
//! One function per metric. Each takes only its own (already filtered) series.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};

use super::chart::{
    Band, Bar, BarChart, ChartSpec, LineChart, LineSeries, ReferenceLine, StackSegment,
    StackedBarChart,
};
use super::{
    class_color, LegendEntry, Rgb, Section, SectionKind, SummaryLine, Table, TableRow,
    COLOR_BLACK, COLOR_BORDERLINE, COLOR_BP_TITLE, COLOR_GLUCOSE_TITLE, COLOR_HR_TITLE,
    COLOR_HYDRATION_TITLE, COLOR_LIGHT_GRAY, COLOR_NORMAL, COLOR_NUTRITION_TITLE, COLOR_OUTLIER,
    COLOR_TEMPERATURE_TITLE,
};
use crate::analysis::{
    average_daily, daily_hydration, daily_nutrition, daily_stats, ClassCounts, Classification,
    DailyStats, HydrationSummary, Range, SummaryStats, Timeframe, BORDERLINE_WINDOW,
};
use crate::models::{
    BloodPressureSeries, GlucoseContext, GlucoseSeries, HeartRateSeries, HydrationSeries,
    NutritionSeries, TemperatureSeries, Timestamped, VitalType,
};

const NO_READINGS: &str = "No readings in this period";

const COLOR_SYSTOLIC: Rgb = (255, 0, 0);
const COLOR_DIASTOLIC: Rgb = (0, 0, 255);
const COLOR_INTAKE: Rgb = (0, 112, 192);
const COLOR_EXCESS: Rgb = (112, 48, 160);
const COLOR_PROTEIN: Rgb = (192, 80, 77);
const COLOR_CARBS: Rgb = (247, 150, 70);
const COLOR_FAT: Rgb = (128, 100, 162);

// ============================================================================
// Axis Helpers
// ============================================================================

fn x_labels(timeframe: &Timeframe) -> Vec<String> {
    timeframe.days().map(|d| d.format("%m/%d").to_string()).collect()
}

/// Center of a day's slot on the x axis
fn day_slot(timeframe: &Timeframe, date: NaiveDate) -> f64 {
    (date - timeframe.first_day()).num_days() as f64
}

/// Position of a timestamp inside its day's slot
fn time_slot(timeframe: &Timeframe, ts: &DateTime<FixedOffset>) -> f64 {
    let local = ts.with_timezone(&timeframe.timezone());
    let seconds = local.num_seconds_from_midnight() as f64;
    day_slot(timeframe, local.date_naive()) - 0.5 + seconds / 86_400.0
}

fn fmt(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

fn empty_section(
    kind: SectionKind,
    title: &str,
    title_color: Rgb,
    extra: Vec<SummaryLine>,
) -> Section {
    let mut summary = vec![
        SummaryLine::new("Readings", "0"),
        SummaryLine::colored("Status", NO_READINGS, COLOR_BLACK),
    ];
    summary.extend(extra);
    Section {
        kind,
        title: title.to_string(),
        title_color,
        record_count: 0,
        summary,
        charts: Vec::new(),
        legend: Vec::new(),
        table: None,
    }
}

fn classification_legend(range: &Range, unit: &str, decimals: usize) -> Vec<LegendEntry> {
    vec![
        LegendEntry::new(format!("Normal ({} {})", range.format(decimals), unit), COLOR_NORMAL),
        LegendEntry::new(
            format!("Borderline (within {} {})", BORDERLINE_WINDOW, unit),
            COLOR_BORDERLINE,
        ),
        LegendEntry::new("Outlier", COLOR_OUTLIER),
    ]
}

fn daily_band(timeframe: &Timeframe, days: &[DailyStats], color: Rgb) -> Band {
    Band {
        points: days
            .iter()
            .map(|d| (day_slot(timeframe, d.date), d.summary.min, d.summary.max))
            .collect(),
        color,
    }
}

fn daily_table(
    days: &[DailyStats],
    decimals: usize,
    classify: impl Fn(f64) -> Classification,
) -> Table {
    let rows = days
        .iter()
        .map(|d| {
            let class = classify(d.summary.mean);
            TableRow {
                cells: vec![
                    d.date.format("%Y-%m-%d").to_string(),
                    d.day_of_week.to_string(),
                    d.summary.count.to_string(),
                    fmt(d.summary.mean, decimals),
                    fmt(d.summary.sd, decimals + 1),
                    fmt(d.summary.min, decimals),
                    fmt(d.summary.max, decimals),
                    class.label().to_string(),
                ],
                color: class_color(class),
            }
        })
        .collect();

    Table {
        headers: ["Date", "Day", "N", "Avg", "SD", "Low", "High", "Status"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        widths: vec![28.0, 16.0, 12.0, 22.0, 18.0, 22.0, 22.0, 28.0],
        colored_from: 3,
        rows,
    }
}

// ============================================================================
// Single-Range Vitals (temperature, heart rate)
// ============================================================================

struct Reading {
    at: DateTime<FixedOffset>,
    value: f64,
}

impl Timestamped for Reading {
    fn recorded_at(&self) -> DateTime<FixedOffset> {
        self.at
    }
}

struct SingleRangeMetric<'a> {
    kind: SectionKind,
    title: &'static str,
    title_color: Rgb,
    unit: &'a str,
    decimals: usize,
    benchmark: Range,
    readings: Vec<Reading>,
}

fn single_range_section(metric: SingleRangeMetric<'_>, timeframe: &Timeframe) -> Section {
    let SingleRangeMetric {
        kind,
        title,
        title_color,
        unit,
        decimals,
        benchmark,
        readings,
    } = metric;

    let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
    let Some(overall) = SummaryStats::from_values(&values) else {
        return empty_section(kind, title, title_color, vec![SummaryLine::new(
            "Normal range",
            format!("{} {}", benchmark.format(decimals), unit),
        )]);
    };

    let classes: Vec<Classification> = values.iter().map(|v| benchmark.classify(*v)).collect();
    let counts = ClassCounts::tally(classes.iter().copied());
    let mean_class = benchmark.classify(overall.mean);

    let mut summary = vec![
        SummaryLine::new("Readings", overall.count.to_string()),
        SummaryLine::colored(
            "Average",
            format!("{} {} ({})", fmt(overall.mean, decimals), unit, mean_class.label()),
            class_color(mean_class),
        ),
        SummaryLine::new(
            "Range",
            format!("{} - {} {}", fmt(overall.min, decimals), fmt(overall.max, decimals), unit),
        ),
        SummaryLine::new("Normal range", format!("{} {}", benchmark.format(decimals), unit)),
        SummaryLine::new("Classification", counts.format()),
    ];
    if let (Some(latest), Some(latest_class)) = (readings.last(), classes.last()) {
        summary.push(SummaryLine::colored(
            "Latest",
            format!(
                "{} {} on {}",
                fmt(latest.value, decimals),
                unit,
                latest.at.with_timezone(&timeframe.timezone()).format("%Y-%m-%d %H:%M")
            ),
            class_color(*latest_class),
        ));
    }

    let days = daily_stats(&readings, timeframe, |r| r.value);

    let series = LineSeries {
        name: title.to_string(),
        color: title_color,
        points: readings.iter().map(|r| (time_slot(timeframe, &r.at), r.value)).collect(),
        point_colors: classes.iter().map(|c| class_color(*c)).collect(),
        band: Some(daily_band(timeframe, &days, title_color)),
    };

    let chart = ChartSpec::Line(LineChart {
        title: format!("{} Trend", title),
        y_label: unit.to_string(),
        x_labels: x_labels(timeframe),
        series: vec![series],
        reference_lines: vec![
            ReferenceLine { value: benchmark.min, color: COLOR_NORMAL },
            ReferenceLine { value: benchmark.max, color: COLOR_NORMAL },
        ],
    });

    Section {
        kind,
        title: title.to_string(),
        title_color,
        record_count: readings.len(),
        summary,
        charts: vec![chart],
        legend: classification_legend(&benchmark, unit, decimals),
        table: Some(daily_table(&days, decimals, |v| benchmark.classify(v))),
    }
}

pub fn temperature_section(series: &TemperatureSeries, timeframe: &Timeframe) -> Section {
    single_range_section(
        SingleRangeMetric {
            kind: SectionKind::Temperature,
            title: VitalType::Temperature.display_name(),
            title_color: COLOR_TEMPERATURE_TITLE,
            unit: series.unit.label(),
            decimals: 1,
            benchmark: series.benchmark(),
            readings: series
                .logs
                .iter()
                .map(|l| Reading { at: l.measured_at, value: l.value })
                .collect(),
        },
        timeframe,
    )
}

pub fn heart_rate_section(series: &HeartRateSeries, timeframe: &Timeframe) -> Section {
    single_range_section(
        SingleRangeMetric {
            kind: SectionKind::HeartRate,
            title: VitalType::HeartRate.display_name(),
            title_color: COLOR_HR_TITLE,
            unit: VitalType::HeartRate.default_unit(),
            decimals: 0,
            benchmark: series.benchmark,
            readings: series
                .logs
                .iter()
                .map(|l| Reading { at: l.measured_at, value: l.bpm })
                .collect(),
        },
        timeframe,
    )
}

// ============================================================================
// Blood Pressure
// ============================================================================

pub fn blood_pressure_section(series: &BloodPressureSeries, timeframe: &Timeframe) -> Section {
    let title = VitalType::BloodPressure.display_name();
    let unit = VitalType::BloodPressure.default_unit();
    let benchmark = &series.benchmark;

    let systolic: Vec<f64> = series.logs.iter().map(|l| l.systolic).collect();
    let diastolic: Vec<f64> = series.logs.iter().map(|l| l.diastolic).collect();
    let (Some(sys), Some(dia)) =
        (SummaryStats::from_values(&systolic), SummaryStats::from_values(&diastolic))
    else {
        return empty_section(SectionKind::BloodPressure, title, COLOR_BP_TITLE, Vec::new());
    };

    let classes: Vec<Classification> = series.logs.iter().map(|l| benchmark.classify(l)).collect();
    let counts = ClassCounts::tally(classes.iter().copied());
    let avg_class = benchmark.classify_values(sys.mean, dia.mean);
    let avg_tier = benchmark.tier(sys.mean, dia.mean);

    let sys_days = daily_stats(&series.logs, timeframe, |l| l.systolic);
    let dia_days = daily_stats(&series.logs, timeframe, |l| l.diastolic);

    let mut summary = vec![
        SummaryLine::new("Readings", sys.count.to_string()),
        SummaryLine::new("Days monitored", sys_days.len().to_string()),
        SummaryLine::colored(
            "Overall average",
            format!("{:.0}/{:.0} {}", sys.mean, dia.mean, unit),
            class_color(avg_class),
        ),
        SummaryLine::colored("Category", avg_tier.label(), class_color(avg_class)),
        SummaryLine::new("Systolic range", format!("{:.0} - {:.0} {}", sys.min, sys.max, unit)),
        SummaryLine::new("Diastolic range", format!("{:.0} - {:.0} {}", dia.min, dia.max, unit)),
        SummaryLine::new("Classification", counts.format()),
    ];
    let pulses: Vec<f64> = series.logs.iter().filter_map(|l| l.pulse).collect();
    if let Some(pulse) = SummaryStats::from_values(&pulses) {
        summary.push(SummaryLine::new("Average pulse", format!("{:.0} bpm", pulse.mean)));
    }
    if let (Some(latest), Some(latest_class)) = (series.logs.last(), classes.last()) {
        summary.push(SummaryLine::colored(
            "Latest",
            format!(
                "{} on {}",
                latest.format_value(),
                latest.measured_at.with_timezone(&timeframe.timezone()).format("%Y-%m-%d %H:%M")
            ),
            class_color(*latest_class),
        ));
    }

    let point_colors: Vec<Rgb> = classes.iter().map(|c| class_color(*c)).collect();
    let chart = ChartSpec::Line(LineChart {
        title: format!("{} Trend", title),
        y_label: unit.to_string(),
        x_labels: x_labels(timeframe),
        series: vec![
            LineSeries {
                name: "Systolic".to_string(),
                color: COLOR_SYSTOLIC,
                points: series
                    .logs
                    .iter()
                    .map(|l| (time_slot(timeframe, &l.measured_at), l.systolic))
                    .collect(),
                point_colors: point_colors.clone(),
                band: Some(daily_band(timeframe, &sys_days, COLOR_SYSTOLIC)),
            },
            LineSeries {
                name: "Diastolic".to_string(),
                color: COLOR_DIASTOLIC,
                points: series
                    .logs
                    .iter()
                    .map(|l| (time_slot(timeframe, &l.measured_at), l.diastolic))
                    .collect(),
                point_colors,
                band: Some(daily_band(timeframe, &dia_days, COLOR_DIASTOLIC)),
            },
        ],
        reference_lines: vec![
            ReferenceLine { value: benchmark.systolic.stage2.min, color: COLOR_OUTLIER },
            ReferenceLine { value: benchmark.systolic.stage1.min, color: COLOR_BORDERLINE },
        ],
    });

    let rows = sys_days
        .iter()
        .zip(dia_days.iter())
        .map(|(s, d)| {
            let class = benchmark.classify_values(s.summary.mean, d.summary.mean);
            TableRow {
                cells: vec![
                    s.date.format("%Y-%m-%d").to_string(),
                    s.day_of_week.to_string(),
                    s.summary.count.to_string(),
                    format!("{:.0}", s.summary.mean),
                    format!("{:.1}", s.summary.sd),
                    format!("{:.0}", s.summary.min),
                    format!("{:.0}", s.summary.max),
                    format!("{:.0}", d.summary.mean),
                    format!("{:.1}", d.summary.sd),
                    format!("{:.0}", d.summary.min),
                    format!("{:.0}", d.summary.max),
                ],
                color: class_color(class),
            }
        })
        .collect();

    let table = Table {
        headers: [
            "Date", "Day", "N", "Sys Avg", "SD", "Low", "High", "Dia Avg", "SD", "Low", "High",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect(),
        widths: vec![20.0, 12.0, 10.0, 22.0, 14.0, 14.0, 14.0, 22.0, 14.0, 14.0, 14.0],
        colored_from: 3,
        rows,
    };

    let s = &benchmark.systolic;
    let legend = vec![
        LegendEntry::new(format!("Normal ({})", s.normal.format(0)), COLOR_NORMAL),
        LegendEntry::new(format!("Elevated ({})", s.elevated.format(0)), COLOR_BORDERLINE),
        LegendEntry::new(format!("Stage 1 HTN ({})", s.stage1.format(0)), COLOR_OUTLIER),
        LegendEntry::new(format!("Stage 2 HTN (>={:.0})", s.stage2.min), COLOR_OUTLIER),
    ];

    Section {
        kind: SectionKind::BloodPressure,
        title: title.to_string(),
        title_color: COLOR_BP_TITLE,
        record_count: series.logs.len(),
        summary,
        charts: vec![chart],
        legend,
        table: Some(table),
    }
}

// ============================================================================
// Blood Glucose
// ============================================================================

fn context_color(context: GlucoseContext) -> Rgb {
    match context {
        GlucoseContext::Fasting => (0, 112, 192),
        GlucoseContext::BeforeMeal => (0, 150, 136),
        GlucoseContext::AfterMeal => (192, 0, 0),
        GlucoseContext::Bedtime => (112, 48, 160),
        GlucoseContext::Random => (128, 128, 128),
    }
}

pub fn glucose_section(series: &GlucoseSeries, timeframe: &Timeframe) -> Section {
    let title = VitalType::Glucose.display_name();
    let unit = VitalType::Glucose.default_unit();
    let benchmark = &series.benchmark;

    let values: Vec<f64> = series.logs.iter().map(|l| l.value).collect();
    let Some(overall) = SummaryStats::from_values(&values) else {
        return empty_section(SectionKind::BloodGlucose, title, COLOR_GLUCOSE_TITLE, Vec::new());
    };

    let classes: Vec<Classification> = series.logs.iter().map(|l| benchmark.classify(l)).collect();
    let counts = ClassCounts::tally(classes.iter().copied());

    let mut summary = vec![
        SummaryLine::new("Readings", overall.count.to_string()),
        SummaryLine::new(
            "Average",
            format!("{:.0} {} (range {:.0} - {:.0})", overall.mean, unit, overall.min, overall.max),
        ),
        SummaryLine::new("Classification", counts.format()),
    ];

    let mut series_by_context: BTreeMap<GlucoseContext, LineSeries> = BTreeMap::new();
    for (log, class) in series.logs.iter().zip(classes.iter()) {
        let entry = series_by_context.entry(log.context).or_insert_with(|| LineSeries {
            name: log.context.display_name().to_string(),
            color: context_color(log.context),
            points: Vec::new(),
            point_colors: Vec::new(),
            band: None,
        });
        entry.points.push((time_slot(timeframe, &log.measured_at), log.value));
        entry.point_colors.push(class_color(*class));
    }

    for context in GlucoseContext::ALL {
        let readings: Vec<f64> = series
            .logs
            .iter()
            .filter(|l| l.context == context)
            .map(|l| l.value)
            .collect();
        if let Some(stats) = SummaryStats::from_values(&readings) {
            let range = benchmark.range_for(context);
            let class = range.classify(stats.mean);
            summary.push(SummaryLine::colored(
                context.display_name(),
                format!(
                    "avg {:.0} {} over {} readings (normal {})",
                    stats.mean, unit, stats.count, range.format(0)
                ),
                class_color(class),
            ));
        }
    }

    let chart = ChartSpec::Line(LineChart {
        title: format!("{} Trend", title),
        y_label: unit.to_string(),
        x_labels: x_labels(timeframe),
        series: series_by_context.into_values().collect(),
        reference_lines: Vec::new(),
    });

    let tz = timeframe.timezone();
    let rows = series
        .logs
        .iter()
        .zip(classes.iter())
        .map(|(log, class)| {
            let local = log.measured_at.with_timezone(&tz);
            TableRow {
                cells: vec![
                    local.format("%Y-%m-%d").to_string(),
                    local.format("%H:%M").to_string(),
                    log.context.display_name().to_string(),
                    format!("{:.0}", log.value),
                    benchmark.range_for(log.context).format(0),
                    class.label().to_string(),
                ],
                color: class_color(*class),
            }
        })
        .collect();

    let table = Table {
        headers: ["Date", "Time", "Context", "mg/dL", "Normal", "Status"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        widths: vec![28.0, 18.0, 30.0, 20.0, 26.0, 28.0],
        colored_from: 3,
        rows,
    };

    let mut legend = vec![
        LegendEntry::new("Normal", COLOR_NORMAL),
        LegendEntry::new(
            format!("Borderline (within {} {})", BORDERLINE_WINDOW, unit),
            COLOR_BORDERLINE,
        ),
        LegendEntry::new("Outlier", COLOR_OUTLIER),
    ];
    legend.push(LegendEntry::new("Ranges depend on measurement context", COLOR_BLACK));

    Section {
        kind: SectionKind::BloodGlucose,
        title: title.to_string(),
        title_color: COLOR_GLUCOSE_TITLE,
        record_count: series.logs.len(),
        summary,
        charts: vec![chart],
        legend,
        table: Some(table),
    }
}

// ============================================================================
// Nutrition
// ============================================================================

pub fn nutrition_section(series: &NutritionSeries, timeframe: &Timeframe) -> Section {
    let title = "Nutrition";
    let goal = series.calorie_goal;
    let days = daily_nutrition(&series.logs, &goal, timeframe);

    if days.is_empty() {
        let mut section = empty_section(
            SectionKind::Nutrition,
            title,
            COLOR_NUTRITION_TITLE,
            vec![SummaryLine::new("Calorie goal", format!("{} kcal", goal.format(0)))],
        );
        section.summary[0] = SummaryLine::new("Entries", "0");
        return section;
    }

    let average = average_daily(&days);
    let counts = ClassCounts::tally(days.iter().map(|d| d.classification));
    let avg_class = goal.classify(average.calories);

    let summary = vec![
        SummaryLine::new("Entries", series.logs.len().to_string()),
        SummaryLine::new("Days logged", days.len().to_string()),
        SummaryLine::colored(
            "Average daily calories",
            format!("{:.0} kcal", average.calories),
            class_color(avg_class),
        ),
        SummaryLine::new("Calorie goal", format!("{} kcal", goal.format(0))),
        SummaryLine::new(
            "Average macros",
            format!(
                "protein {:.0} g, carbs {:.0} g, fat {:.0} g",
                average.protein, average.carbs, average.fat
            ),
        ),
        SummaryLine::new("Days by goal", counts.format()),
    ];

    let labels = x_labels(timeframe);
    let slots = labels.len();

    let bars = days
        .iter()
        .map(|d| Bar {
            slot: day_slot(timeframe, d.date) as usize,
            value: d.totals.calories,
            color: class_color(d.classification),
        })
        .collect();

    let mut protein = vec![0.0; slots];
    let mut carbs = vec![0.0; slots];
    let mut fat = vec![0.0; slots];
    for d in &days {
        let slot = day_slot(timeframe, d.date) as usize;
        if slot < slots {
            let (p, c, f) = d.totals.macro_calories();
            protein[slot] = p;
            carbs[slot] = c;
            fat[slot] = f;
        }
    }

    let calorie_chart = ChartSpec::Bar(BarChart {
        title: "Daily Calories".to_string(),
        y_label: "kcal".to_string(),
        x_labels: labels.clone(),
        bars,
        reference_lines: vec![
            ReferenceLine { value: goal.min, color: COLOR_NORMAL },
            ReferenceLine { value: goal.max, color: COLOR_NORMAL },
        ],
    });

    let has_macros = protein.iter().chain(&carbs).chain(&fat).any(|v| *v > 0.0);
    let mut charts = vec![calorie_chart];
    if has_macros {
        charts.push(ChartSpec::StackedBar(StackedBarChart {
            title: "Calories by Macronutrient".to_string(),
            y_label: "kcal".to_string(),
            x_labels: labels,
            segments: vec![
                StackSegment { name: "Protein".to_string(), color: COLOR_PROTEIN, values: protein },
                StackSegment { name: "Carbs".to_string(), color: COLOR_CARBS, values: carbs },
                StackSegment { name: "Fat".to_string(), color: COLOR_FAT, values: fat },
            ],
            reference_lines: Vec::new(),
        }));
    }

    let rows = days
        .iter()
        .map(|d| TableRow {
            cells: vec![
                d.date.format("%Y-%m-%d").to_string(),
                d.day_of_week.to_string(),
                d.entries.to_string(),
                format!("{:.0}", d.totals.calories),
                format!("{:.0}", d.totals.protein),
                format!("{:.0}", d.totals.carbs),
                format!("{:.0}", d.totals.fat),
                d.classification.label().to_string(),
            ],
            color: class_color(d.classification),
        })
        .collect();

    let table = Table {
        headers: ["Date", "Day", "Entries", "kcal", "Protein g", "Carbs g", "Fat g", "Status"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        widths: vec![28.0, 14.0, 18.0, 20.0, 22.0, 22.0, 18.0, 28.0],
        colored_from: 3,
        rows,
    };

    let mut legend = classification_legend(&goal, "kcal", 0);
    if has_macros {
        legend.extend([
            LegendEntry::new("Protein", COLOR_PROTEIN),
            LegendEntry::new("Carbs", COLOR_CARBS),
            LegendEntry::new("Fat", COLOR_FAT),
        ]);
    }

    Section {
        kind: SectionKind::Nutrition,
        title: title.to_string(),
        title_color: COLOR_NUTRITION_TITLE,
        record_count: series.logs.len(),
        summary,
        charts,
        legend,
        table: Some(table),
    }
}

// ============================================================================
// Hydration
// ============================================================================

pub fn hydration_section(series: &HydrationSeries, timeframe: &Timeframe) -> Section {
    let title = "Hydration";
    let goal = series.daily_goal_ml;

    if series.logs.is_empty() {
        let mut section = empty_section(
            SectionKind::Hydration,
            title,
            COLOR_HYDRATION_TITLE,
            vec![SummaryLine::new("Daily goal", format!("{:.0} ml", goal))],
        );
        section.summary[0] = SummaryLine::new("Entries", "0");
        return section;
    }

    let days = daily_hydration(&series.logs, goal, timeframe);
    let totals = HydrationSummary::from_days(&days);
    let met_color = if totals.days_goal_met == totals.days {
        COLOR_NORMAL
    } else {
        COLOR_BORDERLINE
    };

    let summary = vec![
        SummaryLine::new("Entries", series.logs.len().to_string()),
        SummaryLine::new("Daily goal", format!("{:.0} ml", goal)),
        SummaryLine::new("Average daily intake", format!("{:.0} ml", totals.average_daily_ml)),
        SummaryLine::colored(
            "Days goal met",
            format!("{} of {}", totals.days_goal_met, totals.days),
            met_color,
        ),
        SummaryLine::new("Total intake", format!("{:.0} ml", totals.total_ml)),
    ];

    let chart = ChartSpec::StackedBar(StackedBarChart {
        title: "Daily Hydration".to_string(),
        y_label: "ml".to_string(),
        x_labels: x_labels(timeframe),
        segments: vec![
            StackSegment {
                name: "Intake".to_string(),
                color: COLOR_INTAKE,
                values: days.iter().map(|d| d.bar.intake).collect(),
            },
            StackSegment {
                name: "Remaining to goal".to_string(),
                color: COLOR_LIGHT_GRAY,
                values: days.iter().map(|d| d.bar.goal_leftover).collect(),
            },
            StackSegment {
                name: "Over goal".to_string(),
                color: COLOR_EXCESS,
                values: days.iter().map(|d| d.bar.excess).collect(),
            },
        ],
        reference_lines: vec![ReferenceLine { value: goal, color: COLOR_NORMAL }],
    });

    let rows = days
        .iter()
        .map(|d| TableRow {
            cells: vec![
                d.date.format("%Y-%m-%d").to_string(),
                crate::analysis::stats::day_of_week_abbrev(&d.date).to_string(),
                format!("{:.0}", d.consumed_ml),
                format!("{:.0}", d.goal_ml),
                format!("{:.0}", d.bar.goal_leftover),
                format!("{:.0}", d.bar.excess),
            ],
            color: if d.goal_met() { COLOR_NORMAL } else { COLOR_BORDERLINE },
        })
        .collect();

    let table = Table {
        headers: ["Date", "Day", "Consumed ml", "Goal ml", "Remaining", "Excess"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        widths: vec![28.0, 14.0, 28.0, 24.0, 24.0, 24.0],
        colored_from: 2,
        rows,
    };

    Section {
        kind: SectionKind::Hydration,
        title: title.to_string(),
        title_color: COLOR_HYDRATION_TITLE,
        record_count: series.logs.len(),
        summary,
        charts: vec![chart],
        legend: vec![
            LegendEntry::new("Intake", COLOR_INTAKE),
            LegendEntry::new("Remaining to goal", COLOR_LIGHT_GRAY),
            LegendEntry::new("Over goal", COLOR_EXCESS),
        ],
        table: Some(table),
    }
}
