//! Summary statistics
//!
//! Overall and per-day statistics for a series of readings.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::{Classification, Timeframe};
use crate::models::Timestamped;

/// Count, mean, sample standard deviation and extremes of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub sd: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    /// `None` for an empty series
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self {
            count: values.len(),
            mean,
            sd: calculate_std_dev(values, mean),
            min: values.iter().cloned().fold(f64::INFINITY, f64::min),
            max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

fn calculate_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

pub fn day_of_week_abbrev(date: &NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Statistics for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub day_of_week: &'static str,
    pub summary: SummaryStats,
}

/// Group readings by local calendar day and summarise each day, oldest first.
/// Days without readings are omitted.
pub fn daily_stats<T, F>(logs: &[T], timeframe: &Timeframe, value: F) -> Vec<DailyStats>
where
    T: Timestamped,
    F: Fn(&T) -> f64,
{
    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();

    for log in logs {
        let date = timeframe.local_date(&log.recorded_at());
        by_date.entry(date).or_default().push(value(log));
    }

    by_date
        .into_iter()
        .filter_map(|(date, values)| {
            SummaryStats::from_values(&values).map(|summary| DailyStats {
                date,
                day_of_week: day_of_week_abbrev(&date),
                summary,
            })
        })
        .collect()
}

/// How many readings fell in each classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub normal: usize,
    pub borderline: usize,
    pub outlier: usize,
}

impl ClassCounts {
    pub fn tally<I: IntoIterator<Item = Classification>>(classes: I) -> Self {
        let mut counts = Self::default();
        for class in classes {
            counts.add(class);
        }
        counts
    }

    pub fn add(&mut self, class: Classification) {
        match class {
            Classification::Normal => self.normal += 1,
            Classification::Borderline => self.borderline += 1,
            Classification::Outlier => self.outlier += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.normal + self.borderline + self.outlier
    }

    pub fn format(&self) -> String {
        format!(
            "{} normal, {} borderline, {} outlier",
            self.normal, self.borderline, self.outlier
        )
    }
}
