//! Input bundle
//!
//! The JSON document handed to the generator: one patient, one series per metric.
//! Temperature and heart rate are always reported; the other series are
//! optional and produce a report section only when present.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    BloodPressureLog, GlucoseLog, HeartRateLog, HydrationLog, NutritionLog, PatientInfo,
    TemperatureLog, TemperatureUnit,
};
use crate::analysis::benchmark::{
    default_calorie_goal, default_heart_rate_range, default_temperature_range,
};
use crate::analysis::{filter_logs, BloodPressureBenchmark, GlucoseBenchmark, Range, Timeframe};
use crate::error::{ReportError, ReportResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSeries {
    #[serde(default)]
    pub unit: TemperatureUnit,
    #[serde(default)]
    pub logs: Vec<TemperatureLog>,
    /// Normal range; defaults depend on `unit`
    #[serde(default)]
    pub benchmark: Option<Range>,
}

impl TemperatureSeries {
    pub fn benchmark(&self) -> Range {
        self.benchmark.unwrap_or_else(|| default_temperature_range(self.unit))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSeries {
    #[serde(default)]
    pub logs: Vec<HeartRateLog>,
    #[serde(default = "default_heart_rate_range")]
    pub benchmark: Range,
}

impl Default for HeartRateSeries {
    fn default() -> Self {
        Self {
            logs: Vec::new(),
            benchmark: default_heart_rate_range(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureSeries {
    #[serde(default)]
    pub logs: Vec<BloodPressureLog>,
    #[serde(default)]
    pub benchmark: BloodPressureBenchmark,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlucoseSeries {
    #[serde(default)]
    pub logs: Vec<GlucoseLog>,
    #[serde(default)]
    pub benchmark: GlucoseBenchmark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSeries {
    #[serde(default)]
    pub logs: Vec<NutritionLog>,
    /// Acceptable daily calorie range
    #[serde(default = "default_calorie_goal")]
    pub calorie_goal: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationSeries {
    #[serde(default)]
    pub logs: Vec<HydrationLog>,
    pub daily_goal_ml: f64,
}

/// Everything the report is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthLogBundle {
    pub patient: PatientInfo,
    #[serde(default)]
    pub temperature: TemperatureSeries,
    #[serde(default)]
    pub heart_rate: HeartRateSeries,
    #[serde(default)]
    pub blood_pressure: Option<BloodPressureSeries>,
    #[serde(default)]
    pub blood_glucose: Option<GlucoseSeries>,
    #[serde(default)]
    pub nutrition: Option<NutritionSeries>,
    #[serde(default)]
    pub hydration: Option<HydrationSeries>,
    /// Free-text clinical notes printed at the end of the report
    #[serde(default)]
    pub notes: Vec<String>,
}

fn check_finite(value: f64, what: &str) -> ReportResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ReportError::invalid_input(format!("{} must be a finite number", what)))
    }
}

fn check_non_negative(value: f64, what: &str) -> ReportResult<()> {
    check_finite(value, what)?;
    if value < 0.0 {
        return Err(ReportError::invalid_input(format!("{} cannot be negative ({})", what, value)));
    }
    Ok(())
}

impl HealthLogBundle {
    /// Read and validate a bundle from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading input bundle");
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> ReportResult<Self> {
        let bundle: HealthLogBundle = serde_json::from_str(raw)?;
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn validate(&self) -> ReportResult<()> {
        self.patient.validate()?;

        self.temperature.benchmark().validate("temperature")?;
        for log in &self.temperature.logs {
            check_finite(log.value, "temperature")?;
        }

        self.heart_rate.benchmark.validate("heart rate")?;
        for log in &self.heart_rate.logs {
            check_non_negative(log.bpm, "heart rate")?;
        }

        if let Some(bp) = &self.blood_pressure {
            bp.benchmark.validate()?;
            for log in &bp.logs {
                check_non_negative(log.systolic, "systolic")?;
                check_non_negative(log.diastolic, "diastolic")?;
                if let Some(pulse) = log.pulse {
                    check_non_negative(pulse, "pulse")?;
                }
            }
        }

        if let Some(glucose) = &self.blood_glucose {
            glucose.benchmark.validate()?;
            for log in &glucose.logs {
                check_non_negative(log.value, "glucose")?;
            }
        }

        if let Some(nutrition) = &self.nutrition {
            nutrition.calorie_goal.validate("calorie goal")?;
            if let Some(bad) = nutrition.logs.iter().find(|l| !l.nutrition.is_valid()) {
                return Err(ReportError::invalid_input(format!(
                    "nutrition entry at {} has negative or non-finite values",
                    bad.created_at
                )));
            }
        }

        if let Some(hydration) = &self.hydration {
            check_non_negative(hydration.daily_goal_ml, "daily hydration goal")?;
            if hydration.daily_goal_ml == 0.0 {
                return Err(ReportError::invalid_input("daily hydration goal must be positive"));
            }
            for log in &hydration.logs {
                check_non_negative(log.amount_ml, "hydration amount")?;
            }
        }

        Ok(())
    }

    /// Copy of the bundle keeping only entries inside the window.
    /// Optional series stay present (possibly empty) when they were provided.
    pub fn within(&self, timeframe: &Timeframe) -> HealthLogBundle {
        HealthLogBundle {
            patient: self.patient.clone(),
            temperature: TemperatureSeries {
                logs: filter_logs(&self.temperature.logs, timeframe),
                ..self.temperature.clone()
            },
            heart_rate: HeartRateSeries {
                logs: filter_logs(&self.heart_rate.logs, timeframe),
                benchmark: self.heart_rate.benchmark,
            },
            blood_pressure: self.blood_pressure.as_ref().map(|s| BloodPressureSeries {
                logs: filter_logs(&s.logs, timeframe),
                benchmark: s.benchmark,
            }),
            blood_glucose: self.blood_glucose.as_ref().map(|s| GlucoseSeries {
                logs: filter_logs(&s.logs, timeframe),
                benchmark: s.benchmark,
            }),
            nutrition: self.nutrition.as_ref().map(|s| NutritionSeries {
                logs: filter_logs(&s.logs, timeframe),
                calorie_goal: s.calorie_goal,
            }),
            hydration: self.hydration.as_ref().map(|s| HydrationSeries {
                logs: filter_logs(&s.logs, timeframe),
                daily_goal_ml: s.daily_goal_ml,
            }),
            notes: self.notes.clone(),
        }
    }

    /// Number of entries across all series
    pub fn record_count(&self) -> usize {
        self.temperature.logs.len()
            + self.heart_rate.logs.len()
            + self.blood_pressure.as_ref().map_or(0, |s| s.logs.len())
            + self.blood_glucose.as_ref().map_or(0, |s| s.logs.len())
            + self.nutrition.as_ref().map_or(0, |s| s.logs.len())
            + self.hydration.as_ref().map_or(0, |s| s.logs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    const MINIMAL: &str = r#"{ "patient": { "name": "Jane Doe", "dob": "1980-04-02" } }"#;

    #[test]
    fn test_minimal_bundle_uses_defaults() {
        let bundle = HealthLogBundle::from_json_str(MINIMAL).unwrap();
        assert!(bundle.temperature.logs.is_empty());
        assert_eq!(bundle.temperature.benchmark(), Range::new(36.1, 37.2));
        assert_eq!(bundle.heart_rate.benchmark, Range::new(60.0, 100.0));
        assert!(bundle.blood_pressure.is_none());
        assert!(bundle.hydration.is_none());
        assert_eq!(bundle.record_count(), 0);
    }

    #[test]
    fn test_fahrenheit_default_benchmark() {
        let bundle = HealthLogBundle::from_json_str(
            r#"{ "patient": { "name": "Jane", "dob": "1980-04-02" },
                 "temperature": { "unit": "fahrenheit", "logs": [] } }"#,
        )
        .unwrap();
        assert_eq!(bundle.temperature.benchmark(), Range::new(97.0, 99.0));
    }

    #[test]
    fn test_hydration_requires_positive_goal() {
        let result = HealthLogBundle::from_json_str(
            r#"{ "patient": { "name": "Jane", "dob": "1980-04-02" },
                 "hydration": { "daily_goal_ml": 0, "logs": [] } }"#,
        );
        assert!(matches!(result, Err(ReportError::InvalidInput(_))));
    }

    #[test]
    fn test_negative_intake_rejected() {
        let result = HealthLogBundle::from_json_str(
            r#"{ "patient": { "name": "Jane", "dob": "1980-04-02" },
                 "hydration": { "daily_goal_ml": 2000,
                   "logs": [ { "amount_ml": -50, "created_at": "2026-03-01T08:00:00Z" } ] } }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_inverted_benchmark_rejected() {
        let result = HealthLogBundle::from_json_str(
            r#"{ "patient": { "name": "Jane", "dob": "1980-04-02" },
                 "heart_rate": { "benchmark": { "min": 100, "max": 60 } } }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let result = HealthLogBundle::from_json_str("{ not json");
        assert!(matches!(result, Err(ReportError::Json(_))));
    }

    #[test]
    fn test_within_keeps_optional_sections_present() {
        let bundle = HealthLogBundle::from_json_str(
            r#"{ "patient": { "name": "Jane", "dob": "1980-04-02" },
                 "heart_rate": { "logs": [
                    { "bpm": 70, "measured_at": "2026-03-01T08:00:00Z" },
                    { "bpm": 75, "measured_at": "2026-03-09T08:00:00Z" } ] },
                 "blood_glucose": { "logs": [
                    { "value": 95, "context": "fasting",
                      "measured_at": "2026-02-01T07:00:00Z" } ] } }"#,
        )
        .unwrap();

        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tf = Timeframe::ending_on(today, 7, FixedOffset::east_opt(0).unwrap()).unwrap();
        let filtered = bundle.within(&tf);

        assert_eq!(filtered.heart_rate.logs.len(), 1);
        assert_eq!(filtered.heart_rate.logs[0].bpm, 75.0);
        let glucose = filtered.blood_glucose.expect("provided section stays present");
        assert!(glucose.logs.is_empty());
        assert!(filtered.blood_pressure.is_none());
    }
}
