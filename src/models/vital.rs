//! Vital models
//!
//! Measurement logs for temperature, heart rate, blood pressure and blood glucose.
//! All vitals are filtered on the time the measurement was taken.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::Timestamped;

/// Vital type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalType {
    Temperature,
    HeartRate,
    BloodPressure,
    Glucose,
}

impl VitalType {
    pub fn display_name(&self) -> &'static str {
        match self {
            VitalType::Temperature => "Temperature",
            VitalType::HeartRate => "Heart Rate",
            VitalType::BloodPressure => "Blood Pressure",
            VitalType::Glucose => "Blood Glucose",
        }
    }

    /// Default unit for this vital type
    pub fn default_unit(&self) -> &'static str {
        match self {
            VitalType::Temperature => "C",
            VitalType::HeartRate => "bpm",
            VitalType::BloodPressure => "mmHg",
            VitalType::Glucose => "mg/dL",
        }
    }
}

/// Temperature scale of a temperature series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Unit label; builtin PDF fonts have no reliable degree sign
    pub fn label(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureLog {
    pub value: f64,
    pub measured_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateLog {
    pub bpm: f64,
    pub measured_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureLog {
    pub systolic: f64,
    pub diastolic: f64,
    #[serde(default)]
    pub pulse: Option<f64>,
    pub measured_at: DateTime<FixedOffset>,
}

impl BloodPressureLog {
    pub fn format_value(&self) -> String {
        format!("{}/{} mmHg", self.systolic.round() as i32, self.diastolic.round() as i32)
    }
}

/// When a glucose reading was taken relative to meals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlucoseContext {
    Fasting,
    BeforeMeal,
    AfterMeal,
    Bedtime,
    Random,
}

impl GlucoseContext {
    pub const ALL: [GlucoseContext; 5] = [
        GlucoseContext::Fasting,
        GlucoseContext::BeforeMeal,
        GlucoseContext::AfterMeal,
        GlucoseContext::Bedtime,
        GlucoseContext::Random,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            GlucoseContext::Fasting => "Fasting",
            GlucoseContext::BeforeMeal => "Before meal",
            GlucoseContext::AfterMeal => "After meal",
            GlucoseContext::Bedtime => "Bedtime",
            GlucoseContext::Random => "Random",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseLog {
    pub value: f64,
    pub context: GlucoseContext,
    pub measured_at: DateTime<FixedOffset>,
}

impl Timestamped for TemperatureLog {
    fn recorded_at(&self) -> DateTime<FixedOffset> {
        self.measured_at
    }
}

impl Timestamped for HeartRateLog {
    fn recorded_at(&self) -> DateTime<FixedOffset> {
        self.measured_at
    }
}

impl Timestamped for BloodPressureLog {
    fn recorded_at(&self) -> DateTime<FixedOffset> {
        self.measured_at
    }
}

impl Timestamped for GlucoseLog {
    fn recorded_at(&self) -> DateTime<FixedOffset> {
        self.measured_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glucose_context_from_json() {
        let log: GlucoseLog = serde_json::from_str(
            r#"{"value": 104, "context": "after_meal",
                "measured_at": "2026-03-01T13:30:00+01:00"}"#,
        )
        .unwrap();
        assert_eq!(log.context, GlucoseContext::AfterMeal);
        assert_eq!(log.measured_at.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_bp_format_value() {
        let log: BloodPressureLog = serde_json::from_str(
            r#"{"systolic": 121.6, "diastolic": 79.2, "measured_at": "2026-03-01T08:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(log.format_value(), "122/79 mmHg");
        assert_eq!(log.pulse, None);
    }
}
