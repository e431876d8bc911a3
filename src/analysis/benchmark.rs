//! Benchmark classification
//!
//! Every reading is classified as normal, borderline or outlier against a
//! benchmark. Three benchmark shapes exist: a single range (temperature, heart
//! rate, daily calories), a four-tier range (each blood pressure component) and
//! a range per measurement context (glucose).

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::models::{BloodPressureLog, GlucoseContext, GlucoseLog, TemperatureUnit};

/// Width of the borderline band on each side of a normal range
pub const BORDERLINE_WINDOW: f64 = 1.0;

/// Three-tier classification, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Normal,
    Borderline,
    Outlier,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Normal => "Normal",
            Classification::Borderline => "Borderline",
            Classification::Outlier => "Outlier",
        }
    }

    /// The more severe of two classifications
    pub fn worst(self, other: Classification) -> Classification {
        self.max(other)
    }
}

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Within one unit outside the range, on either side
    pub fn in_borderline_window(&self, value: f64) -> bool {
        (value >= self.min - BORDERLINE_WINDOW && value < self.min)
            || (value > self.max && value <= self.max + BORDERLINE_WINDOW)
    }

    pub fn classify(&self, value: f64) -> Classification {
        if self.contains(value) {
            Classification::Normal
        } else if self.in_borderline_window(value) {
            Classification::Borderline
        } else {
            Classification::Outlier
        }
    }

    pub fn validate(&self, what: &str) -> ReportResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ReportError::invalid_input(format!("{} range must be finite", what)));
        }
        if self.min > self.max {
            return Err(ReportError::invalid_input(format!(
                "{} range min {} is greater than max {}",
                what, self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn format(&self, decimals: usize) -> String {
        format!("{:.*}-{:.*}", decimals, self.min, decimals, self.max)
    }
}

/// Default normal body temperature range for a unit
pub fn default_temperature_range(unit: TemperatureUnit) -> Range {
    match unit {
        TemperatureUnit::Celsius => Range::new(36.1, 37.2),
        TemperatureUnit::Fahrenheit => Range::new(97.0, 99.0),
    }
}

pub fn default_heart_rate_range() -> Range {
    Range::new(60.0, 100.0)
}

pub fn default_calorie_goal() -> Range {
    Range::new(1800.0, 2200.0)
}

/// Blood pressure tier label used in tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum BpTier {
    Normal,
    Low,
    Elevated,
    Stage1,
    Stage2,
}

impl BpTier {
    pub fn label(&self) -> &'static str {
        match self {
            BpTier::Normal => "Normal",
            BpTier::Low => "Low",
            BpTier::Elevated => "Elevated",
            BpTier::Stage1 => "Stage 1 HTN",
            BpTier::Stage2 => "Stage 2 HTN",
        }
    }
}

/// Four consecutive ranges for one blood pressure component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourTierRange {
    pub normal: Range,
    pub elevated: Range,
    pub stage1: Range,
    pub stage2: Range,
}

impl FourTierRange {
    /// Tier of a value; a value in the gap between two tiers belongs to the higher one
    pub fn tier(&self, value: f64) -> BpTier {
        if value < self.normal.min {
            BpTier::Low
        } else if value >= self.stage2.min {
            BpTier::Stage2
        } else if value >= self.stage1.min {
            BpTier::Stage1
        } else if value >= self.elevated.min {
            BpTier::Elevated
        } else if value <= self.normal.max {
            BpTier::Normal
        } else {
            BpTier::Elevated
        }
    }

    /// Normal tier is normal; the elevated tier and the one-unit window around
    /// the normal tier are borderline; everything else is an outlier
    pub fn classify(&self, value: f64) -> Classification {
        if self.normal.contains(value) {
            Classification::Normal
        } else if self.elevated.contains(value) || self.normal.in_borderline_window(value) {
            Classification::Borderline
        } else {
            Classification::Outlier
        }
    }

    pub fn validate(&self, what: &str) -> ReportResult<()> {
        self.normal.validate(what)?;
        self.elevated.validate(what)?;
        self.stage1.validate(what)?;
        self.stage2.validate(what)?;

        let tiers = [self.normal, self.elevated, self.stage1, self.stage2];
        if tiers.windows(2).any(|w| w[0].max >= w[1].min) {
            return Err(ReportError::invalid_input(format!(
                "{} tiers must be ascending and non-overlapping",
                what
            )));
        }
        Ok(())
    }
}

/// Benchmark for systolic and diastolic readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureBenchmark {
    pub systolic: FourTierRange,
    pub diastolic: FourTierRange,
}

impl Default for BloodPressureBenchmark {
    fn default() -> Self {
        Self {
            systolic: FourTierRange {
                normal: Range::new(90.0, 119.0),
                elevated: Range::new(120.0, 129.0),
                stage1: Range::new(130.0, 139.0),
                stage2: Range::new(140.0, 250.0),
            },
            diastolic: FourTierRange {
                normal: Range::new(60.0, 79.0),
                elevated: Range::new(80.0, 84.0),
                stage1: Range::new(85.0, 89.0),
                stage2: Range::new(90.0, 150.0),
            },
        }
    }
}

impl BloodPressureBenchmark {
    /// A reading is as severe as its worse component
    pub fn classify(&self, log: &BloodPressureLog) -> Classification {
        self.classify_values(log.systolic, log.diastolic)
    }

    pub fn classify_values(&self, systolic: f64, diastolic: f64) -> Classification {
        self.systolic
            .classify(systolic)
            .worst(self.diastolic.classify(diastolic))
    }

    pub fn tier(&self, systolic: f64, diastolic: f64) -> BpTier {
        self.systolic.tier(systolic).max(self.diastolic.tier(diastolic))
    }

    pub fn validate(&self) -> ReportResult<()> {
        self.systolic.validate("systolic")?;
        self.diastolic.validate("diastolic")
    }
}

/// Normal glucose range per measurement context (mg/dL)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlucoseBenchmark {
    pub fasting: Range,
    pub before_meal: Range,
    pub after_meal: Range,
    pub bedtime: Range,
    pub random: Range,
}

impl Default for GlucoseBenchmark {
    fn default() -> Self {
        Self {
            fasting: Range::new(70.0, 99.0),
            before_meal: Range::new(70.0, 130.0),
            after_meal: Range::new(70.0, 179.0),
            bedtime: Range::new(90.0, 150.0),
            random: Range::new(70.0, 139.0),
        }
    }
}

impl GlucoseBenchmark {
    pub fn range_for(&self, context: GlucoseContext) -> Range {
        match context {
            GlucoseContext::Fasting => self.fasting,
            GlucoseContext::BeforeMeal => self.before_meal,
            GlucoseContext::AfterMeal => self.after_meal,
            GlucoseContext::Bedtime => self.bedtime,
            GlucoseContext::Random => self.random,
        }
    }

    pub fn classify(&self, log: &GlucoseLog) -> Classification {
        self.range_for(log.context).classify(log.value)
    }

    pub fn validate(&self) -> ReportResult<()> {
        for context in GlucoseContext::ALL {
            self.range_for(context).validate(context.display_name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_single_range_boundaries() {
        let range = Range::new(60.0, 100.0);

        assert_eq!(range.classify(60.0), Classification::Normal);
        assert_eq!(range.classify(100.0), Classification::Normal);
        assert_eq!(range.classify(59.0), Classification::Borderline);
        assert_eq!(range.classify(101.0), Classification::Borderline);
        assert_eq!(range.classify(58.9), Classification::Outlier);
        assert_eq!(range.classify(101.1), Classification::Outlier);
        assert_eq!(range.classify(80.0), Classification::Normal);
    }

    #[test]
    fn test_single_range_fractional_boundaries() {
        let range = default_temperature_range(TemperatureUnit::Celsius);

        assert_eq!(range.classify(36.1), Classification::Normal);
        assert_eq!(range.classify(37.2), Classification::Normal);
        assert_eq!(range.classify(35.5), Classification::Borderline);
        assert_eq!(range.classify(38.2), Classification::Borderline);
        assert_eq!(range.classify(38.3), Classification::Outlier);
        assert_eq!(range.classify(35.0), Classification::Outlier);
    }

    #[test]
    fn test_four_tier_boundaries() {
        let systolic = BloodPressureBenchmark::default().systolic;

        assert_eq!(systolic.classify(90.0), Classification::Normal);
        assert_eq!(systolic.classify(119.0), Classification::Normal);
        assert_eq!(systolic.classify(89.0), Classification::Borderline);
        assert_eq!(systolic.classify(120.0), Classification::Borderline);
        assert_eq!(systolic.classify(129.0), Classification::Borderline);
        assert_eq!(systolic.classify(130.0), Classification::Outlier);
        assert_eq!(systolic.classify(88.0), Classification::Outlier);
        assert_eq!(systolic.classify(160.0), Classification::Outlier);
    }

    #[test]
    fn test_four_tier_labels() {
        let systolic = BloodPressureBenchmark::default().systolic;

        assert_eq!(systolic.tier(85.0), BpTier::Low);
        assert_eq!(systolic.tier(119.0), BpTier::Normal);
        assert_eq!(systolic.tier(119.5), BpTier::Elevated);
        assert_eq!(systolic.tier(125.0), BpTier::Elevated);
        assert_eq!(systolic.tier(135.0), BpTier::Stage1);
        assert_eq!(systolic.tier(140.0), BpTier::Stage2);
        assert_eq!(systolic.tier(300.0), BpTier::Stage2);
    }

    #[test]
    fn test_bp_reading_takes_worse_component() {
        let benchmark = BloodPressureBenchmark::default();
        let at = DateTime::parse_from_rfc3339("2026-03-01T08:00:00Z").unwrap();

        let reading = |systolic, diastolic| BloodPressureLog {
            systolic,
            diastolic,
            pulse: None,
            measured_at: at,
        };
        let normal = reading(115.0, 75.0);
        let borderline = reading(115.0, 82.0);
        let outlier = reading(142.0, 75.0);

        assert_eq!(benchmark.classify(&normal), Classification::Normal);
        assert_eq!(benchmark.classify(&borderline), Classification::Borderline);
        assert_eq!(benchmark.classify(&outlier), Classification::Outlier);
        assert_eq!(benchmark.tier(142.0, 75.0), BpTier::Stage2);
        assert_eq!(benchmark.tier(115.0, 86.0), BpTier::Stage1);
    }

    #[test]
    fn test_glucose_range_depends_on_context() {
        let benchmark = GlucoseBenchmark::default();
        let at = DateTime::parse_from_rfc3339("2026-03-01T08:00:00Z").unwrap();

        let reading = |value, context| GlucoseLog { value, context, measured_at: at };
        let fasting = reading(140.0, GlucoseContext::Fasting);
        let after_meal = reading(140.0, GlucoseContext::AfterMeal);
        let fasting_edge = reading(100.0, GlucoseContext::Fasting);

        assert_eq!(benchmark.classify(&fasting), Classification::Outlier);
        assert_eq!(benchmark.classify(&after_meal), Classification::Normal);
        assert_eq!(benchmark.classify(&fasting_edge), Classification::Borderline);
    }

    #[test]
    fn test_glucose_partial_benchmark_json_uses_defaults() {
        let benchmark: GlucoseBenchmark =
            serde_json::from_str(r#"{"fasting": {"min": 80, "max": 110}}"#).unwrap();
        assert_eq!(benchmark.fasting, Range::new(80.0, 110.0));
        assert_eq!(benchmark.after_meal, GlucoseBenchmark::default().after_meal);
    }

    #[test]
    fn test_worst_classification() {
        assert_eq!(
            Classification::Normal.worst(Classification::Borderline),
            Classification::Borderline
        );
        assert_eq!(Classification::Outlier.worst(Classification::Normal), Classification::Outlier);
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        assert!(Range::new(10.0, 5.0).validate("test").is_err());
        assert!(Range::new(f64::NAN, 5.0).validate("test").is_err());

        let mut benchmark = BloodPressureBenchmark::default();
        assert!(benchmark.validate().is_ok());
        benchmark.systolic.elevated = Range::new(110.0, 129.0);
        assert!(benchmark.validate().is_err());
    }
}
