//! Data models
//!
//! Input logs as read from the JSON bundle.

mod bundle;
mod nutrition;
mod patient;
mod vital;

use chrono::{DateTime, FixedOffset};

pub use bundle::{
    BloodPressureSeries, GlucoseSeries, HealthLogBundle, HeartRateSeries, HydrationSeries,
    NutritionSeries, TemperatureSeries,
};
pub use nutrition::{HydrationLog, Nutrition, NutritionLog};
pub use patient::PatientInfo;
pub use vital::{
    BloodPressureLog, GlucoseContext, GlucoseLog, HeartRateLog, TemperatureLog, TemperatureUnit,
    VitalType,
};

/// A log entry with the timestamp the reporting window is applied to.
///
/// Vitals report when they were measured; food and drink logs report when
/// the entry was created.
pub trait Timestamped {
    fn recorded_at(&self) -> DateTime<FixedOffset>;
}
