//! Analysis module
//!
//! Pure functions over in-memory logs: timeframe filtering, benchmark
//! classification, summary statistics and hydration decomposition.

pub mod benchmark;
pub mod hydration;
pub mod nutrition;
pub mod stats;
pub mod timeframe;

pub use benchmark::{
    BloodPressureBenchmark, BpTier, Classification, FourTierRange, GlucoseBenchmark, Range,
    BORDERLINE_WINDOW,
};
pub use hydration::{daily_hydration, decompose, DailyHydration, HydrationBar, HydrationSummary};
pub use nutrition::{average_daily, daily_nutrition, DailyNutrition};
pub use stats::{daily_stats, ClassCounts, DailyStats, SummaryStats};
pub use timeframe::{filter_logs, Timeframe};
