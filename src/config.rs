//! Report configuration
//!
//! Resolves the reporting window, timezone and chart settings from CLI flags,
//! environment variables and defaults, in that order.

use std::path::PathBuf;

use chrono::{FixedOffset, NaiveDate, Utc};

use crate::analysis::Timeframe;
use crate::error::{ReportError, ReportResult};

pub const ENV_DAYS: &str = "HEALTH_REPORT_DAYS";
pub const ENV_TIMEZONE: &str = "HEALTH_REPORT_TZ";

pub const DEFAULT_DAYS: u32 = 7;
pub const DEFAULT_TIMEZONE: &str = "+00:00";
pub const DEFAULT_CHART_WIDTH: u32 = 1000;
pub const DEFAULT_CHART_HEIGHT: u32 = 400;

/// Resolved report settings
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Number of calendar days in the window, today included
    pub days: u32,
    pub timezone: FixedOffset,
    /// Last day of the window; defaults to today in `timezone`
    pub today: NaiveDate,
    pub chart_width: u32,
    pub chart_height: u32,
    /// When set, every rendered chart is also written here as PNG
    pub charts_dir: Option<PathBuf>,
}

/// Raw, unvalidated settings as collected from the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub days: Option<u32>,
    pub timezone: Option<String>,
    pub today: Option<String>,
    pub charts_dir: Option<PathBuf>,
}

impl ReportConfig {
    /// Resolve settings: explicit overrides, then environment, then defaults
    pub fn resolve(overrides: ConfigOverrides) -> ReportResult<Self> {
        let days = match overrides.days {
            Some(d) => d,
            None => match std::env::var(ENV_DAYS) {
                Ok(raw) => raw.trim().parse::<u32>().map_err(|_| {
                    ReportError::Config(format!(
                        "{} must be a positive integer, got '{}'",
                        ENV_DAYS, raw
                    ))
                })?,
                Err(_) => DEFAULT_DAYS,
            },
        };

        let tz_raw = overrides
            .timezone
            .or_else(|| std::env::var(ENV_TIMEZONE).ok())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = parse_timezone(&tz_raw)?;

        let today = match overrides.today {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                ReportError::Config(format!("--today must be YYYY-MM-DD, got '{}'", raw))
            })?,
            None => Utc::now().with_timezone(&timezone).date_naive(),
        };

        let config = Self {
            days,
            timezone,
            today,
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
            charts_dir: overrides.charts_dir,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReportResult<()> {
        if self.days == 0 {
            return Err(ReportError::Config(
                "report window must cover at least one day".to_string(),
            ));
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(ReportError::Config("chart dimensions must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn timeframe(&self) -> ReportResult<Timeframe> {
        Timeframe::ending_on(self.today, self.days, self.timezone)
    }
}

/// Parse a fixed UTC offset such as `+05:30`, `-0800`, `Z` or `UTC`
pub fn parse_timezone(raw: &str) -> ReportResult<FixedOffset> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0)
            .ok_or_else(|| ReportError::Config("invalid UTC offset".to_string()));
    }
    trimmed
        .parse::<FixedOffset>()
        .map_err(|_| {
            ReportError::Config(format!(
                "timezone must be a UTC offset like +02:00, got '{}'",
                raw
            ))
        })
}
