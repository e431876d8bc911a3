//! Reporting window
//!
//! A window of N calendar days ending today, anchored at local midnight in a
//! fixed UTC offset.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, TimeZone};

use crate::error::{ReportError, ReportResult};
use crate::models::Timestamped;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeframe {
    start: DateTime<FixedOffset>,
    first_day: NaiveDate,
    last_day: NaiveDate,
    days: u32,
    tz: FixedOffset,
}

impl Timeframe {
    /// Window of `days` calendar days whose last day is `today`.
    ///
    /// The lower bound is local midnight of `today - (days - 1)`; the upper
    /// bound is the end of `today`, so entries stamped later today are kept.
    pub fn ending_on(today: NaiveDate, days: u32, tz: FixedOffset) -> ReportResult<Self> {
        if days == 0 {
            return Err(ReportError::Config(
                "report window must cover at least one day".to_string(),
            ));
        }

        let first_day = today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| {
                ReportError::Config(format!("{} days before {} is out of range", days, today))
            })?;

        let midnight = first_day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ReportError::Config("invalid midnight".to_string()))?;
        let start = tz
            .from_local_datetime(&midnight)
            .single()
            .ok_or_else(|| {
                ReportError::Config(format!("ambiguous local midnight on {}", first_day))
            })?;

        Ok(Self {
            start,
            first_day,
            last_day: today,
            days,
            tz,
        })
    }

    /// True when `ts` is at or after the start and falls on a day of the window
    pub fn contains(&self, ts: &DateTime<FixedOffset>) -> bool {
        *ts >= self.start && self.local_date(ts) <= self.last_day
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn timezone(&self) -> FixedOffset {
        self.tz
    }

    /// Calendar date of a timestamp in the report timezone
    pub fn local_date(&self, ts: &DateTime<FixedOffset>) -> NaiveDate {
        ts.with_timezone(&self.tz).date_naive()
    }

    /// Every calendar day in the window, oldest first
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.first_day.iter_days().take(self.days as usize)
    }

    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.first_day.format("%Y-%m-%d"),
            self.last_day.format("%Y-%m-%d")
        )
    }
}

/// Keep the entries inside the window, in chronological order
pub fn filter_logs<T: Timestamped + Clone>(logs: &[T], timeframe: &Timeframe) -> Vec<T> {
    let mut kept: Vec<T> = logs
        .iter()
        .filter(|log| timeframe.contains(&log.recorded_at()))
        .cloned()
        .collect();
    kept.sort_by_key(|log| log.recorded_at());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HeartRateLog, HydrationLog};

    fn tz(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn hr(bpm: f64, at: &str) -> HeartRateLog {
        HeartRateLog { bpm, measured_at: ts(at) }
    }

    #[test]
    fn test_start_is_local_midnight_n_minus_one_days_back() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tf = Timeframe::ending_on(today, 7, tz(2)).unwrap();

        assert_eq!(tf.first_day(), NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        assert_eq!(tf.start(), ts("2026-03-04T00:00:00+02:00"));
        assert_eq!(tf.days().count(), 7);
        assert_eq!(tf.label(), "2026-03-04 to 2026-03-10");
    }

    #[test]
    fn test_boundary_is_inclusive_at_exactly_n_days_back() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tf = Timeframe::ending_on(today, 7, tz(0)).unwrap();

        assert!(tf.contains(&ts("2026-03-04T00:00:00Z")));
        assert!(!tf.contains(&ts("2026-03-03T23:59:59Z")));
        assert!(tf.contains(&ts("2026-03-10T23:59:59Z")));
    }

    #[test]
    fn test_entries_after_last_day_are_dropped() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tf = Timeframe::ending_on(today, 7, tz(0)).unwrap();

        assert!(!tf.contains(&ts("2026-03-11T00:00:00Z")));
        // Still the 10th locally at -05:00
        let west = Timeframe::ending_on(today, 7, tz(-5)).unwrap();
        assert!(west.contains(&ts("2026-03-11T04:59:59Z")));
        assert!(!west.contains(&ts("2026-03-11T05:00:00Z")));

        let logs = vec![
            HydrationLog { amount_ml: 500.0, created_at: ts("2026-03-11T09:00:00Z") },
            HydrationLog { amount_ml: 250.0, created_at: ts("2026-03-10T09:00:00Z") },
        ];
        let kept = filter_logs(&logs, &tf);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].amount_ml, 250.0);
    }

    #[test]
    fn test_boundary_respects_fixed_timezone() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tf = Timeframe::ending_on(today, 1, tz(-5)).unwrap();

        // Local midnight at -05:00 is 05:00 UTC
        assert!(tf.contains(&ts("2026-03-10T05:00:00Z")));
        assert!(!tf.contains(&ts("2026-03-10T04:59:59Z")));
        assert!(tf.contains(&ts("2026-03-10T00:00:00-05:00")));
    }

    #[test]
    fn test_single_day_window() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let tf = Timeframe::ending_on(today, 1, tz(0)).unwrap();
        assert_eq!(tf.first_day(), today);
        assert!(!tf.contains(&ts("2025-12-31T23:59:59Z")));
    }

    #[test]
    fn test_zero_days_rejected() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(Timeframe::ending_on(today, 0, tz(0)).is_err());
    }

    #[test]
    fn test_filter_keeps_window_in_order() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tf = Timeframe::ending_on(today, 3, tz(0)).unwrap();

        let logs = vec![
            hr(70.0, "2026-03-10T08:00:00Z"),
            hr(71.0, "2026-03-07T23:00:00Z"),
            hr(72.0, "2026-03-08T00:00:00Z"),
            hr(73.0, "2026-03-09T12:00:00Z"),
        ];

        let kept = filter_logs(&logs, &tf);
        let bpms: Vec<f64> = kept.iter().map(|l| l.bpm).collect();
        assert_eq!(bpms, vec![72.0, 73.0, 70.0]);
    }

    #[test]
    fn test_filter_uses_creation_time_for_intake_logs() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tf = Timeframe::ending_on(today, 2, tz(0)).unwrap();

        let logs = vec![
            HydrationLog { amount_ml: 250.0, created_at: ts("2026-03-09T00:00:00Z") },
            HydrationLog { amount_ml: 500.0, created_at: ts("2026-03-08T23:59:00Z") },
        ];
        let kept = filter_logs(&logs, &tf);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].amount_ml, 250.0);
    }

    #[test]
    fn test_local_date_uses_report_offset() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tf = Timeframe::ending_on(today, 2, tz(9)).unwrap();
        // 20:00 UTC on the 9th is already the 10th at +09:00
        assert_eq!(tf.local_date(&ts("2026-03-09T20:00:00Z")), today);
    }
}
