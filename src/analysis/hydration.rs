//! Hydration decomposition
//!
//! Each day's consumption is split into three stacked segments: intake up to
//! the goal, what is left to reach the goal, and anything drunk beyond it.
//! The segments never overlap and always add up to `max(consumed, goal)`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::Timeframe;
use crate::models::{HydrationLog, Timestamped};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HydrationBar {
    pub intake: f64,
    pub goal_leftover: f64,
    pub excess: f64,
}

impl HydrationBar {
    pub fn total(&self) -> f64 {
        self.intake + self.goal_leftover + self.excess
    }
}

/// Split `consumed` against `goal`. Negative inputs are treated as zero.
pub fn decompose(consumed: f64, goal: f64) -> HydrationBar {
    let consumed = consumed.max(0.0);
    let goal = goal.max(0.0);

    let intake = consumed.min(goal);
    HydrationBar {
        intake,
        goal_leftover: goal - intake,
        excess: consumed - intake,
    }
}

/// One day of hydration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyHydration {
    pub date: NaiveDate,
    pub consumed_ml: f64,
    pub goal_ml: f64,
    pub bar: HydrationBar,
}

impl DailyHydration {
    pub fn goal_met(&self) -> bool {
        self.consumed_ml >= self.goal_ml
    }
}

/// Daily totals for every day of the window, including days with nothing logged
pub fn daily_hydration(
    logs: &[HydrationLog],
    goal_ml: f64,
    timeframe: &Timeframe,
) -> Vec<DailyHydration> {
    let mut by_date: BTreeMap<NaiveDate, f64> = timeframe.days().map(|d| (d, 0.0)).collect();

    for log in logs {
        let date = timeframe.local_date(&log.recorded_at());
        // Entries stamped after the last day have no column on the chart
        if let Some(total) = by_date.get_mut(&date) {
            *total += log.amount_ml;
        }
    }

    by_date
        .into_iter()
        .map(|(date, consumed_ml)| DailyHydration {
            date,
            consumed_ml,
            goal_ml,
            bar: decompose(consumed_ml, goal_ml),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HydrationSummary {
    pub days: usize,
    pub days_goal_met: usize,
    pub total_ml: f64,
    pub average_daily_ml: f64,
}

impl HydrationSummary {
    pub fn from_days(days: &[DailyHydration]) -> Self {
        let total_ml: f64 = days.iter().map(|d| d.consumed_ml).sum();
        Self {
            days: days.len(),
            days_goal_met: days.iter().filter(|d| d.goal_met()).count(),
            total_ml,
            average_daily_ml: if days.is_empty() { 0.0 } else { total_ml / days.len() as f64 },
        }
    }
}
