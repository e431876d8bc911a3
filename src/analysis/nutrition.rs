//! Daily nutrition totals
//!
//! Food entries summed per local calendar day and checked against the calorie goal.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::stats::day_of_week_abbrev;
use super::{Classification, Range, Timeframe};
use crate::models::{Nutrition, NutritionLog, Timestamped};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyNutrition {
    pub date: NaiveDate,
    pub day_of_week: &'static str,
    pub entries: usize,
    pub totals: Nutrition,
    pub classification: Classification,
}

/// Per-day totals for days with at least one entry, oldest first
pub fn daily_nutrition(
    logs: &[NutritionLog],
    calorie_goal: &Range,
    timeframe: &Timeframe,
) -> Vec<DailyNutrition> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Nutrition>> = BTreeMap::new();

    for log in logs {
        let date = timeframe.local_date(&log.recorded_at());
        by_date.entry(date).or_default().push(log.nutrition);
    }

    by_date
        .into_iter()
        .map(|(date, items)| {
            let entries = items.len();
            let totals: Nutrition = items.into_iter().sum();
            DailyNutrition {
                date,
                day_of_week: day_of_week_abbrev(&date),
                entries,
                classification: calorie_goal.classify(totals.calories),
                totals,
            }
        })
        .collect()
}

/// Average daily intake over the logged days
pub fn average_daily(days: &[DailyNutrition]) -> Nutrition {
    if days.is_empty() {
        return Nutrition::zero();
    }
    let total: Nutrition = days.iter().map(|d| d.totals).sum();
    total.scale(1.0 / days.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn entry(calories: f64, protein: f64, at: &str) -> NutritionLog {
        NutritionLog {
            nutrition: Nutrition { calories, protein, carbs: 0.0, fat: 0.0 },
            meal: None,
            created_at: DateTime::parse_from_rfc3339(at).unwrap(),
        }
    }

    #[test]
    fn test_daily_totals_and_classification() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tf = Timeframe::ending_on(today, 3, FixedOffset::east_opt(0).unwrap()).unwrap();
        let goal = Range::new(1800.0, 2200.0);

        let logs = vec![
            entry(900.0, 40.0, "2026-03-08T08:00:00Z"),
            entry(1000.0, 30.0, "2026-03-08T19:00:00Z"),
            entry(1799.5, 50.0, "2026-03-09T12:00:00Z"),
            entry(2500.0, 90.0, "2026-03-10T12:00:00Z"),
        ];

        let days = daily_nutrition(&logs, &goal, &tf);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].entries, 2);
        assert_eq!(days[0].totals.calories, 1900.0);
        assert_eq!(days[0].classification, Classification::Normal);
        assert_eq!(days[1].classification, Classification::Borderline);
        assert_eq!(days[2].classification, Classification::Outlier);

        let avg = average_daily(&days);
        assert!((avg.calories - 2066.5).abs() < 1e-9);
        assert!((avg.protein - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_of_nothing_is_zero() {
        assert_eq!(average_daily(&[]), Nutrition::zero());
    }
}
