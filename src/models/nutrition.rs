//! Nutrition models
//!
//! Macro totals shared by individual food logs and daily aggregates.
//! Food and hydration logs are filtered on the time the entry was created.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::Timestamped;

/// Nutritional information
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,      // grams
    #[serde(default)]
    pub carbs: f64,        // grams
    #[serde(default)]
    pub fat: f64,          // grams
}

impl Nutrition {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
        }
    }

    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }

    /// Calories contributed by each macro (4/4/9 kcal per gram)
    pub fn macro_calories(&self) -> (f64, f64, f64) {
        (self.protein * 4.0, self.carbs * 4.0, self.fat * 9.0)
    }

    pub fn is_valid(&self) -> bool {
        [self.calories, self.protein, self.carbs, self.fat]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

/// A logged food entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionLog {
    #[serde(flatten)]
    pub nutrition: Nutrition,
    /// Free-text meal label, e.g. "breakfast"
    #[serde(default)]
    pub meal: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

/// A logged drink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationLog {
    pub amount_ml: f64,
    pub created_at: DateTime<FixedOffset>,
}

impl Timestamped for NutritionLog {
    fn recorded_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }
}

impl Timestamped for HydrationLog {
    fn recorded_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }
}
