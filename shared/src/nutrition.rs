//! Daily nutrition requirement calculation
//!
//! Requirements are persisted as display strings, so formatting lives
//! next to the calculation.

use serde::{Deserialize, Serialize};

use crate::health_metrics::{calculate_bmr_mifflin, sex_weighted, ActivityLevel};
use crate::models::UserProfile;
use crate::units::inches_to_cm;

/// Protein target per kilogram of body weight
pub const PROTEIN_G_PER_KG: f64 = 1.6;

/// Calculated daily targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub calories_kcal: i64,
    pub protein_g: i64,
}

impl NutritionTargets {
    /// Calories as stored, e.g. "2450 kcal"
    pub fn calories_display(&self) -> String {
        format!("{} kcal", self.calories_kcal)
    }

    /// Protein as stored, e.g. "128 g"
    pub fn protein_display(&self) -> String {
        format!("{} g", self.protein_g)
    }
}

/// Calculate maintenance calories and protein for a profile
///
/// Calories: Mifflin-St Jeor BMR × activity multiplier.
/// Protein: 1.6 g per kg of body weight.
pub fn calculate_requirements(profile: &UserProfile, activity: ActivityLevel) -> NutritionTargets {
    let height_cm = inches_to_cm(profile.height_inches);
    let age = profile.age as i32;
    let bmr = sex_weighted(profile.sex.biological(), |sex| {
        calculate_bmr_mifflin(profile.weight_kg, height_cm, age, sex)
    });

    NutritionTargets {
        calories_kcal: (bmr * activity.multiplier()).round() as i64,
        protein_g: (profile.weight_kg * PROTEIN_G_PER_KG).round() as i64,
    }
}
