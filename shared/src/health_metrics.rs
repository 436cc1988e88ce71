//! Health metrics calculations module
//!
//! Formulas behind the derived body-composition fields and the nutrition
//! requirements. All functions are pure and work in SI units.

use serde::{Deserialize, Serialize};

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex for health calculations
/// Note: This is used for physiological calculations only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

/// Activity level for energy expenditure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[default]
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtraActive,
}

impl ActivityLevel {
    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extra_active" => Ok(ActivityLevel::ExtraActive),
            _ => Err(format!("Unknown activity level: {}", s)),
        }
    }
}

// ============================================================================
// BMI
// ============================================================================

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

// ============================================================================
// BMR
// ============================================================================

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: i32, sex: BiologicalSex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match sex {
        BiologicalSex::Male => base + 5.0,
        BiologicalSex::Female => base - 161.0,
    }
}

/// Calculate BMR using Katch-McArdle equation (requires lean body mass)
///
/// BMR = 370 + 21.6 × LBM(kg)
/// LBM = weight × (1 - body_fat_percent/100)
pub fn calculate_bmr_katch_mcardle(weight_kg: f64, body_fat_percent: f64) -> f64 {
    let lean_body_mass = weight_kg * (1.0 - body_fat_percent / 100.0);
    370.0 + 21.6 * lean_body_mass
}

// ============================================================================
// Body Fat Estimation
// ============================================================================

/// Estimate body fat percentage from BMI (Deurenberg)
///
/// Formula: BF% = 1.20 × BMI + 0.23 × Age - 10.8 × sex - 5.4
/// where sex = 1 for male, 0 for female
pub fn estimate_body_fat_from_bmi(bmi: f64, age_years: i32, sex: BiologicalSex) -> f64 {
    let sex_factor = match sex {
        BiologicalSex::Male => 1.0,
        BiologicalSex::Female => 0.0,
    };
    let bf = 1.20 * bmi + 0.23 * age_years as f64 - 10.8 * sex_factor - 5.4;
    bf.clamp(3.0, 60.0)
}

/// Evaluate a sex-dependent formula, averaging both variants when no
/// physiological sex is recorded
pub fn sex_weighted<F>(sex: Option<BiologicalSex>, formula: F) -> f64
where
    F: Fn(BiologicalSex) -> f64,
{
    match sex {
        Some(sex) => formula(sex),
        None => (formula(BiologicalSex::Male) + formula(BiologicalSex::Female)) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bmi_calculation() {
        // 70kg, 175cm -> BMI ~22.86
        let bmi = calculate_bmi(70.0, 175.0);
        assert!((bmi - 22.86).abs() < 0.1);
    }

    #[test]
    fn test_bmr_mifflin() {
        // 30yo male, 80kg, 180cm -> BMR ~1780
        let bmr = calculate_bmr_mifflin(80.0, 180.0, 30, BiologicalSex::Male);
        assert!((bmr - 1780.0).abs() < 50.0);

        // 30yo female, 60kg, 165cm -> BMR ~1370
        let bmr = calculate_bmr_mifflin(60.0, 165.0, 30, BiologicalSex::Female);
        assert!((bmr - 1370.0).abs() < 50.0);
    }

    #[test]
    fn test_katch_mcardle() {
        // 80kg at 20% fat -> 64kg lean -> 370 + 1382.4
        let bmr = calculate_bmr_katch_mcardle(80.0, 20.0);
        assert!((bmr - 1752.4).abs() < 1e-9);
    }

    #[test]
    fn test_body_fat_is_clamped() {
        assert_eq!(estimate_body_fat_from_bmi(5.0, 18, BiologicalSex::Male), 3.0);
        assert_eq!(estimate_body_fat_from_bmi(80.0, 90, BiologicalSex::Female), 60.0);
    }

    #[test]
    fn test_sex_weighted_averages_without_sex() {
        let avg = sex_weighted(None, |sex| calculate_bmr_mifflin(70.0, 170.0, 30, sex));
        let male = calculate_bmr_mifflin(70.0, 170.0, 30, BiologicalSex::Male);
        let female = calculate_bmr_mifflin(70.0, 170.0, 30, BiologicalSex::Female);
        assert!((avg - (male + female) / 2.0).abs() < 1e-9);
        assert_eq!(sex_weighted(Some(BiologicalSex::Male), |_| 1.0), 1.0);
    }

    #[test]
    fn test_activity_level_parsing() {
        assert_eq!("very-active".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert_eq!("SEDENTARY".parse::<ActivityLevel>().unwrap(), ActivityLevel::Sedentary);
        assert!("couch".parse::<ActivityLevel>().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Heavier weight = higher BMI (same height)
        #[test]
        fn prop_bmi_increases_with_weight(
            weight1 in 50.0f64..100.0,
            weight2 in 100.0f64..150.0,
            height in 150.0f64..200.0
        ) {
            prop_assert!(calculate_bmi(weight2, height) > calculate_bmi(weight1, height));
        }

        /// Property: Male BMR > Female BMR (same stats)
        #[test]
        fn prop_male_bmr_higher(
            weight in 50.0f64..100.0,
            height in 160.0f64..190.0,
            age in 20i32..60
        ) {
            let bmr_male = calculate_bmr_mifflin(weight, height, age, BiologicalSex::Male);
            let bmr_female = calculate_bmr_mifflin(weight, height, age, BiologicalSex::Female);
            prop_assert!(bmr_male > bmr_female);
        }

        #[test]
        fn prop_body_fat_within_bounds(bmi in 10.0f64..60.0, age in 0i32..120) {
            for sex in [BiologicalSex::Male, BiologicalSex::Female] {
                let bf = estimate_body_fat_from_bmi(bmi, age, sex);
                prop_assert!((3.0..=60.0).contains(&bf));
            }
        }
    }
}
