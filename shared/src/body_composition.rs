//! Body measurement session input and derived composition metrics
//!
//! Raw measurements arrive in inches from the pose-analysis pipeline. The
//! composite fields stored alongside them are estimates derived from those
//! measurements plus the user's age, sex and height.

use serde::{Deserialize, Serialize};

use crate::health_metrics::{
    calculate_bmi, calculate_bmr_katch_mcardle, estimate_body_fat_from_bmi, sex_weighted,
    BiologicalSex,
};
use crate::models::Sex;
use crate::units::inches_to_cm;
use crate::validation::{validate_measurement, validate_weight};

/// Share of fat-free mass attributed to skeletal muscle
const SKELETAL_MUSCLE_SHARE: f64 = 0.5;

/// Raw measurements captured in one session (inches, kg)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurementInput {
    // Width measurements
    pub shoulder_width_in: f64,
    pub waist_width_in: f64,
    pub hip_width_in: f64,

    // Circumference measurements
    pub chest_circumference_in: f64,
    pub waist_circumference_in: f64,
    pub hip_circumference_in: f64,

    // Left side measurements
    pub biceps_left_length_in: f64,
    pub biceps_left_circumference_in: f64,
    pub forearm_left_length_in: f64,
    pub forearm_left_circumference_in: f64,
    pub thigh_left_length_in: f64,
    pub thigh_left_circumference_in: f64,
    pub calf_left_length_in: f64,
    pub calf_left_circumference_in: f64,

    // Right side measurements
    pub biceps_right_length_in: f64,
    pub biceps_right_circumference_in: f64,
    pub forearm_right_length_in: f64,
    pub forearm_right_circumference_in: f64,
    pub thigh_right_length_in: f64,
    pub thigh_right_circumference_in: f64,
    pub calf_right_length_in: f64,
    pub calf_right_circumference_in: f64,

    pub weight_kg: f64,
}

impl BodyMeasurementInput {
    /// Every raw field with its column name
    pub fn fields(&self) -> [(&'static str, f64); 22] {
        [
            ("shoulder_width_in", self.shoulder_width_in),
            ("waist_width_in", self.waist_width_in),
            ("hip_width_in", self.hip_width_in),
            ("chest_circumference_in", self.chest_circumference_in),
            ("waist_circumference_in", self.waist_circumference_in),
            ("hip_circumference_in", self.hip_circumference_in),
            ("biceps_left_length_in", self.biceps_left_length_in),
            ("biceps_left_circumference_in", self.biceps_left_circumference_in),
            ("forearm_left_length_in", self.forearm_left_length_in),
            ("forearm_left_circumference_in", self.forearm_left_circumference_in),
            ("thigh_left_length_in", self.thigh_left_length_in),
            ("thigh_left_circumference_in", self.thigh_left_circumference_in),
            ("calf_left_length_in", self.calf_left_length_in),
            ("calf_left_circumference_in", self.calf_left_circumference_in),
            ("biceps_right_length_in", self.biceps_right_length_in),
            ("biceps_right_circumference_in", self.biceps_right_circumference_in),
            ("forearm_right_length_in", self.forearm_right_length_in),
            ("forearm_right_circumference_in", self.forearm_right_circumference_in),
            ("thigh_right_length_in", self.thigh_right_length_in),
            ("thigh_right_circumference_in", self.thigh_right_circumference_in),
            ("calf_right_length_in", self.calf_right_length_in),
            ("calf_right_circumference_in", self.calf_right_circumference_in),
        ]
    }

    /// Validate all raw measurements and the session weight
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in self.fields() {
            validate_measurement(field, value)?;
        }
        validate_weight(self.weight_kg)
    }

    /// Mean leg length (thigh + calf) across both sides
    pub fn mean_leg_length_in(&self) -> f64 {
        let left = self.thigh_left_length_in + self.calf_left_length_in;
        let right = self.thigh_right_length_in + self.calf_right_length_in;
        (left + right) / 2.0
    }
}

/// Composite metrics stored with a measurement session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub trunk_to_leg_ratio: f64,
    pub body_fat_percentage: f64,
    pub fat_mass: f64,
    pub lean_mass: f64,
    /// Waist circumference in centimetres
    pub waist_circumference: f64,
    pub waist_to_hip_ratio: f64,
    pub skeletal_muscle_mass: f64,
    pub fat_free_mass: f64,
    pub basal_metabolic_rate: f64,
    pub visceral_fat_level: f64,
    pub bmi: f64,
}

/// Derive composition metrics for one session
///
/// `height_inches`, `age` and `sex` come from the user profile; weight is
/// taken from the session itself.
pub fn derive_metrics(
    input: &BodyMeasurementInput,
    height_inches: f64,
    age: u32,
    sex: Sex,
) -> DerivedMetrics {
    let weight = input.weight_kg;
    let height_cm = inches_to_cm(height_inches);
    let age = age as i32;
    let bio_sex = sex.biological();

    let bmi = calculate_bmi(weight, height_cm);
    let body_fat_percentage = sex_weighted(bio_sex, |s| estimate_body_fat_from_bmi(bmi, age, s));
    let fat_mass = weight * body_fat_percentage / 100.0;
    let lean_mass = weight - fat_mass;
    let waist_cm = inches_to_cm(input.waist_circumference_in);

    DerivedMetrics {
        trunk_to_leg_ratio: input.shoulder_width_in / input.mean_leg_length_in(),
        body_fat_percentage,
        fat_mass,
        lean_mass,
        waist_circumference: waist_cm,
        waist_to_hip_ratio: input.waist_circumference_in / input.hip_circumference_in,
        skeletal_muscle_mass: lean_mass * SKELETAL_MUSCLE_SHARE,
        fat_free_mass: lean_mass,
        basal_metabolic_rate: calculate_bmr_katch_mcardle(weight, body_fat_percentage),
        visceral_fat_level: sex_weighted(bio_sex, |s| visceral_fat_level(waist_cm, s)),
        bmi,
    }
}

/// Visceral fat index (1-30) estimated from waist circumference
///
/// One level per 2.5 cm above a sex-specific baseline waist.
pub fn visceral_fat_level(waist_cm: f64, sex: BiologicalSex) -> f64 {
    let baseline = match sex {
        BiologicalSex::Male => 70.0,
        BiologicalSex::Female => 65.0,
    };
    ((waist_cm - baseline) / 2.5 + 1.0).clamp(1.0, 30.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    pub(crate) fn sample_input() -> BodyMeasurementInput {
        BodyMeasurementInput {
            shoulder_width_in: 17.0,
            waist_width_in: 12.0,
            hip_width_in: 14.0,
            chest_circumference_in: 40.0,
            waist_circumference_in: 32.0,
            hip_circumference_in: 38.0,
            biceps_left_length_in: 12.0,
            biceps_left_circumference_in: 13.0,
            forearm_left_length_in: 10.5,
            forearm_left_circumference_in: 11.0,
            thigh_left_length_in: 18.0,
            thigh_left_circumference_in: 22.0,
            calf_left_length_in: 16.0,
            calf_left_circumference_in: 15.0,
            biceps_right_length_in: 12.0,
            biceps_right_circumference_in: 13.5,
            forearm_right_length_in: 10.5,
            forearm_right_circumference_in: 11.2,
            thigh_right_length_in: 18.2,
            thigh_right_circumference_in: 22.4,
            calf_right_length_in: 15.8,
            calf_right_circumference_in: 15.1,
            weight_kg: 80.0,
        }
    }

    #[test]
    fn test_validate_rejects_any_bad_field() {
        assert!(sample_input().validate().is_ok());

        let mut input = sample_input();
        input.calf_right_circumference_in = -1.0;
        assert_eq!(
            input.validate().unwrap_err(),
            "calf_right_circumference_in must be positive"
        );

        let mut input = sample_input();
        input.weight_kg = 5.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_derive_metrics_for_male() {
        let metrics = derive_metrics(&sample_input(), 70.0, 30, Sex::Male);

        // 80kg at 177.8cm
        assert!((metrics.bmi - 25.31).abs() < 0.01);
        assert!((metrics.waist_to_hip_ratio - 32.0 / 38.0).abs() < 1e-9);
        assert!((metrics.waist_circumference - 81.28).abs() < 1e-9);
        assert!((metrics.trunk_to_leg_ratio - 0.5).abs() < 1e-9);
        assert!((metrics.fat_mass + metrics.lean_mass - 80.0).abs() < 1e-9);
        assert_eq!(metrics.fat_free_mass, metrics.lean_mass);
        assert_eq!(metrics.skeletal_muscle_mass, metrics.lean_mass / 2.0);
        assert!(metrics.basal_metabolic_rate > 1500.0 && metrics.basal_metabolic_rate < 2000.0);
        // (81.28 - 70) / 2.5 + 1
        assert!((metrics.visceral_fat_level - 5.512).abs() < 1e-9);
    }

    #[test]
    fn test_other_sex_sits_between_male_and_female() {
        let input = sample_input();
        let male = derive_metrics(&input, 70.0, 30, Sex::Male);
        let female = derive_metrics(&input, 70.0, 30, Sex::Female);
        let other = derive_metrics(&input, 70.0, 30, Sex::Other);

        assert!(male.body_fat_percentage < other.body_fat_percentage);
        assert!(other.body_fat_percentage < female.body_fat_percentage);
        assert_eq!(other.bmi, male.bmi);
    }

    #[test]
    fn test_visceral_fat_is_clamped() {
        assert_eq!(visceral_fat_level(50.0, BiologicalSex::Male), 1.0);
        assert_eq!(visceral_fat_level(200.0, BiologicalSex::Female), 30.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: fat and lean mass always partition body weight
        #[test]
        fn prop_mass_partitions_weight(
            weight in 40.0f64..200.0,
            height in 55.0f64..85.0,
            age in 18u32..90
        ) {
            let mut input = sample_input();
            input.weight_kg = weight;
            let metrics = derive_metrics(&input, height, age, Sex::Female);
            prop_assert!((metrics.fat_mass + metrics.lean_mass - weight).abs() < 1e-6);
            prop_assert!(metrics.fat_mass > 0.0 && metrics.lean_mass > 0.0);
        }
    }
}
