//! Body measurements repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use fitform_shared::{BodyMeasurementInput, DerivedMetrics};
use sqlx::PgPool;

const MEASUREMENT_COLUMNS: &str = r#"
    id, user_id, measurement_date,
    shoulder_width_in, waist_width_in, hip_width_in,
    chest_circumference_in, waist_circumference_in, hip_circumference_in,
    biceps_left_length_in, biceps_left_circumference_in,
    forearm_left_length_in, forearm_left_circumference_in,
    thigh_left_length_in, thigh_left_circumference_in,
    calf_left_length_in, calf_left_circumference_in,
    biceps_right_length_in, biceps_right_circumference_in,
    forearm_right_length_in, forearm_right_circumference_in,
    thigh_right_length_in, thigh_right_circumference_in,
    calf_right_length_in, calf_right_circumference_in,
    weight_kg,
    trunk_to_leg_ratio, body_fat_percentage, fat_mass, lean_mass,
    waist_circumference, waist_to_hip_ratio, skeletal_muscle_mass,
    fat_free_mass, basal_metabolic_rate, visceral_fat_level, bmi
"#;

/// Body measurements record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BodyMeasurementsRecord {
    pub id: i64,
    pub user_id: i64,
    pub measurement_date: DateTime<Utc>,

    pub shoulder_width_in: f64,
    pub waist_width_in: f64,
    pub hip_width_in: f64,

    pub chest_circumference_in: f64,
    pub waist_circumference_in: f64,
    pub hip_circumference_in: f64,

    pub biceps_left_length_in: f64,
    pub biceps_left_circumference_in: f64,
    pub forearm_left_length_in: f64,
    pub forearm_left_circumference_in: f64,
    pub thigh_left_length_in: f64,
    pub thigh_left_circumference_in: f64,
    pub calf_left_length_in: f64,
    pub calf_left_circumference_in: f64,

    pub biceps_right_length_in: f64,
    pub biceps_right_circumference_in: f64,
    pub forearm_right_length_in: f64,
    pub forearm_right_circumference_in: f64,
    pub thigh_right_length_in: f64,
    pub thigh_right_circumference_in: f64,
    pub calf_right_length_in: f64,
    pub calf_right_circumference_in: f64,

    pub weight_kg: f64,

    pub trunk_to_leg_ratio: f64,
    pub body_fat_percentage: f64,
    pub fat_mass: f64,
    pub lean_mass: f64,
    pub waist_circumference: f64,
    pub waist_to_hip_ratio: f64,
    pub skeletal_muscle_mass: f64,
    pub fat_free_mass: f64,
    pub basal_metabolic_rate: f64,
    pub visceral_fat_level: f64,
    pub bmi: f64,
}

impl BodyMeasurementsRecord {
    /// Derived metrics stored with this session
    pub fn derived(&self) -> DerivedMetrics {
        DerivedMetrics {
            trunk_to_leg_ratio: self.trunk_to_leg_ratio,
            body_fat_percentage: self.body_fat_percentage,
            fat_mass: self.fat_mass,
            lean_mass: self.lean_mass,
            waist_circumference: self.waist_circumference,
            waist_to_hip_ratio: self.waist_to_hip_ratio,
            skeletal_muscle_mass: self.skeletal_muscle_mass,
            fat_free_mass: self.fat_free_mass,
            basal_metabolic_rate: self.basal_metabolic_rate,
            visceral_fat_level: self.visceral_fat_level,
            bmi: self.bmi,
        }
    }
}

/// Body measurements repository
pub struct BodyMeasurementsRepository;

impl BodyMeasurementsRepository {
    /// Insert a measurement session with its derived metrics
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        input: &BodyMeasurementInput,
        derived: &DerivedMetrics,
    ) -> Result<BodyMeasurementsRecord> {
        let record = sqlx::query_as::<_, BodyMeasurementsRecord>(&format!(
            r#"
            INSERT INTO body_measurements (
                user_id,
                shoulder_width_in, waist_width_in, hip_width_in,
                chest_circumference_in, waist_circumference_in, hip_circumference_in,
                biceps_left_length_in, biceps_left_circumference_in,
                forearm_left_length_in, forearm_left_circumference_in,
                thigh_left_length_in, thigh_left_circumference_in,
                calf_left_length_in, calf_left_circumference_in,
                biceps_right_length_in, biceps_right_circumference_in,
                forearm_right_length_in, forearm_right_circumference_in,
                thigh_right_length_in, thigh_right_circumference_in,
                calf_right_length_in, calf_right_circumference_in,
                weight_kg,
                trunk_to_leg_ratio, body_fat_percentage, fat_mass, lean_mass,
                waist_circumference, waist_to_hip_ratio, skeletal_muscle_mass,
                fat_free_mass, basal_metabolic_rate, visceral_fat_level, bmi
            )
            VALUES (
                $1,
                $2, $3, $4,
                $5, $6, $7,
                $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23,
                $24,
                $25, $26, $27, $28, $29, $30, $31, $32, $33, $34, $35
            )
            RETURNING {MEASUREMENT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(input.shoulder_width_in)
        .bind(input.waist_width_in)
        .bind(input.hip_width_in)
        .bind(input.chest_circumference_in)
        .bind(input.waist_circumference_in)
        .bind(input.hip_circumference_in)
        .bind(input.biceps_left_length_in)
        .bind(input.biceps_left_circumference_in)
        .bind(input.forearm_left_length_in)
        .bind(input.forearm_left_circumference_in)
        .bind(input.thigh_left_length_in)
        .bind(input.thigh_left_circumference_in)
        .bind(input.calf_left_length_in)
        .bind(input.calf_left_circumference_in)
        .bind(input.biceps_right_length_in)
        .bind(input.biceps_right_circumference_in)
        .bind(input.forearm_right_length_in)
        .bind(input.forearm_right_circumference_in)
        .bind(input.thigh_right_length_in)
        .bind(input.thigh_right_circumference_in)
        .bind(input.calf_right_length_in)
        .bind(input.calf_right_circumference_in)
        .bind(input.weight_kg)
        .bind(derived.trunk_to_leg_ratio)
        .bind(derived.body_fat_percentage)
        .bind(derived.fat_mass)
        .bind(derived.lean_mass)
        .bind(derived.waist_circumference)
        .bind(derived.waist_to_hip_ratio)
        .bind(derived.skeletal_muscle_mass)
        .bind(derived.fat_free_mass)
        .bind(derived.basal_metabolic_rate)
        .bind(derived.visceral_fat_level)
        .bind(derived.bmi)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// All sessions for a user, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<BodyMeasurementsRecord>> {
        let records = sqlx::query_as::<_, BodyMeasurementsRecord>(&format!(
            r#"
            SELECT {MEASUREMENT_COLUMNS}
            FROM body_measurements
            WHERE user_id = $1
            ORDER BY measurement_date DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Most recent session for a user
    pub async fn latest(pool: &PgPool, user_id: i64) -> Result<Option<BodyMeasurementsRecord>> {
        let record = sqlx::query_as::<_, BodyMeasurementsRecord>(&format!(
            r#"
            SELECT {MEASUREMENT_COLUMNS}
            FROM body_measurements
            WHERE user_id = $1
            ORDER BY measurement_date DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete one session
    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM body_measurements WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
