//! Nutrition requirements repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const NUTRITION_COLUMNS: &str = "id, user_id, calculation_date, calories, protein";

/// Nutrition requirements record from database
///
/// Values are stored as display strings, e.g. "2450 kcal" and "128 g".
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NutritionRequirementsRecord {
    pub id: i64,
    pub user_id: i64,
    pub calculation_date: DateTime<Utc>,
    pub calories: String,
    pub protein: String,
}

/// Nutrition requirements repository
pub struct NutritionRequirementsRepository;

impl NutritionRequirementsRepository {
    /// Insert a calculation
    pub async fn create(
        db: &PgPool,
        user_id: i64,
        calories: &str,
        protein: &str,
    ) -> Result<NutritionRequirementsRecord> {
        let record = sqlx::query_as::<_, NutritionRequirementsRecord>(&format!(
            r#"
            INSERT INTO nutrition_requirements (user_id, calories, protein)
            VALUES ($1, $2, $3)
            RETURNING {NUTRITION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(calories)
        .bind(protein)
        .fetch_one(db)
        .await?;

        Ok(record)
    }

    /// All calculations for a user, newest first
    pub async fn list_for_user(db: &PgPool, user_id: i64) -> Result<Vec<NutritionRequirementsRecord>> {
        let records = sqlx::query_as::<_, NutritionRequirementsRecord>(&format!(
            r#"
            SELECT {NUTRITION_COLUMNS}
            FROM nutrition_requirements
            WHERE user_id = $1
            ORDER BY calculation_date DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(records)
    }

    /// Most recent calculation for a user
    pub async fn latest(db: &PgPool, user_id: i64) -> Result<Option<NutritionRequirementsRecord>> {
        let record = sqlx::query_as::<_, NutritionRequirementsRecord>(&format!(
            r#"
            SELECT {NUTRITION_COLUMNS}
            FROM nutrition_requirements
            WHERE user_id = $1
            ORDER BY calculation_date DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(record)
    }

    /// Delete one calculation
    pub async fn delete(db: &PgPool, user_id: i64, id: i64) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM nutrition_requirements WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(db)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
