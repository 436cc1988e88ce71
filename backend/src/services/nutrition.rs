//! Nutrition requirement calculations

use crate::error::{StoreError, StoreResult};
use crate::repositories::{NutritionRequirementsRecord, NutritionRequirementsRepository};
use crate::services::UserService;
use fitform_shared::validation::validate_nutrition_value;
use fitform_shared::{calculate_requirements, ActivityLevel};
use sqlx::PgPool;
use tracing::info;

/// Nutrition requirements service
pub struct NutritionService;

impl NutritionService {
    /// Calculate today's requirements from the user's profile and store them
    pub async fn calculate(
        pool: &PgPool,
        user_id: i64,
        activity: ActivityLevel,
    ) -> StoreResult<NutritionRequirementsRecord> {
        let user = UserService::get_user(pool, user_id).await?;
        let profile = user.profile().map_err(StoreError::Internal)?;
        let targets = calculate_requirements(&profile, activity);

        let record = NutritionRequirementsRepository::create(
            pool,
            user_id,
            &targets.calories_display(),
            &targets.protein_display(),
        )
        .await
        .map_err(StoreError::Internal)?;

        info!(
            user_id,
            calories_kcal = targets.calories_kcal,
            protein_g = targets.protein_g,
            ?activity,
            "Nutrition requirements calculated"
        );
        Ok(record)
    }

    /// Store caller-formatted requirement values verbatim
    pub async fn record(
        pool: &PgPool,
        user_id: i64,
        calories: &str,
        protein: &str,
    ) -> StoreResult<NutritionRequirementsRecord> {
        validate_nutrition_value("calories", calories).map_err(StoreError::Validation)?;
        validate_nutrition_value("protein", protein).map_err(StoreError::Validation)?;
        UserService::get_user(pool, user_id).await?;

        NutritionRequirementsRepository::create(pool, user_id, calories, protein)
            .await
            .map_err(StoreError::Internal)
    }

    /// A user's calculations, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
    ) -> StoreResult<Vec<NutritionRequirementsRecord>> {
        NutritionRequirementsRepository::list_for_user(pool, user_id)
            .await
            .map_err(StoreError::Internal)
    }

    /// A user's most recent calculation
    pub async fn latest(pool: &PgPool, user_id: i64) -> StoreResult<NutritionRequirementsRecord> {
        NutritionRequirementsRepository::latest(pool, user_id)
            .await
            .map_err(StoreError::Internal)?
            .ok_or_else(|| StoreError::NotFound("No nutrition requirements calculated".to_string()))
    }
}
