//! Body measurement sessions
//!
//! Raw measurements are validated, combined with the user's profile to
//! derive composition metrics, then stored together.

use crate::error::{StoreError, StoreResult};
use crate::repositories::{BodyMeasurementsRecord, BodyMeasurementsRepository};
use crate::services::UserService;
use fitform_shared::{derive_metrics, BodyMeasurementInput};
use sqlx::PgPool;
use tracing::info;

/// Body measurement service
pub struct MeasurementService;

impl MeasurementService {
    /// Validate, derive and store one measurement session
    pub async fn record(
        pool: &PgPool,
        user_id: i64,
        input: &BodyMeasurementInput,
    ) -> StoreResult<BodyMeasurementsRecord> {
        input.validate().map_err(StoreError::Validation)?;

        let user = UserService::get_user(pool, user_id).await?;
        let profile = user.profile().map_err(StoreError::Internal)?;
        let derived = derive_metrics(input, profile.height_inches, profile.age, profile.sex);

        let record = BodyMeasurementsRepository::create(pool, user_id, input, &derived)
            .await
            .map_err(StoreError::Internal)?;

        info!(
            user_id,
            measurement_id = record.id,
            bmi = record.bmi,
            body_fat_percentage = record.body_fat_percentage,
            "Body measurements recorded"
        );
        Ok(record)
    }

    /// A user's sessions, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> StoreResult<Vec<BodyMeasurementsRecord>> {
        BodyMeasurementsRepository::list_for_user(pool, user_id)
            .await
            .map_err(StoreError::Internal)
    }

    /// A user's most recent session
    pub async fn latest(pool: &PgPool, user_id: i64) -> StoreResult<BodyMeasurementsRecord> {
        BodyMeasurementsRepository::latest(pool, user_id)
            .await
            .map_err(StoreError::Internal)?
            .ok_or_else(|| StoreError::NotFound("No body measurements recorded".to_string()))
    }

    /// Delete one of a user's sessions
    pub async fn delete(pool: &PgPool, user_id: i64, measurement_id: i64) -> StoreResult<()> {
        let deleted = BodyMeasurementsRepository::delete(pool, user_id, measurement_id)
            .await
            .map_err(StoreError::Internal)?;
        if !deleted {
            return Err(StoreError::NotFound("Body measurements not found".to_string()));
        }
        Ok(())
    }
}
