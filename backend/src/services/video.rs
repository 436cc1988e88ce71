//! Video upload lifecycle
//!
//! An upload is stored, handed to the external analysis worker via a task
//! id, and completed when the worker reports its result.

use crate::error::{StoreError, StoreResult};
use crate::repositories::{
    CompletedAnalysis, ExerciseLogRecord, ExerciseLogRepository, RepDetailRecord,
    RepDetailRepository, VideoUploadRecord, VideoUploadRepository,
};
use crate::services::UserService;
use crate::storage::{MediaStorage, StorageError};
use fitform_shared::validation::validate_task_id;
use fitform_shared::AnalysisResult;
use sqlx::PgPool;
use tracing::{info, warn};

/// Directory uploads are stored under, relative to the media root
pub const VIDEO_DIR: &str = "videos";

const DUPLICATE_TASK: &str = "Task id is already assigned to another upload";

/// Parse and check a worker payload before anything is written
pub fn parse_analysis(payload: &serde_json::Value) -> StoreResult<AnalysisResult> {
    let result = AnalysisResult::from_json(payload)
        .map_err(|e| StoreError::Validation(format!("Malformed analysis result: {}", e)))?;
    result.validate()?;
    Ok(result)
}

/// Video upload service
pub struct VideoService;

impl VideoService {
    /// Store an uploaded file and record it for the user
    pub async fn upload(
        pool: &PgPool,
        storage: &dyn MediaStorage,
        user_id: i64,
        original_name: &str,
        data: &[u8],
    ) -> StoreResult<VideoUploadRecord> {
        UserService::get_user(pool, user_id).await?;

        let path = storage.save(VIDEO_DIR, original_name, data).await?;

        match VideoUploadRepository::create(pool, user_id, &path).await {
            Ok(upload) => {
                info!(user_id, upload_id = upload.id, path = %upload.video, "Video uploaded");
                Ok(upload)
            }
            Err(e) => {
                if let Err(cleanup) = storage.delete(&path).await {
                    warn!(path = %path, error = %cleanup, "Failed to remove orphaned upload");
                }
                Err(StoreError::Internal(e))
            }
        }
    }

    /// Record the async task processing an upload
    pub async fn assign_task(
        pool: &PgPool,
        upload_id: i64,
        task_id: &str,
    ) -> StoreResult<VideoUploadRecord> {
        validate_task_id(task_id).map_err(StoreError::Validation)?;

        let upload = VideoUploadRepository::set_task_id(pool, upload_id, task_id.trim())
            .await
            .map_err(|e| StoreError::from_repository(e, DUPLICATE_TASK))?
            .ok_or_else(|| StoreError::NotFound("Video upload not found".to_string()))?;

        info!(upload_id, task_id = %task_id.trim(), "Analysis task assigned");
        Ok(upload)
    }

    /// Store a worker result and materialize its exercise logs
    pub async fn complete_analysis(
        pool: &PgPool,
        upload_id: i64,
        payload: &serde_json::Value,
    ) -> StoreResult<CompletedAnalysis> {
        let result = parse_analysis(payload)?;

        let completed = VideoUploadRepository::complete_analysis(pool, upload_id, payload, &result)
            .await
            .map_err(StoreError::Internal)?
            .ok_or_else(|| StoreError::NotFound("Video upload not found".to_string()))?;

        info!(
            upload_id,
            exercises = completed.exercise_logs.len(),
            rep_details = completed.rep_details,
            "Video analysis stored"
        );
        Ok(completed)
    }

    /// Complete the upload a task id was assigned to
    pub async fn complete_task(
        pool: &PgPool,
        task_id: &str,
        payload: &serde_json::Value,
    ) -> StoreResult<CompletedAnalysis> {
        let upload = VideoUploadRepository::find_by_task_id(pool, task_id.trim())
            .await
            .map_err(StoreError::Internal)?
            .ok_or_else(|| StoreError::NotFound(format!("No upload for task {}", task_id)))?;

        Self::complete_analysis(pool, upload.id, payload).await
    }

    /// A user's uploads, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> StoreResult<Vec<VideoUploadRecord>> {
        VideoUploadRepository::list_for_user(pool, user_id)
            .await
            .map_err(StoreError::Internal)
    }

    /// Exercise logs produced from an upload
    pub async fn exercise_logs(pool: &PgPool, upload_id: i64) -> StoreResult<Vec<ExerciseLogRecord>> {
        ExerciseLogRepository::list_for_video(pool, upload_id)
            .await
            .map_err(StoreError::Internal)
    }

    /// Rep details of one exercise log
    pub async fn rep_details(pool: &PgPool, exercise_log_id: i64) -> StoreResult<Vec<RepDetailRecord>> {
        RepDetailRepository::list_for_log(pool, exercise_log_id)
            .await
            .map_err(StoreError::Internal)
    }

    /// Delete an upload, its analysis rows and the stored file
    pub async fn delete_upload(
        pool: &PgPool,
        storage: &dyn MediaStorage,
        user_id: i64,
        upload_id: i64,
    ) -> StoreResult<()> {
        let upload = VideoUploadRepository::find_by_id(pool, upload_id)
            .await
            .map_err(StoreError::Internal)?
            .filter(|u| u.user_id == user_id)
            .ok_or_else(|| StoreError::NotFound("Video upload not found".to_string()))?;

        VideoUploadRepository::delete(pool, user_id, upload_id)
            .await
            .map_err(StoreError::Internal)?;

        match storage.delete(&upload.video).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => warn!(path = %upload.video, error = %e, "Failed to remove stored video"),
        }

        info!(user_id, upload_id, "Video upload deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitform_shared::AnalysisError;
    use serde_json::json;

    #[test]
    fn test_parse_valid_payload() {
        let payload = json!({
            "exercises": [{
                "exercise": "squat",
                "reps": 2,
                "timing": 6.5,
                "incorrect_reps": 1,
                "rep_details": [
                    {"rep_count": 1, "is_correct": true, "duration": 3.1},
                    {"rep_count": 2, "is_correct": false, "duration": 3.4}
                ]
            }],
            "model_version": "v3"
        });

        let result = parse_analysis(&payload).unwrap();
        assert_eq!(result.exercises.len(), 1);
        assert_eq!(result.total_reps(), 2);
    }

    #[test]
    fn test_parse_rejects_malformed_payload() {
        let payload = json!({"exercises": [{"exercise": "squat"}]});
        assert!(matches!(parse_analysis(&payload), Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_parse_rejects_inconsistent_counts() {
        let payload = json!({
            "exercises": [{
                "exercise": "lunge",
                "reps": 3,
                "timing": 9.0,
                "incorrect_reps": 4
            }]
        });

        match parse_analysis(&payload) {
            Err(StoreError::Analysis(AnalysisError::IncorrectExceedsReps { reps, incorrect_reps, .. })) => {
                assert_eq!((reps, incorrect_reps), (3, 4));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
