//! Video upload repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use fitform_shared::AnalysisResult;
use sqlx::PgPool;

use super::exercise::{ExerciseLogRecord, EXERCISE_LOG_COLUMNS};

const VIDEO_COLUMNS: &str = "id, user_id, video, uploaded_at, task_id, result";

/// Video upload record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoUploadRecord {
    pub id: i64,
    pub user_id: i64,
    /// Path relative to the media root
    pub video: String,
    pub uploaded_at: DateTime<Utc>,
    pub task_id: Option<String>,
    pub result: Option<serde_json::Value>,
}

impl VideoUploadRecord {
    /// Display label, e.g. "ada@example.com's video - 2024-05-01 10:00:00 UTC"
    pub fn label(&self, owner_email: &str) -> String {
        format!("{}'s video - {}", owner_email, self.uploaded_at)
    }

    /// Whether the async analysis has reported back
    pub fn is_analyzed(&self) -> bool {
        self.result.is_some()
    }
}

/// Upload row plus the exercise logs materialized from its result
#[derive(Debug, Clone)]
pub struct CompletedAnalysis {
    pub upload: VideoUploadRecord,
    pub exercise_logs: Vec<ExerciseLogRecord>,
    pub rep_details: u64,
}

/// Video upload repository
pub struct VideoUploadRepository;

impl VideoUploadRepository {
    /// Record a stored upload
    pub async fn create(pool: &PgPool, user_id: i64, video: &str) -> Result<VideoUploadRecord> {
        let record = sqlx::query_as::<_, VideoUploadRecord>(&format!(
            r#"
            INSERT INTO video_uploads (user_id, video)
            VALUES ($1, $2)
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(video)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find upload by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<VideoUploadRecord>> {
        let record = sqlx::query_as::<_, VideoUploadRecord>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM video_uploads WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Find the upload an async task is working on
    pub async fn find_by_task_id(pool: &PgPool, task_id: &str) -> Result<Option<VideoUploadRecord>> {
        let record = sqlx::query_as::<_, VideoUploadRecord>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM video_uploads WHERE task_id = $1"
        ))
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// All uploads for a user, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<VideoUploadRecord>> {
        let records = sqlx::query_as::<_, VideoUploadRecord>(&format!(
            r#"
            SELECT {VIDEO_COLUMNS}
            FROM video_uploads
            WHERE user_id = $1
            ORDER BY uploaded_at DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Attach the async task identifier
    pub async fn set_task_id(
        pool: &PgPool,
        id: i64,
        task_id: &str,
    ) -> Result<Option<VideoUploadRecord>> {
        let record = sqlx::query_as::<_, VideoUploadRecord>(&format!(
            r#"
            UPDATE video_uploads SET task_id = $2
            WHERE id = $1
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Store an analysis result and materialize its exercise logs
    ///
    /// Logs from an earlier result for the same upload are replaced. Returns
    /// `None` when the upload does not exist.
    pub async fn complete_analysis(
        pool: &PgPool,
        id: i64,
        payload: &serde_json::Value,
        result: &AnalysisResult,
    ) -> Result<Option<CompletedAnalysis>> {
        let mut tx = pool.begin().await?;

        let upload = sqlx::query_as::<_, VideoUploadRecord>(&format!(
            r#"
            UPDATE video_uploads SET result = $2
            WHERE id = $1
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payload)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(upload) = upload else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM exercise_logs WHERE video_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let mut exercise_logs = Vec::with_capacity(result.exercises.len());
        let mut rep_details = 0;

        for exercise in &result.exercises {
            let log = sqlx::query_as::<_, ExerciseLogRecord>(&format!(
                r#"
                INSERT INTO exercise_logs (video_id, exercise, reps, timing, incorrect_reps)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {EXERCISE_LOG_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(exercise.exercise.trim())
            .bind(exercise.reps)
            .bind(exercise.timing)
            .bind(exercise.incorrect_reps)
            .fetch_one(&mut *tx)
            .await?;

            for rep in &exercise.rep_details {
                sqlx::query(
                    r#"
                    INSERT INTO rep_details (exercise_log_id, rep_count, is_correct, duration)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(log.id)
                .bind(rep.rep_count)
                .bind(rep.is_correct)
                .bind(rep.duration)
                .execute(&mut *tx)
                .await?;
                rep_details += 1;
            }

            exercise_logs.push(log);
        }

        tx.commit().await?;

        Ok(Some(CompletedAnalysis {
            upload,
            exercise_logs,
            rep_details,
        }))
    }

    /// Delete an upload (its logs and rep details cascade)
    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM video_uploads WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
