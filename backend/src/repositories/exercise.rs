//! Exercise log and rep detail repository
//!
//! Rows here are written by `VideoUploadRepository::complete_analysis`;
//! this module only reads them back and resolves their owning user.

use anyhow::Result;
use sqlx::PgPool;

use super::user::UserRecord;

pub(crate) const EXERCISE_LOG_COLUMNS: &str =
    "id, video_id, exercise, reps, timing, incorrect_reps";

const REP_DETAIL_COLUMNS: &str = "id, exercise_log_id, rep_count, is_correct, duration";

/// Exercise log record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseLogRecord {
    pub id: i64,
    pub video_id: i64,
    pub exercise: String,
    pub reps: i32,
    /// Seconds
    pub timing: f64,
    pub incorrect_reps: i32,
}

impl ExerciseLogRecord {
    /// Display label, e.g. "ada@example.com's squat - 12 reps"
    pub fn label(&self, owner_email: &str) -> String {
        format!("{}'s {} - {} reps", owner_email, self.exercise, self.reps)
    }

    /// Reps performed with correct form
    pub fn correct_reps(&self) -> i32 {
        self.reps - self.incorrect_reps
    }
}

/// Rep detail record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RepDetailRecord {
    pub id: i64,
    pub exercise_log_id: i64,
    pub rep_count: i32,
    pub is_correct: bool,
    pub duration: f64,
}

impl RepDetailRecord {
    /// Display label, e.g. "Rep 3 for squat"
    pub fn label(&self, exercise: &str) -> String {
        format!("Rep {} for {}", self.rep_count, exercise)
    }
}

/// Exercise log repository
pub struct ExerciseLogRepository;

impl ExerciseLogRepository {
    /// Find log by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ExerciseLogRecord>> {
        let log = sqlx::query_as::<_, ExerciseLogRecord>(&format!(
            "SELECT {EXERCISE_LOG_COLUMNS} FROM exercise_logs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(log)
    }

    /// Logs produced from one upload, in insertion order
    pub async fn list_for_video(pool: &PgPool, video_id: i64) -> Result<Vec<ExerciseLogRecord>> {
        let logs = sqlx::query_as::<_, ExerciseLogRecord>(&format!(
            r#"
            SELECT {EXERCISE_LOG_COLUMNS}
            FROM exercise_logs
            WHERE video_id = $1
            ORDER BY id
            "#
        ))
        .bind(video_id)
        .fetch_all(pool)
        .await?;

        Ok(logs)
    }

    /// Every log across a user's uploads, newest upload first
    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<ExerciseLogRecord>> {
        let logs = sqlx::query_as::<_, ExerciseLogRecord>(
            r#"
            SELECT el.id, el.video_id, el.exercise, el.reps, el.timing, el.incorrect_reps
            FROM exercise_logs el
            JOIN video_uploads v ON v.id = el.video_id
            WHERE v.user_id = $1
            ORDER BY v.uploaded_at DESC, v.id DESC, el.id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(logs)
    }

    /// The user who owns the log through its upload
    pub async fn owner(pool: &PgPool, id: i64) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT u.id, u.email, u.password, u.name, u.age, u.sex, u.height_inches,
                   u.weight_kg, u.user_created, u.last_login, u.is_active, u.is_staff,
                   u.is_superuser
            FROM users u
            JOIN video_uploads v ON v.user_id = u.id
            JOIN exercise_logs el ON el.video_id = v.id
            WHERE el.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

/// Rep detail repository
pub struct RepDetailRepository;

impl RepDetailRepository {
    /// Rep details of one log, by rep number
    pub async fn list_for_log(pool: &PgPool, exercise_log_id: i64) -> Result<Vec<RepDetailRecord>> {
        let reps = sqlx::query_as::<_, RepDetailRecord>(&format!(
            r#"
            SELECT {REP_DETAIL_COLUMNS}
            FROM rep_details
            WHERE exercise_log_id = $1
            ORDER BY rep_count, id
            "#
        ))
        .bind(exercise_log_id)
        .fetch_all(pool)
        .await?;

        Ok(reps)
    }

    /// The user who owns the rep through its log and upload
    pub async fn owner(pool: &PgPool, id: i64) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT u.id, u.email, u.password, u.name, u.age, u.sex, u.height_inches,
                   u.weight_kg, u.user_created, u.last_login, u.is_active, u.is_staff,
                   u.is_superuser
            FROM users u
            JOIN video_uploads v ON v.user_id = u.id
            JOIN exercise_logs el ON el.video_id = v.id
            JOIN rep_details rd ON rd.exercise_log_id = el.id
            WHERE rd.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let log = ExerciseLogRecord {
            id: 1,
            video_id: 2,
            exercise: "squat".to_string(),
            reps: 12,
            timing: 45.5,
            incorrect_reps: 3,
        };
        assert_eq!(log.label("ada@example.com"), "ada@example.com's squat - 12 reps");
        assert_eq!(log.correct_reps(), 9);

        let rep = RepDetailRecord {
            id: 5,
            exercise_log_id: 1,
            rep_count: 3,
            is_correct: false,
            duration: 2.4,
        };
        assert_eq!(rep.label(&log.exercise), "Rep 3 for squat");
    }
}
