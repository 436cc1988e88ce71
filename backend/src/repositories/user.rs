//! User repository for database operations

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fitform_shared::{Sex, UserProfile};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::fmt;

const USER_COLUMNS: &str = r#"
    id, email, password, name, age, sex, height_inches, weight_kg,
    user_created, last_login, is_active, is_staff, is_superuser
"#;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub name: String,
    pub age: i32,
    pub sex: String,
    pub height_inches: Decimal,
    pub weight_kg: Decimal,
    pub user_created: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl UserRecord {
    /// Profile fields in domain form
    pub fn profile(&self) -> Result<UserProfile> {
        let sex: Sex = self.sex.parse().map_err(anyhow::Error::msg)?;
        Ok(UserProfile {
            name: self.name.clone(),
            age: u32::try_from(self.age).context("negative age stored")?,
            sex,
            height_inches: self.height_inches.to_f64().context("height out of range")?,
            weight_kg: self.weight_kg.to_f64().context("weight out of range")?,
        })
    }
}

impl fmt::Display for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// Input for inserting a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub age: i32,
    pub sex: Sex,
    pub height_inches: Decimal,
    pub weight_kg: Decimal,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Rows removed by a cascading user delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub users: u64,
    pub video_uploads: u64,
    pub exercise_logs: u64,
    pub rep_details: u64,
    pub body_measurements: u64,
    pub nutrition_requirements: u64,
}

impl CascadeSummary {
    /// Total rows removed across all tables
    pub fn total(&self) -> u64 {
        self.users
            + self.video_uploads
            + self.exercise_logs
            + self.rep_details
            + self.body_measurements
            + self.nutrition_requirements
    }
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a new user
    pub async fn create(pool: &PgPool, input: CreateUser) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (email, password, name, age, sex, height_inches, weight_kg,
                               is_active, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&input.email)
        .bind(&input.password)
        .bind(&input.name)
        .bind(input.age)
        .bind(input.sex.code())
        .bind(input.height_inches)
        .bind(input.weight_kg)
        .bind(input.is_active)
        .bind(input.is_staff)
        .bind(input.is_superuser)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Check if email exists
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Stamp the last successful login
    pub async fn touch_last_login(pool: &PgPool, id: i64) -> Result<DateTime<Utc>> {
        let stamped = sqlx::query_scalar::<_, DateTime<Utc>>(
            "UPDATE users SET last_login = NOW() WHERE id = $1 RETURNING last_login",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(stamped)
    }

    /// Activate or deactivate an account
    pub async fn set_active(pool: &PgPool, id: i64, is_active: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(is_active)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a user and every dependent row in one transaction
    ///
    /// Dependents are removed leaf-first so the per-table counts are exact
    /// regardless of the foreign keys' own cascade rules.
    pub async fn delete_cascade(pool: &PgPool, id: i64) -> Result<CascadeSummary> {
        let mut tx = pool.begin().await?;

        let rep_details = sqlx::query(
            r#"
            DELETE FROM rep_details
            WHERE exercise_log_id IN (
                SELECT el.id FROM exercise_logs el
                JOIN video_uploads v ON v.id = el.video_id
                WHERE v.user_id = $1
            )
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let exercise_logs = sqlx::query(
            r#"
            DELETE FROM exercise_logs
            WHERE video_id IN (SELECT id FROM video_uploads WHERE user_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let video_uploads = sqlx::query("DELETE FROM video_uploads WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let body_measurements = sqlx::query("DELETE FROM body_measurements WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let nutrition_requirements =
            sqlx::query("DELETE FROM nutrition_requirements WHERE user_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        let users = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(CascadeSummary {
            users,
            video_uploads,
            exercise_logs,
            rep_details,
            body_measurements,
            nutrition_requirements,
        })
    }
}
