//! User manager: account creation, authentication and removal
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::PasswordService;
use crate::error::{StoreError, StoreResult};
use crate::repositories::{CascadeSummary, CreateUser, UserRecord, UserRepository};
use fitform_shared::validation::{normalize_email, validate_email, validate_profile};
use fitform_shared::UserProfile;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, warn};

const DUPLICATE_EMAIL: &str = "A user with that email already exists";

/// Account flags for a regular user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserFlags {
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Default for UserFlags {
    fn default() -> Self {
        Self {
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }
}

/// Caller overrides for `create_superuser`; unset flags default to `true`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuperuserFlags {
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Resolve superuser overrides, rejecting any explicit `false`
pub fn resolve_superuser_flags(flags: SuperuserFlags) -> StoreResult<UserFlags> {
    if flags.is_staff == Some(false) {
        return Err(StoreError::Validation(
            "Superuser must have is_staff=True.".to_string(),
        ));
    }
    if flags.is_superuser == Some(false) {
        return Err(StoreError::Validation(
            "Superuser must have is_superuser=True.".to_string(),
        ));
    }
    Ok(UserFlags {
        is_active: true,
        is_staff: true,
        is_superuser: true,
    })
}

/// Validate and normalize everything except the password
///
/// The returned input carries an empty password for the caller to fill in.
pub fn prepare_user(email: &str, profile: &UserProfile, flags: UserFlags) -> StoreResult<CreateUser> {
    let email = normalize_email(email);
    validate_email(&email).map_err(StoreError::Validation)?;
    validate_profile(profile).map_err(StoreError::Validation)?;

    let age = i32::try_from(profile.age)
        .map_err(|_| StoreError::Validation("Age out of range".to_string()))?;
    let height_inches = Decimal::from_f64(profile.height_inches)
        .map(|d| d.round_dp(1))
        .ok_or_else(|| StoreError::Validation("Height out of range".to_string()))?;
    let weight_kg = Decimal::from_f64(profile.weight_kg)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| StoreError::Validation("Weight out of range".to_string()))?;

    Ok(CreateUser {
        email,
        password: String::new(),
        name: profile.name.trim().to_string(),
        age,
        sex: profile.sex,
        height_inches,
        weight_kg,
        is_active: flags.is_active,
        is_staff: flags.is_staff,
        is_superuser: flags.is_superuser,
    })
}

/// User service for account management
pub struct UserService;

impl UserService {
    /// Create and persist a user
    ///
    /// A `None` password stores an unusable credential.
    pub async fn create_user(
        pool: &PgPool,
        email: &str,
        password: Option<String>,
        profile: &UserProfile,
        flags: UserFlags,
    ) -> StoreResult<UserRecord> {
        let mut input = prepare_user(email, profile, flags)?;

        if UserRepository::email_exists(pool, &input.email)
            .await
            .map_err(StoreError::Internal)?
        {
            return Err(StoreError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        input.password = PasswordService::make_password(password)
            .await
            .map_err(StoreError::Internal)?;

        let user = UserRepository::create(pool, input)
            .await
            .map_err(|e| StoreError::from_repository(e, DUPLICATE_EMAIL))?;

        info!(
            user_id = user.id,
            is_staff = user.is_staff,
            is_superuser = user.is_superuser,
            "User created"
        );
        Ok(user)
    }

    /// Create a user with staff and superuser rights
    pub async fn create_superuser(
        pool: &PgPool,
        email: &str,
        password: Option<String>,
        profile: &UserProfile,
        flags: SuperuserFlags,
    ) -> StoreResult<UserRecord> {
        let flags = resolve_superuser_flags(flags)?;
        Self::create_user(pool, email, password, profile, flags).await
    }

    /// Check credentials and stamp the login time
    pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> StoreResult<UserRecord> {
        let email = normalize_email(email);
        let mut user = UserRepository::find_by_email(pool, &email)
            .await
            .map_err(StoreError::Internal)?
            .ok_or_else(|| StoreError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = PasswordService::verify_async(password.to_string(), user.password.clone())
            .await
            .map_err(StoreError::Internal)?;
        if !valid {
            warn!(user_id = user.id, "Rejected login with invalid password");
            return Err(StoreError::Unauthorized("Invalid credentials".to_string()));
        }

        if !user.is_active {
            return Err(StoreError::Unauthorized("Account is inactive".to_string()));
        }

        let stamped = UserRepository::touch_last_login(pool, user.id)
            .await
            .map_err(StoreError::Internal)?;
        user.last_login = Some(stamped);

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_user(pool: &PgPool, user_id: i64) -> StoreResult<UserRecord> {
        UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(StoreError::Internal)?
            .ok_or_else(|| StoreError::NotFound("User not found".to_string()))
    }

    /// Delete a user together with every dependent row
    pub async fn delete_user(pool: &PgPool, user_id: i64) -> StoreResult<CascadeSummary> {
        Self::get_user(pool, user_id).await?;

        let summary = UserRepository::delete_cascade(pool, user_id)
            .await
            .map_err(StoreError::Internal)?;

        info!(
            user_id,
            video_uploads = summary.video_uploads,
            exercise_logs = summary.exercise_logs,
            rep_details = summary.rep_details,
            body_measurements = summary.body_measurements,
            nutrition_requirements = summary.nutrition_requirements,
            "User deleted"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitform_shared::Sex;
    use rstest::rstest;
    use std::str::FromStr;

    fn profile() -> UserProfile {
        UserProfile {
            name: "Ada Lovelace".to_string(),
            age: 36,
            sex: Sex::Female,
            height_inches: 65.46,
            weight_kg: 60.256,
        }
    }

    #[test]
    fn test_prepare_normalizes_email() {
        let input = prepare_user("  a@B.COM ", &profile(), UserFlags::default()).unwrap();
        assert_eq!(input.email, "a@b.com");
        assert!(input.password.is_empty());
        assert!(input.is_active);
        assert!(!input.is_staff);
        assert!(!input.is_superuser);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_prepare_requires_email(#[case] email: &str) {
        match prepare_user(email, &profile(), UserFlags::default()) {
            Err(StoreError::Validation(msg)) => assert_eq!(msg, "The Email field must be set"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_prepare_rounds_to_column_precision() {
        let input = prepare_user("ada@example.com", &profile(), UserFlags::default()).unwrap();
        assert_eq!(input.height_inches, Decimal::from_str("65.5").unwrap());
        assert_eq!(input.weight_kg, Decimal::from_str("60.26").unwrap());
        assert_eq!(input.age, 36);
        assert_eq!(input.sex, Sex::Female);
    }

    #[test]
    fn test_prepare_rejects_invalid_profile() {
        let mut bad = profile();
        bad.name = "  ".to_string();
        assert!(matches!(
            prepare_user("ada@example.com", &bad, UserFlags::default()),
            Err(StoreError::Validation(_))
        ));

        let mut bad = profile();
        bad.weight_kg = f64::NAN;
        assert!(matches!(
            prepare_user("ada@example.com", &bad, UserFlags::default()),
            Err(StoreError::Validation(_))
        ));
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(true), None)]
    #[case(None, Some(true))]
    #[case(Some(true), Some(true))]
    fn test_superuser_flags_forced_true(
        #[case] is_staff: Option<bool>,
        #[case] is_superuser: Option<bool>,
    ) {
        let flags = resolve_superuser_flags(SuperuserFlags {
            is_staff,
            is_superuser,
        })
        .unwrap();
        assert!(flags.is_active && flags.is_staff && flags.is_superuser);
    }

    #[rstest]
    #[case(Some(false), None, "Superuser must have is_staff=True.")]
    #[case(Some(false), Some(false), "Superuser must have is_staff=True.")]
    #[case(None, Some(false), "Superuser must have is_superuser=True.")]
    #[case(Some(true), Some(false), "Superuser must have is_superuser=True.")]
    fn test_superuser_flags_reject_false(
        #[case] is_staff: Option<bool>,
        #[case] is_superuser: Option<bool>,
        #[case] expected: &str,
    ) {
        match resolve_superuser_flags(SuperuserFlags {
            is_staff,
            is_superuser,
        }) {
            Err(StoreError::Validation(msg)) => assert_eq!(msg, expected),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
