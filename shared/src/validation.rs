//! Input validation functions
//!
//! Field rules mirror the column constraints of the persisted schema.
//! Uses the `validator` crate for email syntax.

use validator::ValidateEmail;

use crate::models::UserProfile;

/// Maximum email length
pub const EMAIL_MAX_LEN: usize = 254;
/// Maximum length of a user's display name
pub const NAME_MAX_LEN: usize = 255;
/// Maximum length of an exercise name
pub const EXERCISE_MAX_LEN: usize = 100;
/// Maximum length of an async task identifier
pub const TASK_ID_MAX_LEN: usize = 255;
/// Maximum length of a formatted nutrition value
pub const NUTRITION_VALUE_MAX_LEN: usize = 50;

/// Normalize an email address by lowercasing its domain part
///
/// The local part is case-sensitive and left untouched. Input without an
/// `@` is returned trimmed but otherwise unchanged.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("The Email field must be set".to_string());
    }
    if email.len() > EMAIL_MAX_LEN {
        return Err("Email too long".to_string());
    }
    if !email.validate_email() {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate a user's display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    validate_max_len("name", name, NAME_MAX_LEN)
}

/// Validate age in years
pub fn validate_age(age: u32) -> Result<(), String> {
    if age > 150 {
        return Err("Age cannot exceed 150 years".to_string());
    }
    Ok(())
}

/// Validate height value (in inches)
/// Valid range: 20-120 in, which also fits the column's 4,1 precision
pub fn validate_height_inches(height_inches: f64) -> Result<(), String> {
    if height_inches.is_nan() || height_inches.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_inches < 20.0 {
        return Err("Height must be at least 20 inches".to_string());
    }
    if height_inches > 120.0 {
        return Err("Height must be at most 120 inches".to_string());
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate a raw body measurement (inches)
pub fn validate_measurement(field: &str, value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} must be a valid number", field));
    }
    if value <= 0.0 {
        return Err(format!("{} must be positive", field));
    }
    if value > 200.0 {
        return Err(format!("{} must be at most 200 inches", field));
    }
    Ok(())
}

/// Validate an async task identifier
pub fn validate_task_id(task_id: &str) -> Result<(), String> {
    if task_id.trim().is_empty() {
        return Err("Task id cannot be empty".to_string());
    }
    validate_max_len("task_id", task_id, TASK_ID_MAX_LEN)
}

/// Validate a formatted nutrition value such as "2450 kcal"
pub fn validate_nutrition_value(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    validate_max_len(field, value, NUTRITION_VALUE_MAX_LEN)
}

/// Validate a string column against its maximum length (in characters)
pub fn validate_max_len(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{} must be at most {} characters", field, max));
    }
    Ok(())
}

/// Validate every required profile field
pub fn validate_profile(profile: &UserProfile) -> Result<(), String> {
    validate_name(&profile.name)?;
    validate_age(profile.age)?;
    validate_height_inches(profile.height_inches)?;
    validate_weight(profile.weight_kg)?;
    Ok(())
}
