//! Credential handling
//!
//! Argon2 password hashing for user accounts.

mod password;

pub use password::{PasswordService, UNUSABLE_PASSWORD_PREFIX};
