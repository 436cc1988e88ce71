//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod exercise;
pub mod measurements;
pub mod nutrition;
pub mod user;
pub mod video;

pub use exercise::{ExerciseLogRecord, ExerciseLogRepository, RepDetailRecord, RepDetailRepository};
pub use measurements::{BodyMeasurementsRecord, BodyMeasurementsRepository};
pub use nutrition::{NutritionRequirementsRecord, NutritionRequirementsRepository};
pub use user::{CascadeSummary, CreateUser, UserRecord, UserRepository};
pub use video::{CompletedAnalysis, VideoUploadRecord, VideoUploadRepository};
