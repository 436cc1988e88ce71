//! FitForm Shared Library
//!
//! Domain types, validation and pure calculations used by the backend
//! and its admin tooling.

pub mod analysis;
pub mod body_composition;
pub mod errors;
pub mod health_metrics;
pub mod models;
pub mod nutrition;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use analysis::{AnalysisResult, ExerciseResult, RepResult};
pub use body_composition::{derive_metrics, BodyMeasurementInput, DerivedMetrics};
pub use errors::*;
pub use health_metrics::*;
pub use models::{Sex, UserProfile};
pub use nutrition::{calculate_requirements, NutritionTargets};
