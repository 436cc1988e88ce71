//! Error types for the FitForm domain

use thiserror::Error;

/// Inconsistencies found in a video analysis result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Exercise name cannot be empty")]
    EmptyExerciseName,

    #[error("Exercise name '{exercise}...' exceeds 100 characters")]
    InvalidName { exercise: String },

    #[error("{exercise}: rep counts cannot be negative")]
    NegativeReps { exercise: String },

    #[error("{exercise}: incorrect_reps ({incorrect_reps}) exceeds reps ({reps})")]
    IncorrectExceedsReps {
        exercise: String,
        reps: i32,
        incorrect_reps: i32,
    },

    #[error("{exercise}: {details} rep details recorded for {reps} reps")]
    RepDetailCountMismatch {
        exercise: String,
        reps: i32,
        details: usize,
    },

    #[error("{exercise}: {flagged} reps flagged incorrect but incorrect_reps is {incorrect_reps}")]
    IncorrectCountMismatch {
        exercise: String,
        incorrect_reps: i32,
        flagged: usize,
    },

    #[error("{exercise}: {field} must be a finite, non-negative number of seconds")]
    InvalidTiming { exercise: String, field: &'static str },
}
