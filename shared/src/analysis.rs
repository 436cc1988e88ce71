//! Video analysis result payload
//!
//! The async video worker reports one entry per detected exercise with
//! per-repetition detail. The payload is stored verbatim on the upload and
//! materialized into exercise logs and rep details; unknown keys are kept in
//! the stored JSON but ignored here.

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;
use crate::validation::{validate_max_len, EXERCISE_MAX_LEN};

/// Complete result for one uploaded video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub exercises: Vec<ExerciseResult>,
}

/// One exercise detected in the video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseResult {
    pub exercise: String,
    pub reps: i32,
    /// Total time spent on the exercise, in seconds
    pub timing: f64,
    pub incorrect_reps: i32,
    #[serde(default)]
    pub rep_details: Vec<RepResult>,
}

/// A single repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepResult {
    pub rep_count: i32,
    pub is_correct: bool,
    /// Duration of the repetition, in seconds
    pub duration: f64,
}

impl AnalysisResult {
    /// Parse a stored result payload
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }

    /// Check every exercise for internal consistency
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.exercises.iter().try_for_each(ExerciseResult::validate)
    }

    /// Total repetitions across all exercises
    pub fn total_reps(&self) -> i64 {
        self.exercises.iter().map(|e| e.reps as i64).sum()
    }
}

impl ExerciseResult {
    /// Check rep totals against the per-rep detail
    ///
    /// `incorrect_reps` may not exceed `reps`; when rep detail is present it
    /// must account for every rep and agree on the incorrect count.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let exercise = self.exercise.trim();
        if exercise.is_empty() {
            return Err(AnalysisError::EmptyExerciseName);
        }
        if validate_max_len("exercise", exercise, EXERCISE_MAX_LEN).is_err() {
            return Err(AnalysisError::InvalidName {
                exercise: exercise.chars().take(EXERCISE_MAX_LEN).collect(),
            });
        }
        if self.reps < 0 || self.incorrect_reps < 0 {
            return Err(AnalysisError::NegativeReps {
                exercise: exercise.to_string(),
            });
        }
        if self.incorrect_reps > self.reps {
            return Err(AnalysisError::IncorrectExceedsReps {
                exercise: exercise.to_string(),
                reps: self.reps,
                incorrect_reps: self.incorrect_reps,
            });
        }
        if !is_valid_seconds(self.timing) {
            return Err(AnalysisError::InvalidTiming {
                exercise: exercise.to_string(),
                field: "timing",
            });
        }
        if self.rep_details.is_empty() {
            return Ok(());
        }

        if self.rep_details.len() != self.reps as usize {
            return Err(AnalysisError::RepDetailCountMismatch {
                exercise: exercise.to_string(),
                reps: self.reps,
                details: self.rep_details.len(),
            });
        }
        if self.rep_details.iter().any(|r| !is_valid_seconds(r.duration)) {
            return Err(AnalysisError::InvalidTiming {
                exercise: exercise.to_string(),
                field: "duration",
            });
        }
        let flagged = self.rep_details.iter().filter(|r| !r.is_correct).count();
        if flagged != self.incorrect_reps as usize {
            return Err(AnalysisError::IncorrectCountMismatch {
                exercise: exercise.to_string(),
                incorrect_reps: self.incorrect_reps,
                flagged,
            });
        }
        Ok(())
    }
}

fn is_valid_seconds(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
