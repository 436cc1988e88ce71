//! Data models for the FitForm application

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::health_metrics::BiologicalSex;

/// Sex recorded on a user profile, stored as a single-character code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Sex {
    /// Database code for this value
    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Other => "O",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Other => "Other",
        }
    }

    /// Physiological sex for metric formulas, if one applies
    pub fn biological(&self) -> Option<BiologicalSex> {
        match self {
            Sex::Male => Some(BiologicalSex::Male),
            Sex::Female => Some(BiologicalSex::Female),
            Sex::Other => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Sex::Male),
            "f" | "female" => Ok(Sex::Female),
            "o" | "other" => Ok(Sex::Other),
            _ => Err(format!("Invalid sex '{}'. Must be one of: M, F, O", s)),
        }
    }
}

/// Profile fields every user must provide at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub height_inches: f64,
    pub weight_kg: f64,
}
