//! Validation errors raised before anything reaches the database

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be between 1 and 5, got {value}")]
    RatingOutOfRange { field: &'static str, value: i64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid weekday {0}, expected 0 (Sunday) to 6 (Saturday)")]
    InvalidWeekday(i64),

    #[error("unknown exercise id {0}")]
    UnknownExercise(i64),

    #[error("unknown exercise '{0}'")]
    UnknownExerciseName(String),

    #[error("unknown muscle group '{0}'")]
    UnknownMuscleGroup(String),

    #[error("table '{0}' cannot be seeded from CSV")]
    UnknownSeedTable(String),

    #[error("invalid column name '{column}' in {file}")]
    InvalidSeedColumn { file: String, column: String },

    #[error("no workout is staged")]
    NothingStaged,

    #[error("the staged workout has no overall record to archive")]
    MissingOverall,

    #[error("{0} is required")]
    Missing(&'static str),
}

/// Check a 1-5 rating, passing `None` through
pub fn check_rating(field: &'static str, value: Option<i64>) -> Result<Option<i64>, ValidationError> {
    match value {
        Some(v) if !(1..=5).contains(&v) => Err(ValidationError::RatingOutOfRange { field, value: v }),
        other => Ok(other),
    }
}

pub fn check_non_negative(field: &'static str, value: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(v) if v < 0.0 => Err(ValidationError::Negative { field, value: v }),
        other => Ok(other),
    }
}
