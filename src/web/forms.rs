//! Request payloads for the form and JSON routes
//!
//! Browsers send every input value as a string, so numeric JSON fields
//! accept numbers, numeric strings, empty strings and null.

use axum::extract::FromRequest;
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use super::AppError;
use crate::error::ValidationError;

/// JSON body whose rejections answer like any other bad request
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Urlencoded body with repeated keys, rejections as for [`JsonBody`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum_extra::extract::Form), rejection(AppError))]
pub struct FormBody<T>(pub T);

/// Blank → `None`, otherwise the value must parse
pub fn parse_opt_i64(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse().map(Some).map_err(|_| ValidationError::InvalidNumber {
            field,
            value: s.to_string(),
        }),
        None => Ok(None),
    }
}

pub fn parse_opt_f64(field: &'static str, raw: Option<&str>) -> Result<Option<f64>, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse().map(Some).map_err(|_| ValidationError::InvalidNumber {
            field,
            value: s.to_string(),
        }),
        None => Ok(None),
    }
}

pub fn parse_i64(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    parse_opt_i64(field, Some(raw))?.ok_or(ValidationError::Missing(field))
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| de::Error::custom("number out of range")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("'{s}' is not a number"))),
        Some(other) => Err(de::Error::custom(format!("expected a number, got {other}"))),
    }
}

pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    lenient_number(deserializer)
}

pub(crate) fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match lenient_number(deserializer)? {
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(Some(v as i64)),
        Some(v) => Err(de::Error::custom(format!("expected a whole number, got {v}"))),
        None => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
pub struct AddToScheduleForm {
    #[serde(default, alias = "selected_exercises[]")]
    pub selected_exercises: Vec<String>,
    pub day_of_week: Option<String>,
    pub sets: Option<String>,
    pub reps: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteScheduledForm {
    pub exercise_id: String,
    pub day_of_week: String,
}

/// Parallel lists from the "add from library" table on the log page
#[derive(Debug, Deserialize)]
pub struct AddToLogForm {
    #[serde(default, alias = "exercise_id[]")]
    pub exercise_id: Vec<String>,
    #[serde(default, alias = "weight[]")]
    pub weight: Vec<String>,
    #[serde(default, alias = "sets[]")]
    pub sets: Vec<String>,
    #[serde(default, alias = "reps[]")]
    pub reps: Vec<String>,
    #[serde(default, alias = "selected_exercises[]")]
    pub selected_exercises: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMuscleGroupsForm {
    #[serde(default, alias = "selected_muscle_groups[]")]
    pub selected_muscle_groups: Vec<String>,
    pub pump_level_add: Option<String>,
    pub pre_workout_soreness_add: Option<String>,
    pub pre_workout_recovery_add: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteLogExerciseForm {
    pub exercise_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteLogMuscleGroupForm {
    pub muscle_group: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteLogOverallForm {
    pub workout_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DatePayload {
    pub workout_date: String,
}

#[derive(Debug, Deserialize)]
pub struct ExercisePayload {
    pub exercise_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight_used: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub sets_completed: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub reps_completed: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub difficulty: Option<i64>,
    #[serde(default)]
    pub exercise_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MuscleGroupPayload {
    pub muscle_group_name: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub pump_level: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub pre_workout_soreness: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub pre_workout_recovery: Option<i64>,
    #[serde(default)]
    pub muscle_group_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OverallPayload {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub workout_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub workout_duration: Option<f64>,
    #[serde(default)]
    pub workout_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub performance_rating: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub fatigue_induced: Option<i64>,
    #[serde(default)]
    pub workout_notes: Option<String>,
}
