//! Current workout - the single staged session being logged today
//!
//! Lifecycle:
//! - absent: no row in `current_workout_date`
//! - staged: created from the weekday template by [`Database::ensure_staged`]
//! - edited/extended/reduced: per-row updates, inserts and deletes
//! - cleared: [`Database::clear_current_workout`] empties all four staging tables
//! - finished: [`Database::finish_current_workout`] archives into history, then clears

mod edits;
mod finish;
mod staging;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, check_non_negative, check_rating};

pub const DEFAULT_DIFFICULTY: i64 = 3;
pub const DEFAULT_PUMP: i64 = 3;
pub const DEFAULT_SORENESS: i64 = 1;
pub const DEFAULT_RECOVERY: i64 = 5;
pub const DEFAULT_WORKOUT_TYPE: &str = "Push";
pub const DEFAULT_PERFORMANCE: i64 = 4;
pub const DEFAULT_FATIGUE: i64 = 3;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedExercise {
    pub exercise_name: String,
    pub weight: Option<f64>,
    pub sets: Option<i64>,
    pub target_sets: Option<i64>,
    pub reps: Option<i64>,
    pub target_reps: Option<i64>,
    pub difficulty: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedMuscleGroup {
    pub muscle_group: String,
    pub pump: Option<i64>,
    pub soreness_before_workout: Option<i64>,
    pub recovery_before_workout: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallRecord {
    pub workout_id: i64,
    pub duration_in_minutes: Option<f64>,
    pub workout_type: Option<String>,
    pub performance: Option<i64>,
    pub fatigue_induced: Option<i64>,
    pub note: Option<String>,
}

/// Snapshot of the staged session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWorkout {
    pub date: Option<NaiveDate>,
    pub exercises: Vec<StagedExercise>,
    pub muscle_groups: Vec<StagedMuscleGroup>,
    pub overall: Vec<OverallRecord>,
}

impl CurrentWorkout {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.exercises.is_empty() && self.muscle_groups.is_empty() && self.overall.is_empty()
    }
}

/// New actuals for one staged exercise, matched by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseUpdate {
    pub exercise_name: String,
    pub weight: Option<f64>,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub difficulty: Option<i64>,
    pub note: Option<String>,
}

impl ExerciseUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.exercise_name.trim().is_empty() {
            return Err(ValidationError::Missing("exercise_name"));
        }
        check_non_negative("weight_used", self.weight)?;
        check_non_negative("sets_completed", self.sets.map(|v| v as f64))?;
        check_non_negative("reps_completed", self.reps.map(|v| v as f64))?;
        check_rating("difficulty", self.difficulty)?;
        Ok(())
    }
}

/// New readings for one staged muscle group, matched by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MuscleGroupUpdate {
    pub muscle_group: String,
    pub pump: Option<i64>,
    pub soreness_before_workout: Option<i64>,
    pub recovery_before_workout: Option<i64>,
    pub note: Option<String>,
}

impl MuscleGroupUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.muscle_group.trim().is_empty() {
            return Err(ValidationError::Missing("muscle_group_name"));
        }
        check_rating("pump_level", self.pump)?;
        check_rating("pre_workout_soreness", self.soreness_before_workout)?;
        check_rating("pre_workout_recovery", self.recovery_before_workout)?;
        Ok(())
    }
}

/// Overall session fields, matched by `workout_id`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverallUpdate {
    pub workout_id: i64,
    pub duration_in_minutes: Option<f64>,
    pub workout_type: Option<String>,
    pub performance: Option<i64>,
    pub fatigue_induced: Option<i64>,
    pub note: Option<String>,
}

impl OverallUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_non_negative("workout_duration", self.duration_in_minutes)?;
        check_rating("performance_rating", self.performance)?;
        check_rating("fatigue_induced", self.fatigue_induced)?;
        Ok(())
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Empty or whitespace-only notes are stored as NULL
pub(crate) fn clean_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string)
}
