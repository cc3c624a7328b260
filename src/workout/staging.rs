//! Creating, loading and clearing the staged session

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{info, warn};

use super::{
    CurrentWorkout, DATE_FORMAT, DEFAULT_DIFFICULTY, DEFAULT_FATIGUE, DEFAULT_PERFORMANCE, DEFAULT_PUMP,
    DEFAULT_RECOVERY, DEFAULT_SORENESS, DEFAULT_WORKOUT_TYPE, OverallRecord, StagedExercise, StagedMuscleGroup,
};
use crate::db::Database;
use crate::schedule::Weekday;

pub(super) const STAGING_TABLES: [&str; 4] = [
    "current_workout_date",
    "current_workout_exercises",
    "current_workout_muscle_groups",
    "current_workout_overall",
];

pub(super) fn delete_staged_rows(conn: &Connection) -> Result<()> {
    for table in STAGING_TABLES {
        conn.execute(&format!("DELETE FROM {table}"), [])?;
    }
    Ok(())
}

pub(super) fn insert_default_overall(conn: &Connection, duration: Option<f64>) -> Result<i64> {
    conn.execute(
        "INSERT INTO current_workout_overall
             (duration_in_minutes, workout_type, performance, fatigue_induced, note)
         VALUES (?1, ?2, ?3, ?4, '')",
        params![duration, DEFAULT_WORKOUT_TYPE, DEFAULT_PERFORMANCE, DEFAULT_FATIGUE],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_date(conn: &Connection, date: NaiveDate) -> Result<()> {
    conn.execute(
        "INSERT INTO current_workout_date (date) VALUES (?1)",
        params![date.format(DATE_FORMAT).to_string()],
    )?;
    Ok(())
}

impl Database {
    /// True when a staged session exists
    pub fn current_workout_exists(&self) -> Result<bool> {
        Ok(self.count_rows("current_workout_date")? > 0)
    }

    /// Stage `date`'s weekday template unless a session is already staged.
    /// Returns true when a new session was created.
    pub fn ensure_staged(&mut self, date: NaiveDate) -> Result<bool> {
        if self.current_workout_exists()? {
            return Ok(false);
        }
        self.stage_from_schedule(date)?;
        Ok(true)
    }

    fn stage_from_schedule(&mut self, date: NaiveDate) -> Result<()> {
        let weekday = Weekday::of(date);
        let planned = self.get_weekday_exercises(weekday)?;
        let ids: Vec<i64> = planned.iter().map(|p| p.exercise_id).collect();

        let mut groups: BTreeSet<String> = planned.iter().map(|p| p.primary_muscle_group.clone()).collect();
        groups.extend(self.get_secondary_muscle_groups(&ids)?);

        let tx = self.conn.transaction()?;
        delete_staged_rows(&tx)?;
        insert_date(&tx, date)?;

        for exercise in &planned {
            tx.execute(
                "INSERT INTO current_workout_exercises
                     (exercise_name, weight, sets, target_sets, reps, target_reps, difficulty, note)
                 VALUES (?1, NULL, NULL, ?2, NULL, ?3, ?4, '')",
                params![exercise.exercise_name, exercise.target_sets, exercise.target_reps, DEFAULT_DIFFICULTY],
            )?;
        }

        for group in &groups {
            tx.execute(
                "INSERT INTO current_workout_muscle_groups
                     (muscle_group, pump, soreness_before_workout, recovery_before_workout, note)
                 VALUES (?1, ?2, ?3, ?4, '')",
                params![group, DEFAULT_PUMP, DEFAULT_SORENESS, DEFAULT_RECOVERY],
            )?;
        }

        insert_default_overall(&tx, None)?;
        tx.commit()?;

        info!(
            "Staged {} workout for {}: {} exercises, {} muscle groups",
            weekday,
            date,
            planned.len(),
            groups.len()
        );
        Ok(())
    }

    /// Delete every staged row. Nothing is archived.
    pub fn clear_current_workout(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        delete_staged_rows(&tx)?;
        tx.commit()?;
        info!("Cleared current workout");
        Ok(())
    }

    /// Replace the staged session with an empty one for `date`
    pub fn start_blank_workout(&mut self, date: NaiveDate) -> Result<()> {
        let tx = self.conn.transaction()?;
        delete_staged_rows(&tx)?;
        insert_date(&tx, date)?;
        insert_default_overall(&tx, Some(0.0))?;
        tx.commit()?;
        info!("Started blank workout for {}", date);
        Ok(())
    }

    /// Drop the staged session and stage `date`'s template again
    pub fn reset_to_schedule(&mut self, date: NaiveDate) -> Result<()> {
        self.stage_from_schedule(date)
    }

    /// Read the staged session as stored
    pub fn get_current_workout(&self) -> Result<CurrentWorkout> {
        let date: Option<String> = self
            .conn
            .query_row("SELECT date FROM current_workout_date LIMIT 1", [], |row| row.get(0))
            .optional()?;

        let date = match date {
            Some(raw) => match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
                Ok(d) => Some(d),
                Err(_) => {
                    warn!("Ignoring malformed staged date '{}'", raw);
                    None
                }
            },
            None => None,
        };

        let exercises = self
            .conn
            .prepare(
                "SELECT exercise_name, weight, sets, target_sets, reps, target_reps, difficulty, note
                 FROM current_workout_exercises ORDER BY rowid",
            )?
            .query_map([], |row| {
                Ok(StagedExercise {
                    exercise_name: row.get(0)?,
                    weight: row.get(1)?,
                    sets: row.get(2)?,
                    target_sets: row.get(3)?,
                    reps: row.get(4)?,
                    target_reps: row.get(5)?,
                    difficulty: row.get(6)?,
                    note: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let muscle_groups = self
            .conn
            .prepare(
                "SELECT muscle_group, pump, soreness_before_workout, recovery_before_workout, note
                 FROM current_workout_muscle_groups ORDER BY rowid",
            )?
            .query_map([], |row| {
                Ok(StagedMuscleGroup {
                    muscle_group: row.get(0)?,
                    pump: row.get(1)?,
                    soreness_before_workout: row.get(2)?,
                    recovery_before_workout: row.get(3)?,
                    note: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let overall = self
            .conn
            .prepare(
                "SELECT workout_id, duration_in_minutes, workout_type, performance, fatigue_induced, note
                 FROM current_workout_overall ORDER BY workout_id",
            )?
            .query_map([], |row| {
                Ok(OverallRecord {
                    workout_id: row.get(0)?,
                    duration_in_minutes: row.get(1)?,
                    workout_type: row.get(2)?,
                    performance: row.get(3)?,
                    fatigue_induced: row.get(4)?,
                    note: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CurrentWorkout {
            date,
            exercises,
            muscle_groups,
            overall,
        })
    }

    /// Stage if absent, then load. A missing overall record is replaced by
    /// a persisted placeholder so the log page always has one to edit.
    pub fn view_current_workout(&mut self, today: NaiveDate) -> Result<CurrentWorkout> {
        self.ensure_staged(today)?;
        let mut workout = self.get_current_workout()?;

        if workout.overall.is_empty() {
            insert_default_overall(&self.conn, Some(0.0))?;
            info!("Inserted placeholder overall workout record");
            workout.overall = self.get_current_workout()?.overall;
        }
        if workout.date.is_none() {
            workout.date = Some(today);
        }
        Ok(workout)
    }
}
