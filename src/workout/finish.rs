//! Archiving the staged session into the history tables

use anyhow::Result;
use rusqlite::{Connection, params};
use tracing::{info, warn};

use super::staging::delete_staged_rows;
use super::{DATE_FORMAT, DEFAULT_DIFFICULTY, clean_note};
use crate::db::Database;
use crate::error::{ValidationError, check_non_negative, check_rating};

struct ArchivedExercise {
    exercise_id: i64,
    weight: f64,
    sets: i64,
    reps: i64,
    difficulty: i64,
    note: Option<String>,
}

struct ArchivedMuscleGroup {
    muscle_group_id: i64,
    pump: Option<i64>,
    soreness: Option<i64>,
    recovery: Option<i64>,
    note: Option<String>,
}

fn insert_note(conn: &Connection, note: Option<&str>, note_type: &str) -> Result<Option<i64>> {
    match note {
        Some(text) => {
            conn.execute(
                "INSERT INTO notes (note, note_type) VALUES (?1, ?2)",
                params![text, note_type],
            )?;
            Ok(Some(conn.last_insert_rowid()))
        }
        None => Ok(None),
    }
}

impl Database {
    /// Archive the staged session as a `workout` with its exercises and
    /// muscle groups, then clear staging. Exercises without completed sets
    /// are left out. Returns the new workout id.
    pub fn finish_current_workout(&mut self) -> Result<i64> {
        let staged = self.get_current_workout()?;
        let date = staged.date.ok_or(ValidationError::NothingStaged)?;
        let overall = staged.overall.first().ok_or(ValidationError::MissingOverall)?;
        if staged.overall.len() > 1 {
            warn!("{} overall records staged, archiving the first", staged.overall.len());
        }

        let duration = check_non_negative("workout_duration", overall.duration_in_minutes)?.unwrap_or(0.0);
        let workout_type = overall
            .workout_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ValidationError::Missing("workout_type"))?
            .to_string();
        let performance = check_rating("performance_rating", overall.performance)?
            .ok_or(ValidationError::Missing("performance_rating"))?;
        let fatigue = check_rating("fatigue_induced", overall.fatigue_induced)?
            .ok_or(ValidationError::Missing("fatigue_induced"))?;
        let workout_note = clean_note(overall.note.as_deref());

        let mut exercises = Vec::new();
        for staged_exercise in &staged.exercises {
            let sets = match staged_exercise.sets {
                Some(sets) if sets > 0 => sets,
                _ => continue,
            };
            let exercise = self
                .find_exercise_by_name(&staged_exercise.exercise_name)?
                .ok_or_else(|| ValidationError::UnknownExerciseName(staged_exercise.exercise_name.clone()))?;
            exercises.push(ArchivedExercise {
                exercise_id: exercise.id,
                weight: check_non_negative("weight_used", staged_exercise.weight)?.unwrap_or(0.0),
                sets,
                reps: staged_exercise.reps.unwrap_or(0).max(0),
                difficulty: check_rating("difficulty", staged_exercise.difficulty)?.unwrap_or(DEFAULT_DIFFICULTY),
                note: clean_note(staged_exercise.note.as_deref()),
            });
        }

        let mut groups = Vec::new();
        for staged_group in &staged.muscle_groups {
            let group = self
                .find_muscle_group(&staged_group.muscle_group)?
                .ok_or_else(|| ValidationError::UnknownMuscleGroup(staged_group.muscle_group.clone()))?;
            groups.push(ArchivedMuscleGroup {
                muscle_group_id: group.id,
                pump: check_rating("pump_level", staged_group.pump)?,
                soreness: check_rating("pre_workout_soreness", staged_group.soreness_before_workout)?,
                recovery: check_rating("pre_workout_recovery", staged_group.recovery_before_workout)?,
                note: clean_note(staged_group.note.as_deref()),
            });
        }

        let tx = self.conn.transaction()?;

        let note_id = insert_note(&tx, workout_note.as_deref(), "workout")?;
        tx.execute(
            "INSERT INTO workout (date, duration_in_minutes, workout_type, performance, fatigue_induced, note_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![date.format(DATE_FORMAT).to_string(), duration, workout_type, performance, fatigue, note_id],
        )?;
        let workout_id = tx.last_insert_rowid();

        for exercise in &exercises {
            let note_id = insert_note(&tx, exercise.note.as_deref(), "workout exercises")?;
            tx.execute(
                "INSERT INTO workout_exercises (workout_id, exercise_id, weight, sets, reps, difficulty, note_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    workout_id,
                    exercise.exercise_id,
                    exercise.weight,
                    exercise.sets,
                    exercise.reps,
                    exercise.difficulty,
                    note_id,
                ],
            )?;
        }

        for group in &groups {
            let note_id = insert_note(&tx, group.note.as_deref(), "muscle groups")?;
            tx.execute(
                "INSERT INTO muscle_groups_worked
                     (pump, soreness_before_workout, recovery_before_workout, muscle_group_id, workout_id, note_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![group.pump, group.soreness, group.recovery, group.muscle_group_id, workout_id, note_id],
            )?;
        }

        delete_staged_rows(&tx)?;
        tx.commit()?;

        info!(
            "Archived workout {} for {}: {} exercises, {} muscle groups",
            workout_id,
            date,
            exercises.len(),
            groups.len()
        );
        Ok(workout_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::seeded_db;
    use crate::schedule::Weekday;
    use crate::workout::{ExerciseUpdate, OverallUpdate};
    use chrono::NaiveDate;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn staged_db() -> Database {
        let mut db = seeded_db();
        for name in ["Bench Press", "Barbell Row"] {
            let id = db.find_exercise_by_name(name).unwrap().unwrap().id;
            db.add_exercise_to_schedule(id, Weekday::Monday, Some("3"), Some("8")).unwrap();
        }
        db.ensure_staged(monday()).unwrap();
        db
    }

    #[test]
    fn test_finish_archives_and_clears() {
        let mut db = staged_db();
        db.update_staged_exercise(&ExerciseUpdate {
            exercise_name: "Bench Press".to_string(),
            weight: Some(70.0),
            sets: Some(3),
            reps: Some(8),
            difficulty: Some(4),
            note: Some("paused reps".to_string()),
        })
        .unwrap();
        let overall_id = db.get_current_workout().unwrap().overall[0].workout_id;
        db.update_staged_overall(&OverallUpdate {
            workout_id: overall_id,
            duration_in_minutes: Some(50.0),
            workout_type: Some("Push".to_string()),
            performance: Some(4),
            fatigue_induced: Some(3),
            note: Some(" ".to_string()),
        })
        .unwrap();

        let workout_id = db.finish_current_workout().unwrap();

        assert!(!db.current_workout_exists().unwrap());
        assert!(db.get_current_workout().unwrap().is_empty());

        let detail = db.workout_detail(workout_id).unwrap().unwrap();
        assert_eq!(detail.summary.date, "2024-01-01");
        assert_eq!(detail.summary.duration_in_minutes, 50.0);
        assert_eq!(detail.summary.note, None);
        // Barbell Row had no sets logged
        assert_eq!(detail.exercises.len(), 1);
        assert_eq!(detail.exercises[0].exercise_name, "Bench Press");
        assert_eq!(detail.exercises[0].weight, 70.0);
        assert_eq!(detail.exercises[0].note.as_deref(), Some("paused reps"));
        assert_eq!(detail.muscle_groups.len(), 6);
        assert_eq!(db.count_rows("notes").unwrap(), 1);
    }

    #[test]
    fn test_finish_requires_staged_session() {
        let mut db = seeded_db();
        let err = db.finish_current_workout().unwrap_err();
        assert_eq!(err.downcast_ref::<ValidationError>(), Some(&ValidationError::NothingStaged));
    }

    #[test]
    fn test_finish_requires_overall() {
        let mut db = staged_db();
        let overall_id = db.get_current_workout().unwrap().overall[0].workout_id;
        db.delete_staged_overall(overall_id).unwrap();

        let err = db.finish_current_workout().unwrap_err();
        assert_eq!(err.downcast_ref::<ValidationError>(), Some(&ValidationError::MissingOverall));
        // Nothing archived, nothing cleared
        assert_eq!(db.count_rows("workout").unwrap(), 0);
        assert!(db.current_workout_exists().unwrap());
    }
}
