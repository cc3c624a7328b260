//! Field-level edits, additions and deletions on the staged session

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::params;
use tracing::debug;

use super::staging::insert_default_overall;
use super::{
    DATE_FORMAT, DEFAULT_DIFFICULTY, DEFAULT_PUMP, DEFAULT_RECOVERY, DEFAULT_SORENESS, ExerciseUpdate,
    MuscleGroupUpdate, OverallUpdate,
};
use crate::db::Database;
use crate::error::{ValidationError, check_non_negative, check_rating};

impl Database {
    pub fn update_current_workout_date(&self, date: NaiveDate) -> Result<()> {
        let date = date.format(DATE_FORMAT).to_string();
        let updated = self
            .conn
            .execute("UPDATE current_workout_date SET date = ?1", params![date])?;
        if updated == 0 {
            self.conn
                .execute("INSERT INTO current_workout_date (date) VALUES (?1)", params![date])?;
        }
        debug!("Current workout date set to {}", date);
        Ok(())
    }

    /// Overwrite the actuals of the staged exercise named in `update`
    pub fn update_staged_exercise(&self, update: &ExerciseUpdate) -> Result<usize> {
        update.validate()?;
        let changed = self.conn.execute(
            "UPDATE current_workout_exercises
             SET weight = ?1, sets = ?2, reps = ?3, difficulty = ?4, note = ?5
             WHERE exercise_name = ?6",
            params![
                update.weight,
                update.sets,
                update.reps,
                update.difficulty,
                update.note,
                update.exercise_name,
            ],
        )?;
        debug!("Updated staged exercise '{}' ({} rows)", update.exercise_name, changed);
        Ok(changed)
    }

    pub fn update_staged_muscle_group(&self, update: &MuscleGroupUpdate) -> Result<usize> {
        update.validate()?;
        let changed = self.conn.execute(
            "UPDATE current_workout_muscle_groups
             SET pump = ?1, soreness_before_workout = ?2, recovery_before_workout = ?3, note = ?4
             WHERE muscle_group = ?5",
            params![
                update.pump,
                update.soreness_before_workout,
                update.recovery_before_workout,
                update.note,
                update.muscle_group,
            ],
        )?;
        debug!("Updated staged muscle group '{}' ({} rows)", update.muscle_group, changed);
        Ok(changed)
    }

    pub fn update_staged_overall(&self, update: &OverallUpdate) -> Result<usize> {
        update.validate()?;
        let changed = self.conn.execute(
            "UPDATE current_workout_overall
             SET duration_in_minutes = ?1, workout_type = ?2, performance = ?3, fatigue_induced = ?4, note = ?5
             WHERE workout_id = ?6",
            params![
                update.duration_in_minutes,
                update.workout_type,
                update.performance,
                update.fatigue_induced,
                update.note,
                update.workout_id,
            ],
        )?;
        debug!("Updated staged overall record {} ({} rows)", update.workout_id, changed);
        Ok(changed)
    }

    /// Append a library exercise to the staged session
    pub fn add_exercise_to_log(
        &self,
        exercise_id: i64,
        weight: Option<f64>,
        sets: Option<i64>,
        reps: Option<i64>,
    ) -> Result<()> {
        let exercise = self
            .find_exercise(exercise_id)?
            .ok_or(ValidationError::UnknownExercise(exercise_id))?;
        check_non_negative("weight", weight)?;
        check_non_negative("sets", sets.map(|v| v as f64))?;
        check_non_negative("reps", reps.map(|v| v as f64))?;

        self.conn.execute(
            "INSERT INTO current_workout_exercises
                 (exercise_name, weight, sets, target_sets, reps, target_reps, difficulty, note)
             VALUES (?1, ?2, ?3, NULL, ?4, NULL, ?5, '')",
            params![exercise.name, weight, sets, reps, DEFAULT_DIFFICULTY],
        )?;
        debug!("Added '{}' to current workout", exercise.name);
        Ok(())
    }

    /// Append a muscle group; missing readings take the staging defaults
    pub fn add_muscle_group_to_log(
        &self,
        muscle_group: &str,
        pump: Option<i64>,
        soreness_before_workout: Option<i64>,
        recovery_before_workout: Option<i64>,
    ) -> Result<()> {
        let group = self
            .find_muscle_group(muscle_group)?
            .ok_or_else(|| ValidationError::UnknownMuscleGroup(muscle_group.to_string()))?;
        let pump = check_rating("pump_level", pump)?.unwrap_or(DEFAULT_PUMP);
        let soreness = check_rating("pre_workout_soreness", soreness_before_workout)?.unwrap_or(DEFAULT_SORENESS);
        let recovery = check_rating("pre_workout_recovery", recovery_before_workout)?.unwrap_or(DEFAULT_RECOVERY);

        self.conn.execute(
            "INSERT INTO current_workout_muscle_groups
                 (muscle_group, pump, soreness_before_workout, recovery_before_workout, note)
             VALUES (?1, ?2, ?3, ?4, '')",
            params![group.name, pump, soreness, recovery],
        )?;
        debug!("Added muscle group '{}' to current workout", group.name);
        Ok(())
    }

    /// Append a default overall record, returning its id
    pub fn add_staged_overall(&self) -> Result<i64> {
        insert_default_overall(&self.conn, Some(0.0))
    }

    pub fn delete_staged_exercise(&self, exercise_name: &str) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM current_workout_exercises WHERE exercise_name = ?1",
            params![exercise_name],
        )?;
        debug!("Deleted staged exercise '{}' ({} rows)", exercise_name, removed);
        Ok(removed)
    }

    pub fn delete_staged_muscle_group(&self, muscle_group: &str) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM current_workout_muscle_groups WHERE muscle_group = ?1",
            params![muscle_group],
        )?;
        debug!("Deleted staged muscle group '{}' ({} rows)", muscle_group, removed);
        Ok(removed)
    }

    pub fn delete_staged_overall(&self, workout_id: i64) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM current_workout_overall WHERE workout_id = ?1",
            params![workout_id],
        )?;
        debug!("Deleted staged overall record {} ({} rows)", workout_id, removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::seeded_db;
    use crate::schedule::Weekday;

    // 2024-01-01 was a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn staged_db() -> Database {
        let mut db = seeded_db();
        for (name, sets, reps) in [("Bench Press", "4", "8"), ("Pull Up", "3", "10")] {
            let id = db.find_exercise_by_name(name).unwrap().unwrap().id;
            db.add_exercise_to_schedule(id, Weekday::Monday, Some(sets), Some(reps)).unwrap();
        }
        db.ensure_staged(monday()).unwrap();
        db
    }

    #[test]
    fn test_update_exercise_touches_only_that_row() {
        let db = staged_db();
        let before = db.get_current_workout().unwrap();

        let changed = db
            .update_staged_exercise(&ExerciseUpdate {
                exercise_name: "Bench Press".to_string(),
                weight: Some(80.0),
                sets: Some(4),
                reps: Some(7),
                difficulty: Some(5),
                note: Some("last rep was a grind".to_string()),
            })
            .unwrap();
        assert_eq!(changed, 1);

        let after = db.get_current_workout().unwrap();
        let bench = &after.exercises[0];
        assert_eq!(bench.weight, Some(80.0));
        assert_eq!(bench.sets, Some(4));
        assert_eq!(bench.reps, Some(7));
        assert_eq!(bench.difficulty, Some(5));
        assert_eq!(bench.target_sets, Some(4));
        assert_eq!(after.exercises[1], before.exercises[1]);
        assert_eq!(after.muscle_groups, before.muscle_groups);
        assert_eq!(after.overall, before.overall);
    }

    #[test]
    fn test_invalid_update_leaves_row_alone() {
        let db = staged_db();
        let before = db.get_current_workout().unwrap();

        let err = db
            .update_staged_exercise(&ExerciseUpdate {
                exercise_name: "Bench Press".to_string(),
                difficulty: Some(8),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
        assert_eq!(db.get_current_workout().unwrap(), before);
    }

    #[test]
    fn test_update_unknown_name_is_noop() {
        let db = staged_db();
        let changed = db
            .update_staged_exercise(&ExerciseUpdate {
                exercise_name: "Deadlift".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn test_update_muscle_group_and_overall() {
        let db = staged_db();
        let overall_id = db.get_current_workout().unwrap().overall[0].workout_id;

        db.update_staged_muscle_group(&MuscleGroupUpdate {
            muscle_group: "Back".to_string(),
            pump: Some(5),
            soreness_before_workout: Some(2),
            recovery_before_workout: Some(4),
            note: Some("lats on fire".to_string()),
        })
        .unwrap();
        db.update_staged_overall(&OverallUpdate {
            workout_id: overall_id,
            duration_in_minutes: Some(65.0),
            workout_type: Some("Upper".to_string()),
            performance: Some(5),
            fatigue_induced: Some(2),
            note: None,
        })
        .unwrap();

        let workout = db.get_current_workout().unwrap();
        let back = workout.muscle_groups.iter().find(|g| g.muscle_group == "Back").unwrap();
        assert_eq!(back.pump, Some(5));
        assert_eq!(back.note.as_deref(), Some("lats on fire"));
        let chest = workout.muscle_groups.iter().find(|g| g.muscle_group == "Chest").unwrap();
        assert_eq!(chest.pump, Some(DEFAULT_PUMP));
        assert_eq!(workout.overall[0].duration_in_minutes, Some(65.0));
        assert_eq!(workout.overall[0].workout_type.as_deref(), Some("Upper"));
    }

    #[test]
    fn test_update_date() {
        let db = staged_db();
        let friday = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        db.update_current_workout_date(friday).unwrap();
        assert_eq!(db.get_current_workout().unwrap().date, Some(friday));
        assert_eq!(db.count_rows("current_workout_date").unwrap(), 1);
    }

    #[test]
    fn test_add_and_delete_rows() {
        let db = staged_db();
        let curl = db.find_exercise_by_name("Barbell Curl").unwrap().unwrap().id;

        db.add_exercise_to_log(curl, Some(30.0), Some(3), None).unwrap();
        db.add_muscle_group_to_log("Calves", None, Some(2), None).unwrap();
        let extra = db.add_staged_overall().unwrap();

        let workout = db.get_current_workout().unwrap();
        assert_eq!(workout.exercises.len(), 3);
        let added = workout.exercises.last().unwrap();
        assert_eq!(added.exercise_name, "Barbell Curl");
        assert_eq!(added.target_sets, None);
        let calves = workout.muscle_groups.iter().find(|g| g.muscle_group == "Calves").unwrap();
        assert_eq!(calves.pump, Some(DEFAULT_PUMP));
        assert_eq!(calves.soreness_before_workout, Some(2));
        assert_eq!(workout.overall.len(), 2);

        assert_eq!(db.delete_staged_exercise("Bench Press").unwrap(), 1);
        assert_eq!(db.delete_staged_muscle_group("Calves").unwrap(), 1);
        assert_eq!(db.delete_staged_overall(extra).unwrap(), 1);

        let workout = db.get_current_workout().unwrap();
        let names: Vec<_> = workout.exercises.iter().map(|e| e.exercise_name.as_str()).collect();
        assert_eq!(names, vec!["Pull Up", "Barbell Curl"]);
        assert_eq!(workout.overall.len(), 1);
        assert!(db.current_workout_exists().unwrap());
    }

    #[test]
    fn test_add_rejects_unknown_references() {
        let db = staged_db();
        assert!(db.add_exercise_to_log(4242, None, None, None).is_err());
        let err = db.add_muscle_group_to_log("Neck", None, None, None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::UnknownMuscleGroup("Neck".to_string()))
        );
    }
}
