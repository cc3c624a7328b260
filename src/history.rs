//! Workout history - archived sessions and per-exercise progress

use anyhow::Result;
use rusqlite::{OptionalExtension, Row, params};
use serde::Serialize;

use crate::db::Database;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSummary {
    pub id: i64,
    pub date: String,
    pub duration_in_minutes: f64,
    pub workout_type: String,
    pub performance: i64,
    pub fatigue_induced: i64,
    pub note: Option<String>,
    pub exercise_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedExercise {
    pub exercise_name: String,
    pub weight: f64,
    pub sets: i64,
    pub reps: i64,
    pub difficulty: i64,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedMuscleGroup {
    pub muscle_group: String,
    pub pump: Option<i64>,
    pub soreness_before_workout: Option<i64>,
    pub recovery_before_workout: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutDetail {
    pub summary: WorkoutSummary,
    pub exercises: Vec<LoggedExercise>,
    pub muscle_groups: Vec<LoggedMuscleGroup>,
}

/// Lifetime numbers for one exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseProgress {
    pub exercise_name: String,
    pub sessions: i64,
    pub best_weight: f64,
    pub total_volume: f64,
    pub last_date: String,
}

const SUMMARY_SELECT: &str = "
    SELECT w.id, w.date, w.duration_in_minutes, w.workout_type, w.performance,
           w.fatigue_induced, n.note,
           (SELECT COUNT(*) FROM workout_exercises we WHERE we.workout_id = w.id)
    FROM workout w
    LEFT JOIN notes n ON w.note_id = n.id";

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<WorkoutSummary> {
    Ok(WorkoutSummary {
        id: row.get(0)?,
        date: row.get(1)?,
        duration_in_minutes: row.get(2)?,
        workout_type: row.get(3)?,
        performance: row.get(4)?,
        fatigue_induced: row.get(5)?,
        note: row.get(6)?,
        exercise_count: row.get(7)?,
    })
}

impl Database {
    /// Archived workouts, newest first
    pub fn list_workouts(&self) -> Result<Vec<WorkoutSummary>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUMMARY_SELECT} ORDER BY w.date DESC, w.id DESC"))?;
        let workouts = stmt
            .query_map([], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(workouts)
    }

    pub fn workout_detail(&self, workout_id: i64) -> Result<Option<WorkoutDetail>> {
        let summary = self
            .conn
            .query_row(
                &format!("{SUMMARY_SELECT} WHERE w.id = ?1"),
                params![workout_id],
                summary_from_row,
            )
            .optional()?;

        let Some(summary) = summary else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT e.name, we.weight, we.sets, we.reps, we.difficulty, n.note
             FROM workout_exercises we
             INNER JOIN exercises e ON we.exercise_id = e.id
             LEFT JOIN notes n ON we.note_id = n.id
             WHERE we.workout_id = ?1
             ORDER BY we.id",
        )?;
        let exercises = stmt
            .query_map(params![workout_id], |row| {
                Ok(LoggedExercise {
                    exercise_name: row.get(0)?,
                    weight: row.get(1)?,
                    sets: row.get(2)?,
                    reps: row.get(3)?,
                    difficulty: row.get(4)?,
                    note: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT mg.muscle_group, w.pump, w.soreness_before_workout, w.recovery_before_workout, n.note
             FROM muscle_groups_worked w
             INNER JOIN muscle_groups mg ON w.muscle_group_id = mg.id
             LEFT JOIN notes n ON w.note_id = n.id
             WHERE w.workout_id = ?1
             ORDER BY w.id",
        )?;
        let muscle_groups = stmt
            .query_map(params![workout_id], |row| {
                Ok(LoggedMuscleGroup {
                    muscle_group: row.get(0)?,
                    pump: row.get(1)?,
                    soreness_before_workout: row.get(2)?,
                    recovery_before_workout: row.get(3)?,
                    note: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(WorkoutDetail {
            summary,
            exercises,
            muscle_groups,
        }))
    }

    /// Per-exercise totals across all archived workouts, by name
    pub fn exercise_progress(&self) -> Result<Vec<ExerciseProgress>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.name,
                    COUNT(DISTINCT we.workout_id),
                    MAX(we.weight),
                    SUM(we.weight * we.sets * we.reps),
                    MAX(w.date)
             FROM workout_exercises we
             INNER JOIN exercises e ON we.exercise_id = e.id
             INNER JOIN workout w ON we.workout_id = w.id
             GROUP BY e.id
             ORDER BY e.name",
        )?;

        let progress = stmt
            .query_map([], |row| {
                Ok(ExerciseProgress {
                    exercise_name: row.get(0)?,
                    sessions: row.get(1)?,
                    best_weight: row.get(2)?,
                    total_volume: row.get(3)?,
                    last_date: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::seeded_db;
    use crate::workout::{ExerciseUpdate, OverallUpdate};
    use chrono::NaiveDate;

    /// Stage a blank session on `date` with one exercise and archive it
    fn log_workout(db: &mut Database, date: NaiveDate, exercise: &str, weight: f64, sets: i64, reps: i64) -> i64 {
        db.start_blank_workout(date).unwrap();
        let id = db.find_exercise_by_name(exercise).unwrap().unwrap().id;
        db.add_exercise_to_log(id, None, None, None).unwrap();
        db.update_staged_exercise(&ExerciseUpdate {
            exercise_name: exercise.to_string(),
            weight: Some(weight),
            sets: Some(sets),
            reps: Some(reps),
            difficulty: Some(3),
            note: None,
        })
        .unwrap();
        let overall_id = db.get_current_workout().unwrap().overall[0].workout_id;
        db.update_staged_overall(&OverallUpdate {
            workout_id: overall_id,
            duration_in_minutes: Some(45.0),
            workout_type: Some("Pull".to_string()),
            performance: Some(3),
            fatigue_induced: Some(2),
            note: Some("solid".to_string()),
        })
        .unwrap();
        db.finish_current_workout().unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    #[test]
    fn test_empty_history() {
        let db = seeded_db();
        assert!(db.list_workouts().unwrap().is_empty());
        assert!(db.exercise_progress().unwrap().is_empty());
        assert!(db.workout_detail(1).unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let mut db = seeded_db();
        let first = log_workout(&mut db, date(1), "Pull Up", 0.0, 3, 8);
        let second = log_workout(&mut db, date(8), "Pull Up", 10.0, 3, 6);

        let workouts = db.list_workouts().unwrap();
        let ids: Vec<_> = workouts.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![second, first]);
        assert_eq!(workouts[0].date, "2024-02-08");
        assert_eq!(workouts[0].note.as_deref(), Some("solid"));
        assert_eq!(workouts[0].exercise_count, 1);
    }

    #[test]
    fn test_exercise_progress() {
        let mut db = seeded_db();
        log_workout(&mut db, date(1), "Barbell Row", 60.0, 3, 10);
        log_workout(&mut db, date(4), "Barbell Row", 65.0, 3, 8);
        log_workout(&mut db, date(6), "Shrug", 100.0, 2, 12);

        let progress = db.exercise_progress().unwrap();
        assert_eq!(progress.len(), 2);

        let row = &progress[0];
        assert_eq!(row.exercise_name, "Barbell Row");
        assert_eq!(row.sessions, 2);
        assert_eq!(row.best_weight, 65.0);
        assert_eq!(row.total_volume, 60.0 * 30.0 + 65.0 * 24.0);
        assert_eq!(row.last_date, "2024-02-04");
    }
}
