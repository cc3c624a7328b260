//! Database module - SQLite storage for the schedule, the staged workout and history

pub mod seed;

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::exercises::{Exercise, MuscleGroup};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS muscle_groups (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        muscle_group TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS exercises (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        exercise_type TEXT NOT NULL,
        primary_muscle_group_id INTEGER NOT NULL,
        FOREIGN KEY (primary_muscle_group_id) REFERENCES muscle_groups(id)
    );

    CREATE TABLE IF NOT EXISTS exercise_secondary_muscle_groups (
        exercise_id INTEGER NOT NULL,
        secondary_muscle_group_id INTEGER NOT NULL,
        FOREIGN KEY (exercise_id) REFERENCES exercises(id),
        FOREIGN KEY (secondary_muscle_group_id) REFERENCES muscle_groups(id)
    );

    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        note TEXT NOT NULL,
        note_type TEXT NOT NULL CHECK(note_type IN ('workout', 'workout exercises', 'muscle groups'))
    );

    CREATE TABLE IF NOT EXISTS workout (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        duration_in_minutes REAL NOT NULL,
        workout_type TEXT NOT NULL,
        performance INTEGER NOT NULL CHECK(performance BETWEEN 1 AND 5),
        fatigue_induced INTEGER NOT NULL CHECK(fatigue_induced BETWEEN 1 AND 5),
        note_id INTEGER,
        FOREIGN KEY (note_id) REFERENCES notes(id)
    );

    CREATE TABLE IF NOT EXISTS workout_exercises (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        workout_id INTEGER NOT NULL,
        exercise_id INTEGER NOT NULL,
        weight REAL NOT NULL,
        sets INTEGER NOT NULL,
        reps INTEGER NOT NULL,
        difficulty INTEGER NOT NULL CHECK(difficulty BETWEEN 1 AND 5),
        note_id INTEGER,
        FOREIGN KEY (workout_id) REFERENCES workout(id),
        FOREIGN KEY (exercise_id) REFERENCES exercises(id),
        FOREIGN KEY (note_id) REFERENCES notes(id)
    );

    CREATE TABLE IF NOT EXISTS muscle_groups_worked (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        pump INTEGER CHECK(pump BETWEEN 1 AND 5),
        soreness_before_workout INTEGER CHECK(soreness_before_workout BETWEEN 1 AND 5),
        recovery_before_workout INTEGER CHECK(recovery_before_workout BETWEEN 1 AND 5),
        muscle_group_id INTEGER NOT NULL,
        workout_id INTEGER NOT NULL,
        note_id INTEGER,
        FOREIGN KEY (muscle_group_id) REFERENCES muscle_groups(id),
        FOREIGN KEY (workout_id) REFERENCES workout(id),
        FOREIGN KEY (note_id) REFERENCES notes(id)
    );

    CREATE TABLE IF NOT EXISTS weekly_schedule (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        weekday_int INTEGER NOT NULL CHECK(weekday_int BETWEEN 0 AND 6),
        exercise_id INTEGER NOT NULL,
        target_sets INTEGER NOT NULL DEFAULT 0,
        target_reps_or_duration INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY (exercise_id) REFERENCES exercises(id)
    );

    CREATE TABLE IF NOT EXISTS current_workout_date (
        date TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS current_workout_exercises (
        exercise_name TEXT NOT NULL,
        weight REAL,
        sets INTEGER,
        target_sets INTEGER,
        reps INTEGER,
        target_reps INTEGER,
        difficulty INTEGER,
        note TEXT
    );

    CREATE TABLE IF NOT EXISTS current_workout_muscle_groups (
        muscle_group TEXT NOT NULL,
        pump INTEGER,
        soreness_before_workout INTEGER,
        recovery_before_workout INTEGER,
        note TEXT
    );

    CREATE TABLE IF NOT EXISTS current_workout_overall (
        workout_id INTEGER PRIMARY KEY,
        duration_in_minutes REAL,
        workout_type TEXT,
        performance INTEGER,
        fatigue_induced INTEGER,
        note TEXT
    );
";

/// Database wrapper
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("opening database {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// Fresh database living only in memory
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        debug!("Schema ready");
        Ok(())
    }

    /// True while every seedable table is still empty
    pub fn needs_seed(&self) -> Result<bool> {
        for table in seed::SEED_TABLES {
            if self.count_rows(table)? > 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// All muscle groups ordered by name
    pub fn get_muscle_groups(&self) -> Result<Vec<MuscleGroup>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, muscle_group FROM muscle_groups ORDER BY muscle_group")?;

        let groups = stmt
            .query_map([], |row| {
                Ok(MuscleGroup {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(groups)
    }

    pub fn find_muscle_group(&self, name: &str) -> Result<Option<MuscleGroup>> {
        let group = self
            .conn
            .query_row(
                "SELECT id, muscle_group FROM muscle_groups WHERE muscle_group = ?1",
                params![name],
                |row| {
                    Ok(MuscleGroup {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(group)
    }

    /// Exercise library with primary and secondary muscle groups, ordered by name
    pub fn get_exercises(&self) -> Result<Vec<Exercise>> {
        let secondary = self.secondary_muscle_group_map()?;

        let mut stmt = self.conn.prepare(
            "SELECT t1.id, t1.name, t1.exercise_type, t2.muscle_group
             FROM exercises t1
             INNER JOIN muscle_groups t2 ON t1.primary_muscle_group_id = t2.id
             ORDER BY t1.name",
        )?;

        let exercises = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                Ok(Exercise {
                    id,
                    name: row.get(1)?,
                    exercise_type: row.get(2)?,
                    primary_muscle_group: row.get(3)?,
                    secondary_muscle_groups: secondary.get(&id).cloned().unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(exercises)
    }

    pub fn find_exercise(&self, id: i64) -> Result<Option<Exercise>> {
        Ok(self.get_exercises()?.into_iter().find(|e| e.id == id))
    }

    pub fn find_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>> {
        Ok(self.get_exercises()?.into_iter().find(|e| e.name == name))
    }

    fn secondary_muscle_group_map(&self) -> Result<HashMap<i64, Vec<String>>> {
        let mut stmt = self.conn.prepare(
            "SELECT t2.exercise_id, t1.muscle_group
             FROM muscle_groups t1
             INNER JOIN exercise_secondary_muscle_groups t2
                 ON t1.id = t2.secondary_muscle_group_id
             ORDER BY t1.muscle_group",
        )?;

        let mut map: HashMap<i64, Vec<String>> = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (exercise_id, group) = row?;
            map.entry(exercise_id).or_default().push(group);
        }
        Ok(map)
    }

    /// Number of rows in a table, for checks and tests
    pub(crate) fn count_rows(&self, table: &str) -> Result<i64> {
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory database with the built-in catalog loaded
    pub(crate) fn seeded_db() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.seed_catalog().unwrap();
        db
    }

    #[test]
    fn test_schema_creation_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tracker.db");

        let db = Database::open(&path).unwrap();
        drop(db);
        let db = Database::open(&path).unwrap();

        assert!(db.needs_seed().unwrap());
        assert_eq!(db.count_rows("current_workout_date").unwrap(), 0);
    }

    #[test]
    fn test_exercises_carry_muscle_groups() {
        let db = seeded_db();
        let exercises = db.get_exercises().unwrap();
        assert!(!exercises.is_empty());

        let bench = exercises.iter().find(|e| e.name == "Bench Press").unwrap();
        assert_eq!(bench.primary_muscle_group, "Chest");
        assert_eq!(bench.secondary_muscle_groups, vec!["Shoulders", "Triceps"]);

        let names: Vec<_> = exercises.iter().map(|e| e.name.clone()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_missing_lookups_are_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_exercises().unwrap().is_empty());
        assert!(db.get_muscle_groups().unwrap().is_empty());
        assert!(db.find_exercise(42).unwrap().is_none());
        assert!(db.find_muscle_group("Chest").unwrap().is_none());
    }

    #[test]
    fn test_history_checks_reject_bad_ratings() {
        let db = Database::open_in_memory().unwrap();
        let result = db.conn.execute(
            "INSERT INTO workout (date, duration_in_minutes, workout_type, performance, fatigue_induced)
             VALUES ('2024-01-01', 60, 'Push', 7, 3)",
            [],
        );
        assert!(result.is_err());
    }
}
