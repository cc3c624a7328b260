//! Weekly schedule - which exercises to do on which day, with target sets and reps

use std::fmt;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rusqlite::{params, params_from_iter};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::Database;
use crate::error::ValidationError;

/// Day of week as stored in `weekly_schedule.weekday_int` (0 = Sunday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Storage order, Sunday first
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Order used on the schedule page, Monday first
    pub const DISPLAY_ORDER: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn index(self) -> i64 {
        self as i64
    }

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::ALL[date.weekday().num_days_from_sunday() as usize]
    }

    /// Accepts a day index ("1") or a day name ("monday")
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if let Ok(index) = raw.parse::<i64>() {
            return Self::from_index(index).ok_or(ValidationError::InvalidWeekday(index));
        }
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(raw))
            .ok_or(ValidationError::Missing("a valid day_of_week"))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the weekly template as shown on the schedule page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledExercise {
    pub id: i64,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub sets: i64,
    pub reps: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub weekday: Weekday,
    pub exercises: Vec<ScheduledExercise>,
}

/// Template entry used to stage a workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedExercise {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub target_sets: i64,
    pub target_reps: i64,
    pub primary_muscle_group: String,
}

/// Normalise a sets/reps form field: blank, garbage or negative all become 0
pub fn parse_target(raw: Option<&str>) -> i64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0)
        .max(0)
}

impl Database {
    /// Planned workouts for all seven days, Monday first
    pub fn get_planned_workouts(&self) -> Result<Vec<DaySchedule>> {
        let mut stmt = self.conn.prepare(
            "SELECT t1.id, t1.weekday_int, t1.exercise_id, t2.name,
                    t1.target_sets, t1.target_reps_or_duration
             FROM weekly_schedule t1
             INNER JOIN exercises t2 ON t1.exercise_id = t2.id
             ORDER BY t1.id",
        )?;

        let mut days: Vec<DaySchedule> = Weekday::DISPLAY_ORDER
            .into_iter()
            .map(|weekday| DaySchedule { weekday, exercises: Vec::new() })
            .collect();

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(1)?,
                ScheduledExercise {
                    id: row.get(0)?,
                    exercise_id: row.get(2)?,
                    exercise_name: row.get(3)?,
                    sets: row.get(4)?,
                    reps: row.get(5)?,
                },
            ))
        })?;

        for row in rows {
            let (weekday_int, entry) = row?;
            if let Some(day) = days.iter_mut().find(|d| d.weekday.index() == weekday_int) {
                day.exercises.push(entry);
            }
        }

        Ok(days)
    }

    /// Add an exercise from the library to a weekday. Duplicates are allowed.
    pub fn add_exercise_to_schedule(
        &self,
        exercise_id: i64,
        weekday: Weekday,
        sets: Option<&str>,
        reps: Option<&str>,
    ) -> Result<i64> {
        if self.find_exercise(exercise_id)?.is_none() {
            return Err(ValidationError::UnknownExercise(exercise_id).into());
        }

        let sets = parse_target(sets);
        let reps = parse_target(reps);
        self.conn.execute(
            "INSERT INTO weekly_schedule (weekday_int, exercise_id, target_sets, target_reps_or_duration)
             VALUES (?1, ?2, ?3, ?4)",
            params![weekday.index(), exercise_id, sets, reps],
        )?;

        info!("Scheduled exercise {} on {} ({}x{})", exercise_id, weekday, sets, reps);
        Ok(self.conn.last_insert_rowid())
    }

    /// Remove every row for the (weekday, exercise) pair
    pub fn delete_exercise_from_schedule(&self, exercise_id: i64, weekday: Weekday) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM weekly_schedule WHERE exercise_id = ?1 AND weekday_int = ?2",
            params![exercise_id, weekday.index()],
        )?;
        info!("Removed exercise {} from {} ({} rows)", exercise_id, weekday, removed);
        Ok(removed)
    }

    /// Template for one weekday in insertion order
    pub fn get_weekday_exercises(&self, weekday: Weekday) -> Result<Vec<PlannedExercise>> {
        let mut stmt = self.conn.prepare(
            "SELECT t1.exercise_id, t2.name, t1.target_sets,
                    t1.target_reps_or_duration, t3.muscle_group
             FROM weekly_schedule t1
             INNER JOIN exercises t2 ON t1.exercise_id = t2.id
             INNER JOIN muscle_groups t3 ON t2.primary_muscle_group_id = t3.id
             WHERE t1.weekday_int = ?1
             ORDER BY t1.id",
        )?;

        let exercises = stmt
            .query_map(params![weekday.index()], |row| {
                Ok(PlannedExercise {
                    exercise_id: row.get(0)?,
                    exercise_name: row.get(1)?,
                    target_sets: row.get(2)?,
                    target_reps: row.get(3)?,
                    primary_muscle_group: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(exercises)
    }

    /// Secondary muscle group names of the given exercises, possibly repeated
    pub fn get_secondary_muscle_groups(&self, exercise_ids: &[i64]) -> Result<Vec<String>> {
        if exercise_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; exercise_ids.len()].join(", ");
        let sql = format!(
            "SELECT t1.muscle_group
             FROM muscle_groups t1
             INNER JOIN exercise_secondary_muscle_groups t2
                 ON t1.id = t2.secondary_muscle_group_id
             WHERE t2.exercise_id IN ({placeholders})"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let groups = stmt
            .query_map(params_from_iter(exercise_ids.iter()), |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::seeded_db;

    fn exercise_id(db: &Database, name: &str) -> i64 {
        db.find_exercise_by_name(name).unwrap().unwrap().id
    }

    fn day<'a>(days: &'a [DaySchedule], weekday: Weekday) -> &'a DaySchedule {
        days.iter().find(|d| d.weekday == weekday).unwrap()
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target(Some("4")), 4);
        assert_eq!(parse_target(Some(" 12 ")), 12);
        assert_eq!(parse_target(Some("")), 0);
        assert_eq!(parse_target(Some("-3")), 0);
        assert_eq!(parse_target(Some("lots")), 0);
        assert_eq!(parse_target(None), 0);
    }

    #[test]
    fn test_weekday_numbering() {
        assert_eq!(Weekday::Sunday.index(), 0);
        assert_eq!(Weekday::Saturday.index(), 6);
        assert_eq!(Weekday::from_index(3), Some(Weekday::Wednesday));
        assert_eq!(Weekday::from_index(7), None);
        assert_eq!(Weekday::from_index(-1), None);
        // 2024-01-01 was a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(Weekday::of(monday), Weekday::Monday);
    }

    #[test]
    fn test_weekday_parse() {
        assert_eq!(Weekday::parse("1"), Ok(Weekday::Monday));
        assert_eq!(Weekday::parse("friday"), Ok(Weekday::Friday));
        assert_eq!(Weekday::parse("9"), Err(ValidationError::InvalidWeekday(9)));
        assert!(Weekday::parse("someday").is_err());
    }

    #[test]
    fn test_planned_workouts_has_every_day() {
        let db = seeded_db();
        let days = db.get_planned_workouts().unwrap();
        let names: Vec<_> = days.iter().map(|d| d.weekday.name()).collect();
        assert_eq!(
            names,
            ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
        );
        assert!(days.iter().all(|d| d.exercises.is_empty()));
    }

    #[test]
    fn test_add_then_list() {
        let db = seeded_db();
        let bench = exercise_id(&db, "Bench Press");

        db.add_exercise_to_schedule(bench, Weekday::Monday, Some("4"), Some("8")).unwrap();

        let days = db.get_planned_workouts().unwrap();
        let monday = day(&days, Weekday::Monday);
        assert_eq!(monday.exercises.len(), 1);
        assert_eq!(monday.exercises[0].exercise_name, "Bench Press");
        assert_eq!(monday.exercises[0].sets, 4);
        assert_eq!(monday.exercises[0].reps, 8);
        assert!(day(&days, Weekday::Tuesday).exercises.is_empty());
    }

    #[test]
    fn test_add_normalises_blank_and_negative() {
        let db = seeded_db();
        let squat = exercise_id(&db, "Back Squat");

        db.add_exercise_to_schedule(squat, Weekday::Friday, Some(""), Some("-5")).unwrap();

        let days = db.get_planned_workouts().unwrap();
        let entry = &day(&days, Weekday::Friday).exercises[0];
        assert_eq!((entry.sets, entry.reps), (0, 0));
    }

    #[test]
    fn test_duplicates_allowed() {
        let db = seeded_db();
        let curl = exercise_id(&db, "Barbell Curl");

        db.add_exercise_to_schedule(curl, Weekday::Tuesday, Some("3"), Some("10")).unwrap();
        db.add_exercise_to_schedule(curl, Weekday::Tuesday, Some("3"), Some("10")).unwrap();

        let days = db.get_planned_workouts().unwrap();
        assert_eq!(day(&days, Weekday::Tuesday).exercises.len(), 2);
    }

    #[test]
    fn test_unknown_exercise_rejected() {
        let db = seeded_db();
        let err = db
            .add_exercise_to_schedule(9999, Weekday::Monday, Some("3"), Some("10"))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::UnknownExercise(9999))
        );
    }

    #[test]
    fn test_delete_removes_only_the_pair() {
        let db = seeded_db();
        let bench = exercise_id(&db, "Bench Press");
        let row = exercise_id(&db, "Barbell Row");

        db.add_exercise_to_schedule(bench, Weekday::Monday, Some("4"), Some("8")).unwrap();
        db.add_exercise_to_schedule(row, Weekday::Monday, Some("4"), Some("8")).unwrap();
        db.add_exercise_to_schedule(bench, Weekday::Thursday, Some("3"), Some("5")).unwrap();

        assert_eq!(db.delete_exercise_from_schedule(bench, Weekday::Monday).unwrap(), 1);

        let days = db.get_planned_workouts().unwrap();
        let monday: Vec<_> = day(&days, Weekday::Monday)
            .exercises
            .iter()
            .map(|e| e.exercise_name.as_str())
            .collect();
        assert_eq!(monday, vec!["Barbell Row"]);
        assert_eq!(day(&days, Weekday::Thursday).exercises.len(), 1);
    }

    #[test]
    fn test_weekday_exercises_and_secondary_groups() {
        let db = seeded_db();
        let bench = exercise_id(&db, "Bench Press");
        let press = exercise_id(&db, "Overhead Press");

        db.add_exercise_to_schedule(bench, Weekday::Wednesday, Some("5"), Some("5")).unwrap();
        db.add_exercise_to_schedule(press, Weekday::Wednesday, Some("3"), Some("8")).unwrap();

        let planned = db.get_weekday_exercises(Weekday::Wednesday).unwrap();
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].primary_muscle_group, "Chest");
        assert_eq!(planned[1].target_reps, 8);

        let mut secondary = db.get_secondary_muscle_groups(&[bench, press]).unwrap();
        secondary.sort();
        assert_eq!(secondary, vec!["Shoulders", "Triceps", "Triceps"]);
        assert!(db.get_secondary_muscle_groups(&[]).unwrap().is_empty());
    }
}
