//! Exercise library - reference data and the built-in baseline catalog

use serde::{Deserialize, Serialize};

/// Muscle group as stored in the `muscle_groups` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleGroup {
    pub id: i64,
    pub name: String,
}

/// Exercise joined with its primary and secondary muscle group names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub exercise_type: String,
    pub primary_muscle_group: String,
    pub secondary_muscle_groups: Vec<String>,
}

/// Catalog entry used when no CSV seed folder is available
#[derive(Debug, Clone, Copy)]
pub struct CatalogExercise {
    pub name: &'static str,
    pub exercise_type: &'static str,
    pub primary: &'static str,
    pub secondary: &'static [&'static str],
}

pub const MUSCLE_GROUPS: &[&str] = &[
    "Abs",
    "Back",
    "Biceps",
    "Calves",
    "Chest",
    "Forearms",
    "Glutes",
    "Hamstrings",
    "Quads",
    "Shoulders",
    "Traps",
    "Triceps",
];

pub const BASE_EXERCISES: &[CatalogExercise] = &[
    // Push
    CatalogExercise {
        name: "Bench Press",
        exercise_type: "Push",
        primary: "Chest",
        secondary: &["Triceps", "Shoulders"],
    },
    CatalogExercise {
        name: "Incline Dumbbell Press",
        exercise_type: "Push",
        primary: "Chest",
        secondary: &["Shoulders", "Triceps"],
    },
    CatalogExercise {
        name: "Overhead Press",
        exercise_type: "Push",
        primary: "Shoulders",
        secondary: &["Triceps"],
    },
    CatalogExercise {
        name: "Lateral Raise",
        exercise_type: "Push",
        primary: "Shoulders",
        secondary: &[],
    },
    CatalogExercise {
        name: "Tricep Pushdown",
        exercise_type: "Push",
        primary: "Triceps",
        secondary: &[],
    },
    // Pull
    CatalogExercise {
        name: "Pull Up",
        exercise_type: "Pull",
        primary: "Back",
        secondary: &["Biceps", "Forearms"],
    },
    CatalogExercise {
        name: "Barbell Row",
        exercise_type: "Pull",
        primary: "Back",
        secondary: &["Biceps", "Traps"],
    },
    CatalogExercise {
        name: "Barbell Curl",
        exercise_type: "Pull",
        primary: "Biceps",
        secondary: &["Forearms"],
    },
    CatalogExercise {
        name: "Shrug",
        exercise_type: "Pull",
        primary: "Traps",
        secondary: &["Forearms"],
    },
    // Legs
    CatalogExercise {
        name: "Back Squat",
        exercise_type: "Legs",
        primary: "Quads",
        secondary: &["Glutes", "Hamstrings"],
    },
    CatalogExercise {
        name: "Romanian Deadlift",
        exercise_type: "Legs",
        primary: "Hamstrings",
        secondary: &["Glutes", "Back"],
    },
    CatalogExercise {
        name: "Standing Calf Raise",
        exercise_type: "Legs",
        primary: "Calves",
        secondary: &[],
    },
    // Core
    CatalogExercise {
        name: "Plank",
        exercise_type: "Core",
        primary: "Abs",
        secondary: &["Shoulders"],
    },
    CatalogExercise {
        name: "Hanging Leg Raise",
        exercise_type: "Core",
        primary: "Abs",
        secondary: &["Forearms"],
    },
];
