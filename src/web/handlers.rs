use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect};
use serde_json::{Value, json};
use tracing::info;

use super::forms::{
    AddMuscleGroupsForm, AddToLogForm, AddToScheduleForm, DatePayload, DeleteLogExerciseForm,
    DeleteLogMuscleGroupForm, DeleteLogOverallForm, DeleteScheduledForm, ExercisePayload, FormBody, JsonBody,
    MuscleGroupPayload, OverallPayload, parse_i64, parse_opt_f64, parse_opt_i64,
};
use super::{AppError, AppState, views};
use crate::error::ValidationError;
use crate::schedule::Weekday;
use crate::workout::{ExerciseUpdate, MuscleGroupUpdate, OverallUpdate, parse_date};

type HtmlResult = Result<Html<String>, AppError>;
type RedirectResult = Result<Redirect, AppError>;
type JsonResult = Result<Json<Value>, AppError>;

const LOG_WORKOUT_JS: &str = include_str!("../../static/log_workout.js");

fn ack(message: &str) -> Json<Value> {
    Json(json!({ "message": message }))
}

pub async fn home() -> Redirect {
    Redirect::to("/schedule")
}

pub async fn schedule(State(state): State<AppState>) -> HtmlResult {
    let db = state.db.lock().await;
    let days = db.get_planned_workouts()?;
    let library = db.get_exercises()?;
    Ok(Html(views::schedule_page(&days, &library)))
}

pub async fn add_exercises_to_schedule(
    State(state): State<AppState>,
    FormBody(form): FormBody<AddToScheduleForm>,
) -> RedirectResult {
    if !form.selected_exercises.is_empty() {
        let weekday = Weekday::parse(form.day_of_week.as_deref().unwrap_or_default())?;
        let ids = form
            .selected_exercises
            .iter()
            .map(|raw| parse_i64("selected_exercises", raw))
            .collect::<Result<Vec<_>, _>>()?;

        let db = state.db.lock().await;
        for id in ids {
            db.add_exercise_to_schedule(id, weekday, form.sets.as_deref(), form.reps.as_deref())?;
        }
    }
    Ok(Redirect::to("/schedule"))
}

pub async fn delete_scheduled_exercise(
    State(state): State<AppState>,
    FormBody(form): FormBody<DeleteScheduledForm>,
) -> RedirectResult {
    let exercise_id = parse_i64("exercise_id", &form.exercise_id)?;
    let weekday = Weekday::parse(&form.day_of_week)?;
    state.db.lock().await.delete_exercise_from_schedule(exercise_id, weekday)?;
    Ok(Redirect::to("/schedule"))
}

pub async fn log_workout(State(state): State<AppState>) -> HtmlResult {
    let today = state.today();
    let mut db = state.db.lock().await;
    let workout = db.view_current_workout(today)?;

    let library: Vec<_> = db
        .get_exercises()?
        .into_iter()
        .filter(|e| !workout.exercises.iter().any(|s| s.exercise_name == e.name))
        .collect();
    let groups: Vec<_> = db
        .get_muscle_groups()?
        .into_iter()
        .filter(|g| !workout.muscle_groups.iter().any(|s| s.muscle_group == g.name))
        .collect();

    let date = workout.date.unwrap_or(today);
    Ok(Html(views::log_workout_page(&workout, date, &library, &groups)))
}

/// Rows are added when ticked or when any of weight, sets or reps was filled in
pub async fn add_exercises_to_log(
    State(state): State<AppState>,
    FormBody(form): FormBody<AddToLogForm>,
) -> RedirectResult {
    let cell = |list: &[String], i: usize| list.get(i).map(|s| s.trim().to_string()).unwrap_or_default();

    let mut rows = Vec::new();
    for (i, raw_id) in form.exercise_id.iter().enumerate() {
        let (weight, sets, reps) = (cell(&form.weight, i), cell(&form.sets, i), cell(&form.reps, i));
        let selected = form.selected_exercises.iter().any(|s| s == raw_id);
        if !selected && weight.is_empty() && sets.is_empty() && reps.is_empty() {
            continue;
        }
        rows.push((
            parse_i64("exercise_id", raw_id)?,
            parse_opt_f64("weight", Some(&weight))?,
            parse_opt_i64("sets", Some(&sets))?,
            parse_opt_i64("reps", Some(&reps))?,
        ));
    }

    let db = state.db.lock().await;
    for (exercise_id, weight, sets, reps) in rows {
        db.add_exercise_to_log(exercise_id, weight, sets, reps)?;
    }
    Ok(Redirect::to("/log-workout"))
}

pub async fn add_muscle_groups_to_log(
    State(state): State<AppState>,
    FormBody(form): FormBody<AddMuscleGroupsForm>,
) -> RedirectResult {
    let pump = parse_opt_i64("pump_level_add", form.pump_level_add.as_deref())?;
    let soreness = parse_opt_i64("pre_workout_soreness_add", form.pre_workout_soreness_add.as_deref())?;
    let recovery = parse_opt_i64("pre_workout_recovery_add", form.pre_workout_recovery_add.as_deref())?;

    let db = state.db.lock().await;
    for group in &form.selected_muscle_groups {
        db.add_muscle_group_to_log(group, pump, soreness, recovery)?;
    }
    Ok(Redirect::to("/log-workout"))
}

pub async fn update_date(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<DatePayload>,
) -> JsonResult {
    let date = parse_date(&payload.workout_date)?;
    state.db.lock().await.update_current_workout_date(date)?;
    Ok(ack("Workout date updated successfully"))
}

pub async fn update_exercise(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ExercisePayload>,
) -> JsonResult {
    let update = ExerciseUpdate {
        exercise_name: payload.exercise_name,
        weight: payload.weight_used,
        sets: payload.sets_completed,
        reps: payload.reps_completed,
        difficulty: payload.difficulty,
        note: payload.exercise_notes,
    };
    state.db.lock().await.update_staged_exercise(&update)?;
    Ok(ack("Exercise updated successfully"))
}

pub async fn update_muscle_group(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<MuscleGroupPayload>,
) -> JsonResult {
    let update = MuscleGroupUpdate {
        muscle_group: payload.muscle_group_name,
        pump: payload.pump_level,
        soreness_before_workout: payload.pre_workout_soreness,
        recovery_before_workout: payload.pre_workout_recovery,
        note: payload.muscle_group_notes,
    };
    state.db.lock().await.update_staged_muscle_group(&update)?;
    Ok(ack("Muscle group updated successfully"))
}

pub async fn update_overall(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<OverallPayload>,
) -> JsonResult {
    let update = OverallUpdate {
        workout_id: payload.workout_id.ok_or(ValidationError::Missing("workout_id"))?,
        duration_in_minutes: payload.workout_duration,
        workout_type: payload.workout_type,
        performance: payload.performance_rating,
        fatigue_induced: payload.fatigue_induced,
        note: payload.workout_notes,
    };
    state.db.lock().await.update_staged_overall(&update)?;
    Ok(ack("Overall workout updated successfully"))
}

pub async fn add_overall_to_log(State(state): State<AppState>) -> RedirectResult {
    state.db.lock().await.add_staged_overall()?;
    Ok(Redirect::to("/log-workout"))
}

pub async fn delete_log_exercise(
    State(state): State<AppState>,
    FormBody(form): FormBody<DeleteLogExerciseForm>,
) -> RedirectResult {
    state.db.lock().await.delete_staged_exercise(&form.exercise_name)?;
    Ok(Redirect::to("/log-workout"))
}

pub async fn delete_log_muscle_group(
    State(state): State<AppState>,
    FormBody(form): FormBody<DeleteLogMuscleGroupForm>,
) -> RedirectResult {
    state.db.lock().await.delete_staged_muscle_group(&form.muscle_group)?;
    Ok(Redirect::to("/log-workout"))
}

pub async fn delete_log_overall(
    State(state): State<AppState>,
    FormBody(form): FormBody<DeleteLogOverallForm>,
) -> RedirectResult {
    let workout_id = parse_i64("workout_id", &form.workout_id)?;
    state.db.lock().await.delete_staged_overall(workout_id)?;
    Ok(Redirect::to("/log-workout"))
}

pub async fn clear_current_workout(State(state): State<AppState>) -> RedirectResult {
    let today = state.today();
    state.db.lock().await.start_blank_workout(today)?;
    Ok(Redirect::to("/log-workout"))
}

pub async fn use_scheduled_workout(State(state): State<AppState>) -> RedirectResult {
    let today = state.today();
    state.db.lock().await.reset_to_schedule(today)?;
    Ok(Redirect::to("/log-workout"))
}

pub async fn finish_workout(State(state): State<AppState>) -> RedirectResult {
    let workout_id = state.db.lock().await.finish_current_workout()?;
    info!("Workout {} saved to history", workout_id);
    Ok(Redirect::to("/logs"))
}

pub async fn exercise_library(State(state): State<AppState>) -> HtmlResult {
    let library = state.db.lock().await.get_exercises()?;
    Ok(Html(views::library_page(&library)))
}

pub async fn logs(State(state): State<AppState>) -> HtmlResult {
    let db = state.db.lock().await;
    let mut workouts = Vec::new();
    for summary in db.list_workouts()? {
        if let Some(detail) = db.workout_detail(summary.id)? {
            workouts.push(detail);
        }
    }
    Ok(Html(views::logs_page(&workouts)))
}

pub async fn progress(State(state): State<AppState>) -> HtmlResult {
    let progress = state.db.lock().await.exercise_progress()?;
    Ok(Html(views::progress_page(&progress)))
}

pub async fn log_workout_script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript; charset=utf-8")], LOG_WORKOUT_JS)
}
