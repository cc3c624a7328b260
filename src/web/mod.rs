//! Web module - axum routes over the schedule, current workout and history

mod forms;
mod handlers;
mod views;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum_extra::extract::FormRejection;
use chrono::{Local, NaiveDate};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::db::Database;
use crate::error::ValidationError;

/// Shared state: one connection behind a lock, so only one request touches
/// the staged workout at a time
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
    fixed_date: Option<NaiveDate>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            fixed_date: None,
        }
    }

    /// Pin "today" instead of reading the local clock
    pub fn with_fixed_date(mut self, date: NaiveDate) -> Self {
        self.fixed_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.fixed_date.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Handler error: validation problems and unreadable bodies become 400,
/// everything else 500
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn bad_request(message: String) -> Response {
    warn!("Rejected request: {}", message);
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(invalid) = self.0.downcast_ref::<ValidationError>() {
            return bad_request(invalid.to_string());
        }
        if let Some(rejection) = self.0.downcast_ref::<JsonRejection>() {
            return bad_request(rejection.body_text());
        }
        if let Some(rejection) = self.0.downcast_ref::<FormRejection>() {
            return bad_request(rejection.to_string());
        }
        error!("Request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "internal server error" })),
        )
            .into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/schedule", get(handlers::schedule))
        .route("/add_exercises_to_schedule", post(handlers::add_exercises_to_schedule))
        .route("/delete_scheduled_exercise", post(handlers::delete_scheduled_exercise))
        .route("/log-workout", get(handlers::log_workout))
        .route("/add_exercises_to_log", post(handlers::add_exercises_to_log))
        .route("/add_muscle_group_to_log", post(handlers::add_muscle_groups_to_log))
        .route("/add_overall_to_log", post(handlers::add_overall_to_log))
        .route("/update_curr_workout_date", post(handlers::update_date))
        .route("/update_curr_workout_exercise", post(handlers::update_exercise))
        .route("/update_curr_workout_muscle_group", post(handlers::update_muscle_group))
        .route("/update_curr_workout_overall", post(handlers::update_overall))
        .route("/delete_log_exercise", post(handlers::delete_log_exercise))
        .route("/delete_log_muscle_group", post(handlers::delete_log_muscle_group))
        .route("/delete_log_overall_workout", post(handlers::delete_log_overall))
        .route("/clear_current_workout", post(handlers::clear_current_workout))
        .route("/use_scheduled_workout", post(handlers::use_scheduled_workout))
        .route("/finish_workout", post(handlers::finish_workout))
        .route("/exercise-library", get(handlers::exercise_library))
        .route("/logs", get(handlers::logs))
        .route("/progress", get(handlers::progress))
        .route("/static/log_workout.js", get(handlers::log_workout_script))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
    }
    info!("Shutting down");
}

/// Serve until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
