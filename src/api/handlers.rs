//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    error::CountdownError,
    state::{AppState, TimerSnapshot},
};
use super::responses::{CommandResponse, HealthResponse, StatusResponse};

fn command_result(
    command: &str,
    result: Result<TimerSnapshot, CountdownError>,
) -> Result<Json<CommandResponse>, StatusCode> {
    match result {
        Ok(snapshot) => {
            info!("{} command handled - {} ({:?})", command, snapshot.display, snapshot.run_state);
            Ok(Json(CommandResponse::new(command, snapshot)))
        }
        Err(e) => {
            error!("Failed to handle {} command: {}", command, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<CommandResponse>, StatusCode> {
    command_result("start", state.start())
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<CommandResponse>, StatusCode> {
    command_result("pause", state.pause())
}

/// Handle POST /toggle - Pause when running, start otherwise
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<CommandResponse>, StatusCode> {
    command_result("toggle", state.toggle())
}

/// Handle POST /reset - Restore the full duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<CommandResponse>, StatusCode> {
    command_result("reset", state.reset())
}

/// Handle GET /status - Return current countdown status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_command, last_command_time) = state.get_last_command();
    let config = state.config();

    Ok(Json(StatusResponse {
        timer,
        total_duration_seconds: config.total_duration_seconds(),
        warning_threshold_seconds: config.warning_threshold_seconds(),
        uptime: state.get_uptime(),
        last_command,
        last_command_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
