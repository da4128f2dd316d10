//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::warn;

use crate::state::{AppState, CommandOutcome, Outcome, TimerController, TimerId};
use super::responses::{
    CommandResponse, CreateTimerRequest, ErrorResponse, GroupedResponse, HealthResponse,
    StatusCounts, StatusResponse, TimerView, TimersResponse,
};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Reject commands until the stored collection has been loaded
fn ensure_ready(state: &AppState) -> Result<(), ApiError> {
    if state.timers.is_ready() {
        Ok(())
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Timers are still loading".to_string())),
        ))
    }
}

/// Handle GET /timers - Return the full collection
pub async fn list_timers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimersResponse>, ApiError> {
    ensure_ready(&state)?;
    Ok(Json(TimersResponse {
        timers: super::responses::views(state.timers.snapshot()),
    }))
}

/// Handle GET /timers/grouped - Return timers grouped by category
pub async fn grouped_timers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GroupedResponse>, ApiError> {
    ensure_ready(&state)?;
    Ok(Json(GroupedResponse::from(state.timers.grouped())))
}

/// Handle POST /timers - Add a new Pending timer
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateTimerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TimerView>), ApiError> {
    ensure_ready(&state)?;

    let Json(request) = body.map_err(|rejection| {
        warn!("Malformed timer request: {}", rejection.body_text());
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new(rejection.body_text())),
        )
    })?;

    match state
        .timers
        .create(&request.name, &request.duration_input(), &request.category)
    {
        Ok(timer) => {
            state.record_action("create");
            Ok((StatusCode::CREATED, Json(TimerView::from(timer))))
        }
        Err(e) => {
            warn!("Invalid timer input: {}", e);
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(e.to_string())),
            ))
        }
    }
}

/// Shared body of the transition endpoints
fn run_command(
    state: &AppState,
    action: &str,
    id: String,
    command: impl FnOnce(&TimerController, &TimerId) -> CommandOutcome,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    ensure_ready(state)?;

    let id = TimerId::from(id);
    let result = command(state.timers.as_ref(), &id);
    let status = match result.outcome {
        Outcome::NotFound => StatusCode::NOT_FOUND,
        Outcome::Applied | Outcome::Ignored => StatusCode::OK,
    };
    if result.outcome == Outcome::Applied {
        state.record_action(action);
    }

    Ok((status, Json(CommandResponse::new(result))))
}

/// Handle POST /timers/:id/start
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    run_command(&state, "start", id, TimerController::start)
}

/// Handle POST /timers/:id/pause
pub async fn pause_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    run_command(&state, "pause", id, TimerController::pause)
}

/// Handle POST /timers/:id/reset
pub async fn reset_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    run_command(&state, "reset", id, TimerController::reset)
}

/// Handle POST /timers/:id/complete
pub async fn complete_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    let (status, Json(response)) =
        run_command(&state, "complete", id, TimerController::complete)?;

    let completed = match (response.outcome, &response.timer) {
        (Outcome::Applied, Some(view)) => Some(view.timer.name.clone()),
        _ => None,
    };
    let response = match completed {
        Some(name) => response.with_completed(name),
        None => response,
    };

    Ok((status, Json(response)))
}

/// Handle GET /status - Return readiness and collection summary
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timers = state.timers.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        ready: state.timers.is_ready(),
        timer_count: timers.len(),
        counts: StatusCounts::tally(&timers),
        persist_on_tick: state.timers.persist_on_tick(),
        store: state.timers.gateway().describe(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
