//! Control Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use ::control::{Command, CommandOutcome, ControlAction, ControlRequest};

use super::{execute, outcome_response};
use crate::{ApiResult, SharedState};

/// Execute a control command
pub async fn execute_control(
    State(state): State<SharedState>,
    request: Result<Json<ControlRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = request?;
    let command = Command::try_from(request)?;
    let state = state.read().await;
    let outcome = execute(&state, command)?;
    Ok(outcome_response(outcome))
}

/// Recent control actions, newest first
pub async fn control_history(State(state): State<SharedState>) -> Json<Vec<ControlAction>> {
    let state = state.read().await;
    Json(state.interpreter.history())
}

/// Download the current rules as `aml-rules-<date>.json`
pub async fn export_rules(State(state): State<SharedState>) -> ApiResult<Response> {
    let state = state.read().await;
    match execute(&state, Command::ExportAll)? {
        CommandOutcome::Exported(snapshot) => Ok((
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", snapshot.file_name),
                ),
            ],
            snapshot.content,
        )
            .into_response()),
        other => Ok(outcome_response(other)),
    }
}
