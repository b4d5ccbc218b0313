//! HTTP Route Handlers

pub mod alerts;
pub mod control;
pub mod rules;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ::control::{Command, CommandError, CommandOutcome};
use metrics::{counter, gauge};
use rule_model::ControlType;
use tracing::warn;

use crate::{ApiResult, AppState};

/// Run a command through the interpreter and record its metrics
pub(crate) fn execute(state: &AppState, command: Command) -> ApiResult<CommandOutcome> {
    let control_type = command.control_type();
    let result = state.interpreter.execute(&state.store, command);
    record_metrics(control_type, &result);
    match state.store.len() {
        Ok(stored) => gauge!("aml_rules_stored").set(stored as f64),
        Err(err) => warn!("Rule count unavailable: {}", err),
    }
    Ok(result?)
}

fn record_metrics(control_type: Option<ControlType>, result: &Result<CommandOutcome, CommandError>) {
    match (control_type, result) {
        (Some(control_type), Ok(_)) => {
            counter!("aml_control_commands_total", "control_type" => control_type.as_str())
                .increment(1)
        }
        (Some(control_type), Err(_)) => {
            counter!("aml_control_failures_total", "control_type" => control_type.as_str())
                .increment(1)
        }
        (None, Ok(CommandOutcome::Saved(_))) => counter!("aml_rule_upserts_total").increment(1),
        (None, Ok(CommandOutcome::Deleted(_))) => counter!("aml_rule_deletes_total").increment(1),
        _ => {}
    }
}

/// Saved rules and snapshots are returned as JSON; deletions have no body
pub(crate) fn outcome_response(outcome: CommandOutcome) -> Response {
    match outcome {
        CommandOutcome::Saved(rule) => Json(rule).into_response(),
        CommandOutcome::Exported(snapshot) => Json(snapshot).into_response(),
        CommandOutcome::Deleted(_) | CommandOutcome::Cleared { .. } => {
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
