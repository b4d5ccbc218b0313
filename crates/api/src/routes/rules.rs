//! Rule Routes

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Response,
    Json,
};
use ::control::{decode_rule_input, Command};
use metrics::counter;
use rule_model::Rule;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storage::{RuleFilter, RuleSummary};
use tracing::debug;

use super::{execute, outcome_response};
use crate::{ApiResult, SharedState};

/// Body of the delete endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRuleRequest {
    pub rule_id: String,
}

/// List rules, optionally filtered by `search` and `state`
pub async fn list_rules(
    State(state): State<SharedState>,
    filter: Result<Query<RuleFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Rule>>> {
    let Query(filter) = filter?;
    let state = state.read().await;
    let rules = state.store.search(&filter)?;
    debug!("Returning {} rules", rules.len());
    Ok(Json(rules))
}

/// Rule counts per state
pub async fn rule_summary(State(state): State<SharedState>) -> ApiResult<Json<RuleSummary>> {
    let state = state.read().await;
    Ok(Json(state.store.summary()?))
}

/// Get one rule
pub async fn get_rule(
    State(state): State<SharedState>,
    Path(rule_id): Path<String>,
) -> ApiResult<Json<Rule>> {
    let state = state.read().await;
    Ok(Json(state.store.get(&rule_id)?))
}

/// Create or update a rule. CONTROL records are executed as control
/// commands instead and never stored.
pub async fn create_or_update(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(payload) = payload?;
    let command = Command::from_payload(payload)?;
    let state = state.read().await;
    let outcome = execute(&state, command)?;
    Ok(outcome_response(outcome))
}

/// Replace an existing rule
pub async fn update_rule(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Rule>> {
    let Json(payload) = payload?;
    let input = decode_rule_input(payload)?;
    let state = state.read().await;
    let rule = state.store.replace(input)?;
    counter!("aml_rule_upserts_total").increment(1);
    Ok(Json(rule))
}

/// Delete a rule by id
pub async fn delete_rule(
    State(state): State<SharedState>,
    request: Result<Json<DeleteRuleRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(request) = request?;
    let state = state.read().await;
    execute(&state, Command::Delete(request.rule_id))?;
    Ok(StatusCode::NO_CONTENT)
}
