//! Alert Routes

use alerting::{Alert, AlertFilter, AlertSummary};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::{ApiResult, SharedState};

/// Response for alerts endpoint
#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub data: Vec<Alert>,
    pub count: usize,
    pub summary: AlertSummary,
}

/// Get alerts, filtered by `search`, `severity` and `status`
pub async fn get_alerts(
    State(state): State<SharedState>,
    filter: Result<Query<AlertFilter>, QueryRejection>,
) -> ApiResult<Json<AlertResponse>> {
    let Query(filter) = filter?;
    let state = state.read().await;
    let data = state.alerts.list(&filter);

    Ok(Json(AlertResponse {
        count: data.len(),
        summary: state.alerts.summary(),
        data,
    }))
}

pub async fn acknowledge_alert(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Alert>> {
    let mut state = state.write().await;
    Ok(Json(state.alerts.acknowledge(&id)?))
}

pub async fn resolve_alert(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Alert>> {
    let mut state = state.write().await;
    Ok(Json(state.alerts.resolve(&id)?))
}
