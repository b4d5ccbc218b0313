use api::{create_router, AppConfig, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn build_app(seed_demo_rules: bool) -> Router {
    let mut config = AppConfig::default();
    config.store.seed_demo_rules = seed_demo_rules;
    let state = AppState::from_config(&config)
        .expect("state should build")
        .shared();
    create_router(state, &config)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> axum::response::Response {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let req = builder.body(body).expect("request should build");
    app.clone().oneshot(req).await.expect("request should succeed")
}

async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let resp = send(app, method, uri, body).await;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be json")
    };
    (status, value)
}

fn amount_rule() -> Value {
    json!({
        "ruleState": "ACTIVE",
        "groupingKeyNames": ["customer_id"],
        "unique": ["transaction_id"],
        "aggregateFieldName": "amount",
        "aggregateFunctionType": "SUM",
        "limitOperatorType": ">",
        "limit": 10000,
        "windowMinutes": 60
    })
}

fn control_record(control_type: &str, rule_id: &str) -> Value {
    json!({
        "ruleId": rule_id,
        "ruleState": "CONTROL",
        "controlType": control_type,
        "groupingKeyNames": ["placeholder"],
        "aggregateFieldName": "placeholder",
        "aggregateFunctionType": "SUM",
        "limitOperatorType": ">",
        "limit": 0,
        "windowMinutes": 1
    })
}

fn rule_ids(rules: &Value) -> Vec<String> {
    rules
        .as_array()
        .expect("rules should be an array")
        .iter()
        .map(|r| r["ruleId"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn create_list_delete_flow() {
    let app = build_app(false);

    let (status, body) = request_json(&app, "GET", "/api/get-rules/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, created) =
        request_json(&app, "POST", "/api/create-rule-or-update/", Some(amount_rule())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["ruleId"], "rule_1");
    assert_eq!(created["limitOperatorType"], ">");

    let (_, body) = request_json(&app, "GET", "/api/get-rules/", None).await;
    assert_eq!(rule_ids(&body), vec!["rule_1"]);

    let (status, body) = request_json(
        &app,
        "DELETE",
        "/api/delete-rule/",
        Some(json!({ "ruleId": "rule_1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, body) = request_json(&app, "GET", "/api/get-rules/", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn upsert_with_id_replaces_in_place() {
    let app = build_app(true);

    let mut update = amount_rule();
    update["ruleId"] = json!("rule_002");
    update["limit"] = json!(42);
    let (status, body) =
        request_json(&app, "POST", "/api/create-rule-or-update/", Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 42.0);

    let (_, body) = request_json(&app, "GET", "/api/get-rules/", None).await;
    assert_eq!(rule_ids(&body), vec!["rule_001", "rule_002", "rule_003"]);
    assert_eq!(body[1]["aggregateFieldName"], "amount");
}

#[tokio::test]
async fn put_requires_existing_rule() {
    let app = build_app(true);

    let mut missing = amount_rule();
    missing["ruleId"] = json!("rule_404");
    let (status, body) =
        request_json(&app, "PUT", "/api/create-rule-or-update/", Some(missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);

    let mut existing = amount_rule();
    existing["ruleId"] = json!("rule_001");
    existing["ruleState"] = json!("PAUSE");
    let (status, body) =
        request_json(&app, "PUT", "/api/create-rule-or-update/", Some(existing)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ruleState"], "PAUSE");
}

#[tokio::test]
async fn invalid_rule_is_rejected() {
    let app = build_app(false);

    let mut rule = amount_rule();
    rule["groupingKeyNames"] = json!(["  ", ""]);
    let (status, body) =
        request_json(&app, "POST", "/api/create-rule-or-update/", Some(rule)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap_or_default().contains("groupingKeyNames"));

    let mut rule = amount_rule();
    rule["windowMinutes"] = json!(0);
    let (status, _) = request_json(&app, "POST", "/api/create-rule-or-update/", Some(rule)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = request_json(&app, "GET", "/api/get-rules/", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn delete_missing_rule_is_not_found() {
    let app = build_app(false);
    let (status, body) = request_json(
        &app,
        "DELETE",
        "/api/delete-rule/",
        Some(json!({ "ruleId": "rule_9" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Rule not found: rule_9");
}

#[tokio::test]
async fn control_record_is_executed_not_stored() {
    let app = build_app(true);

    let (status, snapshot) = request_json(
        &app,
        "POST",
        "/api/create-rule-or-update/",
        Some(control_record("EXPORT_RULES_CURRENT", "ctl-1")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["ruleCount"], 3);

    let (_, body) = request_json(&app, "GET", "/api/get-rules/", None).await;
    assert_eq!(rule_ids(&body), vec!["rule_001", "rule_002", "rule_003"]);
}

#[tokio::test]
async fn export_matches_listing() {
    let app = build_app(true);

    let (status, snapshot) = request_json(
        &app,
        "POST",
        "/api/control",
        Some(json!({ "controlType": "EXPORT_RULES_CURRENT" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let exported: Value = serde_json::from_str(snapshot["content"].as_str().unwrap_or_default())
        .expect("content should be json");
    let (_, listed) = request_json(&app, "GET", "/api/get-rules/", None).await;
    assert_eq!(exported, listed);

    let file_name = snapshot["fileName"].as_str().unwrap_or_default();
    assert!(file_name.starts_with("aml-rules-"));
    assert!(file_name.ends_with(".json"));
}

#[tokio::test]
async fn export_download_sets_attachment_header() {
    let app = build_app(true);

    let resp = send(&app, "GET", "/api/export", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"aml-rules-"));

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let rules: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(rule_ids(&rules), vec!["rule_001", "rule_002", "rule_003"]);
}

#[tokio::test]
async fn delete_all_empties_store() {
    let app = build_app(true);

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/create-rule-or-update/",
        Some(control_record("DELETE_RULES_ALL", "ctl-2")),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = request_json(&app, "GET", "/api/get-rules/", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn delete_by_id_control() {
    let app = build_app(true);

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/control",
        Some(json!({ "controlType": "DELETE_RULE_BY_ID", "ruleId": "rule_002" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/control",
        Some(json!({ "controlType": "DELETE_RULE_BY_ID", "ruleId": "nonexistent" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = request_json(&app, "GET", "/api/get-rules/", None).await;
    assert_eq!(rule_ids(&body), vec!["rule_001", "rule_003"]);

    let (status, history) = request_json(&app, "GET", "/api/control/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["ruleId"], "nonexistent");
    assert_eq!(history[0]["succeeded"], false);
    assert_eq!(history[1]["ruleId"], "rule_002");
    assert_eq!(history[1]["succeeded"], true);
}

#[tokio::test]
async fn unknown_control_type_is_rejected() {
    let app = build_app(true);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/control",
        Some(json!({ "controlType": "REBOOT" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown control command: REBOOT");

    let (status, _) = request_json(&app, "POST", "/api/control", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = request_json(&app, "GET", "/api/rules/summary", None).await;
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn list_filters_and_lookup() {
    let app = build_app(true);

    let (_, body) = request_json(&app, "GET", "/api/get-rules/?state=PAUSE", None).await;
    assert_eq!(rule_ids(&body), vec!["rule_002"]);

    let (_, body) = request_json(&app, "GET", "/api/get-rules/?search=RULE_003", None).await;
    assert_eq!(rule_ids(&body), vec!["rule_003"]);

    let (status, body) = request_json(&app, "GET", "/api/rules/rule_001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ruleId"], "rule_001");

    let (status, _) = request_json(&app, "GET", "/api/rules/rule_404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = request_json(&app, "GET", "/api/rules/summary", None).await;
    assert_eq!(body, json!({ "total": 3, "active": 2, "paused": 1, "deleted": 0 }));
}

#[tokio::test]
async fn alert_feed_filters_and_transitions() {
    let app = build_app(false);

    let (status, body) = request_json(&app, "GET", "/api/alerts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["summary"]["pending"], 1);

    let (_, body) = request_json(&app, "GET", "/api/alerts?severity=HIGH&status=NEW", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["id"], "alert-001");

    let (status, body) =
        request_json(&app, "POST", "/api/alerts/alert-001/acknowledge", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ACKNOWLEDGED");

    let (status, _) = request_json(&app, "POST", "/api/alerts/alert-001/resolve", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        request_json(&app, "POST", "/api/alerts/alert-001/acknowledge", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (status, _) = request_json(&app, "POST", "/api/alerts/alert-404/resolve", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_metrics() {
    let app = build_app(true);

    let (status, body) = request_json(&app, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["rules"]["total"], 3);
    assert_eq!(body["alerts"]["total"], 3);

    let resp = send(&app, "GET", "/metrics", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

fn assert_bad_request(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn undecodable_requests_get_json_errors() {
    let app = build_app(true);

    let (status, body) = request_json(
        &app,
        "PUT",
        "/api/create-rule-or-update/",
        Some(json!({ "ruleId": "rule_001", "ruleState": "ACTIVE" })),
    )
    .await;
    assert_bad_request(status, &body);

    let (status, body) =
        request_json(&app, "DELETE", "/api/delete-rule/", Some(json!({}))).await;
    assert_bad_request(status, &body);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/control",
        Some(json!({ "controlType": 5 })),
    )
    .await;
    assert_bad_request(status, &body);

    let (status, body) = request_json(&app, "GET", "/api/get-rules/?state=BOGUS", None).await;
    assert_bad_request(status, &body);

    let (status, body) = request_json(&app, "GET", "/api/alerts?severity=EXTREME", None).await;
    assert_bad_request(status, &body);

    let req = Request::builder()
        .method("POST")
        .uri("/api/create-rule-or-update/")
        .header("Content-Type", "application/json")
        .body(Body::from("not json"))
        .expect("request should build");
    let resp = app.clone().oneshot(req).await.expect("request should succeed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).expect("body should be json");
    assert_bad_request(status, &body);

    let (_, body) = request_json(&app, "GET", "/api/rules/summary", None).await;
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn put_rejects_control_type_on_plain_rule() {
    let app = build_app(true);

    let mut rule = amount_rule();
    rule["ruleId"] = json!("rule_001");
    rule["controlType"] = json!("DELETE_RULES_ALL");

    let (status, body) =
        request_json(&app, "PUT", "/api/create-rule-or-update/", Some(rule.clone())).await;
    assert_bad_request(status, &body);
    assert!(body["error"].as_str().unwrap_or_default().contains("controlType"));

    let (status, _) = request_json(&app, "POST", "/api/create-rule-or-update/", Some(rule)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = request_json(&app, "GET", "/api/rules/rule_001", None).await;
    assert_eq!(body["aggregateFieldName"], "transaction_amount");
}
