//! AML Rule Service API
//!
//! REST API backing the AML rule management dashboard: rule CRUD, control
//! commands, export and the alert feed.

use alerting::{AlertFeed, AlertSummary};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use control::ControlInterpreter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use storage::{demo_rules, RuleStore, RuleSummary};
use tokio::sync::RwLock;
use tower_governor::GovernorLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod rate_limit;
mod routes;

pub use crate::config::AppConfig;
pub use error::{ApiError, ApiResult, ErrorResponse};

use crate::config::{LogFormat, LoggingConfig, MetricsConfig, ServerConfig};
use crate::rate_limit::create_governor_config;

/// Application state shared across handlers
pub struct AppState {
    /// Authoritative rule collection
    pub store: RuleStore,
    /// Control command dispatch and history
    pub interpreter: ControlInterpreter,
    /// Alert feed
    pub alerts: AlertFeed,
    /// Prometheus handle, when the exporter is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

/// State as held by the router
pub type SharedState = Arc<RwLock<AppState>>;

impl AppState {
    /// Create empty application state
    pub fn new() -> Self {
        Self {
            store: RuleStore::new(),
            interpreter: ControlInterpreter::default(),
            alerts: AlertFeed::new(),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Build state from configuration, seeding demo data when asked to
    pub fn from_config(config: &AppConfig) -> ApiResult<Self> {
        let store = if config.store.seed_demo_rules {
            RuleStore::with_rules(config.store.id_strategy, demo_rules())?
        } else {
            RuleStore::with_strategy(config.store.id_strategy)
        };

        let alerts = if config.alerts.seed_demo_alerts {
            AlertFeed::with_demo_alerts()
        } else {
            AlertFeed::new()
        };

        Ok(Self {
            store,
            interpreter: ControlInterpreter::new(config.control.history_limit),
            alerts,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        })
    }

    /// Attach the Prometheus handle rendered at `/metrics`
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// Wrap for sharing with the router
    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub rules: RuleSummary,
    pub alerts: AlertSummary,
}

/// Create the application router
pub fn create_router(state: SharedState, config: &AppConfig) -> Router {
    let mut writes = Router::new()
        .route(
            "/api/create-rule-or-update/",
            post(routes::rules::create_or_update).put(routes::rules::update_rule),
        )
        .route("/api/delete-rule/", delete(routes::rules::delete_rule))
        .route("/api/control", post(routes::control::execute_control));

    if config.rate_limit.enabled {
        match create_governor_config(&config.rate_limit) {
            Some(governor) => {
                info!(
                    "Rate limiting write endpoints ({}s per request, burst {})",
                    config.rate_limit.per_second, config.rate_limit.burst_size
                );
                writes = writes.layer(GovernorLayer { config: governor });
            }
            None => warn!("Rate limiting disabled: period and burst size must be non-zero"),
        }
    }

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/get-rules/", get(routes::rules::list_rules))
        .route("/api/rules/summary", get(routes::rules::rule_summary))
        .route("/api/rules/:rule_id", get(routes::rules::get_rule))
        .route("/api/control/history", get(routes::control::control_history))
        .route("/api/export", get(routes::control::export_rules))
        .route("/api/alerts", get(routes::alerts::get_alerts))
        .route("/api/alerts/:id/acknowledge", post(routes::alerts::acknowledge_alert))
        .route("/api/alerts/:id/resolve", post(routes::alerts::resolve_alert))
        .route("/metrics", get(metrics_handler))
        .merge(writes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server))
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        // No origins configured: permissive, for local development
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> ApiResult<Json<HealthResponse>> {
    let state = state.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        rules: state.store.summary()?,
        alerts: state.alerts.summary(),
    }))
}

/// Prometheus scrape endpoint
async fn metrics_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> ApiResult<()> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| ApiError::Logging(format!("invalid log level: {}", config.level)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
    };

    result.map_err(|e| ApiError::Logging(e.to_string()))
}

/// Install the Prometheus recorder when metrics are enabled
pub fn init_metrics(config: &MetricsConfig) -> ApiResult<Option<PrometheusHandle>> {
    if !config.enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ApiError::Metrics(e.to_string()))?;
    info!("Prometheus metrics exposed at /metrics");
    Ok(Some(handle))
}

/// Run the server
pub async fn run_server(config: &AppConfig, state: SharedState) -> ApiResult<()> {
    let addr = config.server.socket_addr();
    let app = create_router(state, config);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
