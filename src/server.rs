//! HTTP server for the interactive dashboard.
//!
//! This module provides an HTTP server that:
//! - Serves the dashboard page with a subject selector (GET /?subject=N)
//! - Exposes the summary and segments as JSON (GET /api/subjects/:id)
//! - Serves the raw chart SVGs (GET /charts/:id/hr.svg, /charts/:id/rmssd.svg)
//!
//! Every request runs its own fetch-then-render cycle; nothing is cached
//! between requests.
//!
//! # Architecture
//!
//! ```text
//! Browser ──→ GET /?subject=N ──→ dashboard ──→ fetch recording ──→ segment ──→ charts
//! ```

use crate::config::Config;
use crate::dashboard::{error_html, run_cycle, Dashboard, DashboardError};
use crate::fetch::DataClient;
use crate::render::SelectorTarget;
use crate::subject::{subject_entries, SubjectEntry, SubjectId};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind to (0 for random)
    pub port: u16,
    /// Dashboard configuration
    pub config: Config,
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(port: u16, config: Config) -> Self {
        Self { port, config }
    }
}

/// Shared, read-only server state
pub struct ServerState {
    config: Config,
    client: DataClient,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: &ServerConfig) -> Result<Self, DashboardError> {
        Ok(Self {
            client: DataClient::new(config.config.request_timeout())?,
            config: config.config.clone(),
        })
    }

    fn parse_subject(&self, raw: &str) -> Result<SubjectId, (StatusCode, Json<ErrorResponse>)> {
        SubjectId::parse(raw, self.config.subject_count).map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: "INVALID_SUBJECT".to_string(),
                }),
            )
        })
    }
}

/// Query string of the dashboard page
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub subject: Option<String>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn error_code(err: &DashboardError) -> &'static str {
    match err {
        DashboardError::Fetch(_) => "RETRIEVAL_ERROR",
        DashboardError::Load(_) => "PARSE_ERROR",
        DashboardError::Render(_) => "RENDER_ERROR",
    }
}

fn error_status(err: &DashboardError) -> StatusCode {
    if err.is_data_failure() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn json_error(err: &DashboardError) -> (StatusCode, Json<ErrorResponse>) {
    (
        error_status(err),
        Json(ErrorResponse {
            error: err.to_string(),
            code: error_code(err).to_string(),
        }),
    )
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /
///
/// Renders the dashboard for the selected subject (Subject 1 by default).
async fn page(State(state): State<Arc<ServerState>>, Query(query): Query<PageQuery>) -> Response {
    let raw = query.subject.unwrap_or_else(|| "1".to_string());
    let subject = match state.parse_subject(&raw) {
        Ok(subject) => subject,
        Err(rejection) => return rejection.into_response(),
    };

    let subject_count = state.config.subject_count;
    match run_cycle(&state.client, &state.config, subject).await {
        Ok(dashboard) => Html(dashboard.to_html(subject_count, SelectorTarget::Server)).into_response(),
        Err(e) => {
            tracing::error!(subject = subject.get(), "Dashboard cycle failed: {}", e);
            (
                error_status(&e),
                Html(error_html(subject, subject_count, SelectorTarget::Server, &e)),
            )
                .into_response()
        }
    }
}

/// GET /api/subjects
async fn list_subjects(State(state): State<Arc<ServerState>>) -> Json<Vec<SubjectEntry>> {
    Json(subject_entries(
        &state.config.base_url,
        state.config.subject_count,
    ))
}

/// GET /api/subjects/:id
async fn subject_dashboard(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<Dashboard>, (StatusCode, Json<ErrorResponse>)> {
    let subject = state.parse_subject(&id)?;
    run_cycle(&state.client, &state.config, subject)
        .await
        .map(Json)
        .map_err(|e| json_error(&e))
}

/// GET /charts/:id/:chart
async fn chart(
    State(state): State<Arc<ServerState>>,
    Path((id, chart)): Path<(String, String)>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let subject = state.parse_subject(&id)?;
    if chart != "hr.svg" && chart != "rmssd.svg" {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown chart '{chart}'"),
                code: "UNKNOWN_CHART".to_string(),
            }),
        ));
    }

    let dashboard = run_cycle(&state.client, &state.config, subject)
        .await
        .map_err(|e| json_error(&e))?;
    let svg = if chart == "hr.svg" {
        dashboard.hr_svg
    } else {
        dashboard.rmssd_svg
    };

    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static("image/svg+xml"))],
        svg,
    )
        .into_response())
}

/// Build the router.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/health", get(health))
        .route("/api/subjects", get(list_subjects))
        .route("/api/subjects/:id", get(subject_dashboard))
        .route("/charts/:id/:chart", get(chart))
        .layer(
            CorsLayer::new()
                .allow_origin([
                    HeaderValue::from_static("http://localhost"),
                    HeaderValue::from_static("http://127.0.0.1"),
                ])
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(config: ServerConfig) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let state = Arc::new(ServerState::new(&config)?);
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Dashboard server listening on http://{}", actual_addr);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown signal received");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_addr, shutdown_tx))
}
