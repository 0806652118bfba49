// Web server: Axum-based single-user dashboard backend.
//
// The dashboard is one self-contained HTML page embedded at compile time.
// All /api/* routes serve JSON.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::analysis::Analyzer;
use crate::db::Database;

pub mod handlers;

/// Upload cap for a resume plus a job description.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

static DASHBOARD_HTML: &str = include_str!("dashboard.html");

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub analyzer: Arc<Analyzer>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(
    db: Arc<dyn Database>,
    analyzer: Analyzer,
    port: u16,
    bind: &str,
) -> Result<()> {
    let state = AppState {
        db,
        analyzer: Arc::new(analyzer),
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Tailor dashboard listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/analyze", post(handlers::analyze::analyze))
        .route("/api/analyses", get(handlers::analyses::list_analyses))
        .route("/api/analyses/{id}", get(handlers::analyses::get_analysis))
        .route("/api/skills", post(handlers::skills::extract_skills));

    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .merge(api)
        // Multipart's own 2 MB default is replaced by the tower-http limit
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check, always 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
