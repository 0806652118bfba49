// Saved analysis handlers.
//
// GET /api/analyses       — most recent first, ?limit= (default 20, max 200)
// GET /api/analyses/{id}  — one analysis with its full MatchAnalysis

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::db::models::AnalysisRecord;
use crate::web::{api_error, AppState};

#[derive(Deserialize, Default)]
pub struct AnalysesQuery {
    pub limit: Option<u32>,
}

pub async fn list_analyses(
    State(state): State<AppState>,
    Query(params): Query<AnalysesQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(20).clamp(1, 200);
    match state.db.recent_analyses(limit).await {
        Ok(records) => {
            let analyses: Vec<serde_json::Value> = records.iter().map(summary_json).collect();
            Json(serde_json::json!({
                "analyses": analyses,
                "limit": limit,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "DB error listing analyses");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

pub async fn get_analysis(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.db.get_analysis(id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Analysis not found"),
        Err(e) => {
            tracing::error!(error = %e, id, "DB error fetching analysis");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

/// List rows leave out the stored MatchAnalysis body.
fn summary_json(record: &AnalysisRecord) -> serde_json::Value {
    serde_json::json!({
        "id": record.id,
        "resume_name": record.resume_name,
        "job_name": record.job_name,
        "overall": record.overall,
        "avg_section": record.avg_section,
        "quality": record.quality.as_str(),
        "backend": record.backend,
        "created_at": record.created_at,
    })
}
