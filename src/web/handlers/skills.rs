// POST /api/skills — extract and categorize skills from pasted text.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::web::{api_error, AppState};

#[derive(Deserialize)]
pub struct SkillsRequest {
    pub text: String,
}

pub async fn extract_skills(
    State(state): State<AppState>,
    Json(body): Json<SkillsRequest>,
) -> Response {
    if body.text.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "text must not be empty");
    }

    let extractor = &state.analyzer.extractor;
    let skills = extractor.extract_skills(&body.text);
    let categories = extractor.categorize_skills(&skills);

    Json(serde_json::json!({
        "skills": skills,
        "categories": categories,
    }))
    .into_response()
}
