// POST /api/analyze — upload a resume and a job description, get the analysis.
//
// Multipart fields:
//   resume    — file (pdf, docx or txt), required
//   job       — file, or
//   job_text  — pasted job description text
//
// Both documents and the analysis are saved, so the result shows up in
// GET /api/analyses afterwards.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::db::{DocumentKind, NewDocument};
use crate::documents::{self, DocumentFormat};
use crate::web::{api_error, AppState};

struct Upload {
    name: String,
    format: DocumentFormat,
    bytes: Vec<u8>,
}

pub async fn analyze(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut resume: Option<Upload> = None;
    let mut job: Option<Upload> = None;
    let mut job_text: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return api_error(StatusCode::BAD_REQUEST, &format!("Bad multipart body: {e}")),
        };

        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "resume" | "job" => {
                let file_name = field.file_name().unwrap_or("upload.txt").to_string();
                let Some(format) = DocumentFormat::from_filename(&file_name) else {
                    return api_error(
                        StatusCode::BAD_REQUEST,
                        &format!("Unsupported file type: {file_name}. Supported: pdf, docx, txt"),
                    );
                };
                let bytes = match field.bytes().await {
                    Ok(b) => b.to_vec(),
                    Err(e) => {
                        return api_error(StatusCode::BAD_REQUEST, &format!("Upload failed: {e}"))
                    }
                };
                let upload = Upload {
                    name: file_name,
                    format,
                    bytes,
                };
                if field_name == "resume" {
                    resume = Some(upload);
                } else {
                    job = Some(upload);
                }
            }
            "job_text" => match field.text().await {
                Ok(text) if !text.trim().is_empty() => job_text = Some(text),
                Ok(_) => {}
                Err(e) => return api_error(StatusCode::BAD_REQUEST, &format!("Bad job_text: {e}")),
            },
            _ => {}
        }
    }

    let Some(resume) = resume else {
        return api_error(StatusCode::BAD_REQUEST, "Missing resume file");
    };

    let resume_text = match extract(&resume).await {
        Ok(text) => text,
        Err(e) => return api_error(StatusCode::UNPROCESSABLE_ENTITY, &format!("Resume: {e:#}")),
    };

    // An uploaded file wins over pasted text
    let (job_name, job_format, jd_text) = match (job, job_text) {
        (Some(upload), _) => match extract(&upload).await {
            Ok(text) => (upload.name, upload.format, text),
            Err(e) => {
                return api_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    &format!("Job description: {e:#}"),
                )
            }
        },
        (None, Some(text)) => (
            "pasted text".to_string(),
            DocumentFormat::Text,
            text.trim().to_string(),
        ),
        (None, None) => {
            return api_error(
                StatusCode::BAD_REQUEST,
                "Provide a job description file (job) or text (job_text)",
            )
        }
    };

    let analysis = match state.analyzer.analyze(&resume_text, &jd_text).await {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            return api_error(StatusCode::UNPROCESSABLE_ENTITY, &format!("{e:#}"));
        }
    };

    let backend = state.analyzer.comparator.backend();
    let saved = state
        .db
        .save_comparison(
            NewDocument {
                kind: DocumentKind::Resume,
                name: &resume.name,
                format: resume.format,
                text: &resume_text,
                skills: &analysis.resume_skills,
            },
            NewDocument {
                kind: DocumentKind::Job,
                name: &job_name,
                format: job_format,
                text: &jd_text,
                skills: &analysis.jd_skills,
            },
            backend,
            &analysis,
        )
        .await;

    let id = match saved {
        Ok(saved) => saved.analysis_id,
        Err(e) => {
            tracing::error!(error = %e, "DB error saving analysis");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
        }
    };

    Json(serde_json::json!({
        "id": id,
        "resume_name": resume.name,
        "job_name": job_name,
        "backend": backend,
        "analysis": analysis,
    }))
    .into_response()
}

/// PDF and DOCX parsing is CPU-bound, so it runs off the async workers.
async fn extract(upload: &Upload) -> anyhow::Result<String> {
    let bytes = upload.bytes.clone();
    let format = upload.format;
    tokio::task::spawn_blocking(move || documents::parse_bytes(&bytes, format)).await?
}
