// Web API tests — drive the router in-process with tower's oneshot.
#![cfg(feature = "web")]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use rusqlite::Connection;
use tower::ServiceExt;

use tailor::analysis::Analyzer;
use tailor::comparison::SimilarityComparator;
use tailor::db::schema::create_tables;
use tailor::db::SqliteDatabase;
use tailor::similarity::TfIdfEmbedder;
use tailor::skills::SkillExtractor;
use tailor::web::{build_router, AppState};

fn test_router() -> axum::Router {
    let conn = Connection::open_in_memory().unwrap();
    create_tables(&conn).unwrap();
    let state = AppState {
        db: Arc::new(SqliteDatabase::new(conn)),
        analyzer: Arc::new(Analyzer::new(
            SkillExtractor::catalog_only(),
            SimilarityComparator::new(Arc::new(TfIdfEmbedder::new())),
        )),
    };
    build_router(state)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    let boundary = "tailor-test-boundary";
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{boundary}\r\n"));
        match file_name {
            Some(f) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\nContent-Type: text/plain\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let response = test_router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn dashboard_is_served() {
    let response = test_router()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/api/analyze"));
}

#[tokio::test]
async fn skills_endpoint_extracts_and_categorizes() {
    let response = test_router()
        .oneshot(
            Request::post("/api/skills")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text":"Rust and Docker on Kubernetes"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["skills"], serde_json::json!(["docker", "kubernetes", "rust"]));
    assert_eq!(body["categories"]["tools"], serde_json::json!(["docker", "kubernetes"]));
}

#[tokio::test]
async fn skills_endpoint_rejects_blank_text() {
    let response = test_router()
        .oneshot(
            Request::post("/api/skills")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text":"   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_persists_and_lists() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(multipart_request(&[
            ("resume", Some("cv.txt"), "Python developer with Django and AWS"),
            ("job_text", None, "Python and Kubernetes on AWS"),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["job_name"], "pasted text");
    assert_eq!(body["analysis"]["gap"]["missing"], serde_json::json!(["kubernetes"]));

    let response = router
        .clone()
        .oneshot(Request::get("/api/analyses?limit=5").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let list = json_body(response).await;
    assert_eq!(list["analyses"][0]["id"], id);
    assert_eq!(list["analyses"][0]["resume_name"], "cv.txt");

    let response = router
        .oneshot(
            Request::get(format!("/api/analyses/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = json_body(response).await;
    assert_eq!(detail["backend"], "tfidf");

    // One quality label everywhere: the POST body, the list and the detail
    let quality = &body["analysis"]["quality"];
    assert!(quality.as_str().unwrap().ends_with(" match"), "{quality}");
    assert_eq!(&list["analyses"][0]["quality"], quality);
    assert_eq!(&detail["quality"], quality);
    assert_eq!(&detail["analysis"]["quality"], quality);
}

#[tokio::test]
async fn analyze_requires_a_job_description() {
    let response = test_router()
        .oneshot(multipart_request(&[(
            "resume",
            Some("cv.txt"),
            "Python developer",
        )]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_analysis_is_404() {
    let response = test_router()
        .oneshot(Request::get("/api/analyses/999").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
