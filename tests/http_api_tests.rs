// Integration tests for the review API
//
// Requests go straight into the router with `oneshot`; the analysis backend
// is a stub service returning a fixed body.

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use classroom_feedback::analysis::{parse_analysis_body, AnalysisRequest, AnalysisService};
use classroom_feedback::http::FeedbackResponse;
use classroom_feedback::{
    create_router, AnalysisError, AppState, FeedbackCollection, Phase, UploadSession,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const BOUNDARY: &str = "classroom-feedback-test-boundary";

struct StubService {
    body: &'static str,
}

#[async_trait::async_trait]
impl AnalysisService for StubService {
    async fn analyze(&self, _request: AnalysisRequest) -> Result<FeedbackCollection, AnalysisError> {
        parse_analysis_body(self.body)
    }
}

fn setup(body: &'static str) -> (AppState, Router) {
    let session = UploadSession::new(Arc::new(StubService { body }));
    let state = AppState::new(session, 1024 * 1024);
    let router = create_router(state.clone());
    (state, router)
}

fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(field: &str, file_name: &str, content: &[u8]) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method(Method::POST)
        .uri("/session/file")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, file_name, content)))?)
}

fn empty_request(method: Method, uri: &str) -> Result<Request<Body>> {
    Ok(Request::builder().method(method).uri(uri).body(Body::empty())?)
}

async fn json_body(response: axum::response::Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn wait_for_phase(state: &AppState, phase: Phase) -> Result<()> {
    let mut rx = state.session.lock().await.subscribe();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.phase == phase)).await??;
    Ok(())
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let (_state, app) = setup(r#"{"feedback": []}"#);

    let response = app.oneshot(empty_request(Method::GET, "/health")?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_initial_session_is_idle() -> Result<()> {
    let (_state, app) = setup(r#"{"feedback": []}"#);

    let response = app.oneshot(empty_request(Method::GET, "/session")?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await?;
    assert_eq!(json["phase"], "idle");
    assert_eq!(json["moments"], 0);
    assert!(json["file"].is_null());

    Ok(())
}

#[tokio::test]
async fn test_analyze_without_file_conflicts() -> Result<()> {
    let (_state, app) = setup(r#"{"feedback": []}"#);

    let response = app
        .oneshot(empty_request(Method::POST, "/session/analyze")?)
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() -> Result<()> {
    let (_state, app) = setup(r#"{"feedback": []}"#);

    let response = app
        .oneshot(upload_request("attachment", "lesson.wav", b"audio")?)
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_review_flow() -> Result<()> {
    let (state, app) = setup(
        r#"{"feedback":[
            {"principle":"Pacing","timestamp":"01:05","description":"Slow down"},
            {"principle":"Wait time","timestamp":"soon","description":"Pause longer"}
        ]}"#,
    );

    // Select
    let response = app
        .clone()
        .oneshot(upload_request("file", "lesson.wav", b"classroom audio bytes")?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await?;
    assert_eq!(json["phase"], "file_selected");
    assert_eq!(json["file"]["name"], "lesson.wav");
    assert_eq!(json["file"]["size"], 21);

    // Preview is served back
    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/session/audio")?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&bytes[..], b"classroom audio bytes");

    // Analyze
    let response = app
        .clone()
        .oneshot(empty_request(Method::POST, "/session/analyze")?)
        .await?;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    wait_for_phase(&state, Phase::Ready).await?;

    // Key moments
    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/session/feedback")?)
        .await?;
    let feedback: FeedbackResponse =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await?)?;
    assert_eq!(feedback.moments, 2);
    assert_eq!(feedback.items[0].principle, "Pacing");
    assert_eq!(feedback.items[0].offset_secs, Some(65));
    assert_eq!(feedback.items[1].offset_secs, None);

    // Seek
    let response = app
        .clone()
        .oneshot(empty_request(Method::POST, "/session/feedback/0/seek")?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await?;
    assert_eq!(json["outcome"], "playing");
    assert_eq!(json["offset_secs"], 65);

    let response = app
        .clone()
        .oneshot(empty_request(Method::POST, "/session/feedback/1/seek")?)
        .await?;
    assert_eq!(json_body(response).await?["outcome"], "unseekable");

    let response = app
        .clone()
        .oneshot(empty_request(Method::POST, "/session/feedback/7/seek")?)
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Next wraps back to the first moment
    let response = app
        .clone()
        .oneshot(empty_request(Method::POST, "/session/feedback/next")?)
        .await?;
    let json = json_body(response).await?;
    assert_eq!(json["index"], 0);

    let response = app.oneshot(empty_request(Method::GET, "/session")?).await?;
    let json = json_body(response).await?;
    assert_eq!(json["phase"], "ready");
    assert_eq!(json["playback"]["position_secs"], 65);
    assert_eq!(json["playback"]["playing"], true);

    Ok(())
}

#[tokio::test]
async fn test_invalid_response_surfaces_notice() -> Result<()> {
    let (state, app) = setup(r#"{"feedback": "not-an-array"}"#);

    app.clone()
        .oneshot(upload_request("file", "lesson.wav", b"audio")?)
        .await?;
    let response = app
        .clone()
        .oneshot(empty_request(Method::POST, "/session/analyze")?)
        .await?;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    wait_for_phase(&state, Phase::Failed).await?;

    let response = app.oneshot(empty_request(Method::GET, "/session")?).await?;
    let json = json_body(response).await?;
    assert_eq!(json["error_kind"], "invalid_response");
    assert_eq!(json["notice"], "Error analyzing audio. Retry the analysis.");

    Ok(())
}
