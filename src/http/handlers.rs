use super::state::AppState;
use crate::analysis::messages::FILE_FIELD;
use crate::audio::{AudioFile, SeekOutcome};
use crate::feedback::FeedbackItem;
use crate::session::SessionSnapshot;
use axum::{
    extract::{Multipart, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

/// One key moment as rendered by the front-end
#[derive(Debug, Serialize, Deserialize)]
pub struct MomentView {
    pub index: usize,
    pub principle: String,
    pub timestamp: String,
    pub description: String,
    /// Decoded timestamp; `None` when the item cannot be jumped to
    pub offset_secs: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub moments: usize,
    pub items: Vec<MomentView>,
}

#[derive(Debug, Serialize)]
pub struct SeekResponse {
    pub index: usize,
    #[serde(flatten)]
    pub outcome: SeekOutcome,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

impl MomentView {
    fn new(index: usize, item: &FeedbackItem) -> Self {
        Self {
            index,
            principle: item.principle.clone(),
            timestamp: item.timestamp.clone(),
            description: item.description.clone(),
            offset_secs: item.offset_secs().ok(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /session
/// Current session snapshot
pub async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut session = state.session.lock().await;
    session.reap_abandoned();
    Json(session.snapshot())
}

/// POST /session/file
/// Select a recording, replacing any previous one
pub async fn select_file(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let file = loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Missing multipart field \"{}\"", FILE_FIELD),
                )
            }
            Err(e) => {
                warn!("Rejected upload: {}", e);
                return error_response(StatusCode::BAD_REQUEST, format!("Invalid upload: {}", e));
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("recording").to_string();
        match field.bytes().await {
            Ok(bytes) => break AudioFile::from_bytes(name, bytes.to_vec()),
            Err(e) => {
                warn!("Failed to read upload {}: {}", name, e);
                return error_response(StatusCode::BAD_REQUEST, format!("Invalid upload: {}", e));
            }
        }
    };

    let mut session = state.session.lock().await;
    session.select_file(file);

    (StatusCode::OK, Json(session.snapshot())).into_response()
}

/// POST /session/analyze
/// Submit the selected recording; the result is applied in the background
pub async fn analyze(State(state): State<AppState>) -> Response {
    let mut session = state.session.lock().await;

    let Some(pending) = session.submit() else {
        return error_response(
            StatusCode::CONFLICT,
            format!("Cannot analyze while session is {:?}", session.phase()),
        );
    };

    let shared = Arc::clone(&state.session);
    tokio::spawn(async move {
        let outcome = pending.wait().await;
        let resolution = shared.lock().await.resolve(outcome);
        info!("Analysis resolved: {:?}", resolution);
    });

    (StatusCode::ACCEPTED, Json(session.snapshot())).into_response()
}

/// GET /session/feedback
/// Key moments of the last completed analysis
pub async fn get_feedback(State(state): State<AppState>) -> Json<FeedbackResponse> {
    let session = state.session.lock().await;
    let items: Vec<MomentView> = session
        .feedback()
        .iter()
        .enumerate()
        .map(|(index, item)| MomentView::new(index, item))
        .collect();

    Json(FeedbackResponse {
        moments: items.len(),
        items,
    })
}

/// POST /session/feedback/:index/seek
/// Jump playback to a key moment
pub async fn seek_moment(State(state): State<AppState>, Path(index): Path<usize>) -> Response {
    let mut session = state.session.lock().await;

    match session.seek_to_moment(index) {
        Some(outcome) => (StatusCode::OK, Json(SeekResponse { index, outcome })).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("Moment {} not found", index)),
    }
}

/// POST /session/feedback/next
/// Jump playback to the next key moment
pub async fn jump_next(State(state): State<AppState>) -> Response {
    let mut session = state.session.lock().await;

    match session.jump_next() {
        Some((index, outcome)) => {
            (StatusCode::OK, Json(SeekResponse { index, outcome })).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, "No key moments to jump to"),
    }
}

/// GET /session/audio
/// Serve the local preview of the selected recording
pub async fn get_audio(State(state): State<AppState>, request: Request) -> Response {
    let path = {
        let session = state.session.lock().await;
        session.preview_path().map(|p| p.to_path_buf())
    };

    let Some(path) = path else {
        return error_response(StatusCode::NOT_FOUND, "No recording selected");
    };

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            error!("Failed to serve preview: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to serve preview")
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
