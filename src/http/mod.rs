//! HTTP review API for a browser front-end
//!
//! This module exposes the upload session over REST:
//! - GET /session - Current session snapshot
//! - POST /session/file - Select a recording (multipart field `file`)
//! - POST /session/analyze - Submit the selected recording for analysis
//! - GET /session/audio - Stream the local preview of the recording
//! - GET /session/feedback - Key moments of the last analysis
//! - POST /session/feedback/:index/seek - Jump playback to a key moment
//! - POST /session/feedback/next - Jump to the next key moment
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{FeedbackResponse, MomentView};
pub use routes::create_router;
pub use state::AppState;
