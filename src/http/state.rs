use crate::session::UploadSession;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The one review session this server drives
    pub session: Arc<Mutex<UploadSession>>,

    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(session: UploadSession, max_upload_bytes: usize) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            max_upload_bytes,
        }
    }
}
