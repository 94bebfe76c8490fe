use super::state::{Phase, SessionState};
use crate::analysis::ErrorKind;
use crate::audio::{AudioFile, FileId, PlaybackStatus};
use crate::feedback::FeedbackCollection;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Notice shown when an analysis fails
pub const RETRY_NOTICE: &str = "Error analyzing audio. Retry the analysis.";

/// Summary of the selected recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub id: FileId,
    pub name: String,
    pub size: usize,
    pub mime_type: String,
}

impl From<&AudioFile> for FileSummary {
    fn from(file: &AudioFile) -> Self {
        Self {
            id: file.id,
            name: file.name.clone(),
            size: file.size(),
            mime_type: file.mime_type.clone(),
        }
    }
}

/// What observers of a session see after each transition
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,

    /// Currently selected recording
    pub file: Option<FileSummary>,

    /// Key moments of the last completed analysis, in service order
    pub feedback: FeedbackCollection,

    /// Number of key moments
    pub moments: usize,

    pub error_kind: Option<ErrorKind>,

    /// Failure detail from the analysis client or service
    pub detail: Option<String>,

    /// User-facing notice, set when the session needs a retry
    pub notice: Option<String>,

    pub playback: PlaybackStatus,

    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub(crate) fn capture(state: &SessionState, playback: PlaybackStatus) -> Self {
        let feedback = state.feedback().cloned().unwrap_or_default();
        let (detail, notice) = match state {
            SessionState::Failed { detail, .. } => {
                (Some(detail.clone()), Some(RETRY_NOTICE.to_string()))
            }
            _ => (None, None),
        };

        Self {
            phase: state.phase(),
            file: state.file().map(FileSummary::from),
            moments: feedback.len(),
            feedback,
            error_kind: state.error_kind(),
            detail,
            notice,
            playback,
            updated_at: Utc::now(),
        }
    }
}
