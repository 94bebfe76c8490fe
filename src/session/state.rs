use crate::analysis::{AnalysisError, AnalysisRequest, ErrorKind};
use crate::audio::{AudioFile, FileId};
use crate::feedback::FeedbackCollection;
use serde::Serialize;

/// Which variant of `SessionState` is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    FileSelected,
    Analyzing,
    Ready,
    Failed,
}

/// The upload/review lifecycle. Transitions are the only way state changes.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,
    FileSelected {
        file: AudioFile,
    },
    Analyzing {
        file: AudioFile,
    },
    Ready {
        file: AudioFile,
        feedback: FeedbackCollection,
    },
    Failed {
        file: AudioFile,
        error_kind: ErrorKind,
        detail: String,
    },
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Idle => Phase::Idle,
            SessionState::FileSelected { .. } => Phase::FileSelected,
            SessionState::Analyzing { .. } => Phase::Analyzing,
            SessionState::Ready { .. } => Phase::Ready,
            SessionState::Failed { .. } => Phase::Failed,
        }
    }

    pub fn file(&self) -> Option<&AudioFile> {
        match self {
            SessionState::Idle => None,
            SessionState::FileSelected { file }
            | SessionState::Analyzing { file }
            | SessionState::Ready { file, .. }
            | SessionState::Failed { file, .. } => Some(file),
        }
    }

    pub fn feedback(&self) -> Option<&FeedbackCollection> {
        match self {
            SessionState::Ready { feedback, .. } => Some(feedback),
            _ => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            SessionState::Failed { error_kind, .. } => Some(*error_kind),
            _ => None,
        }
    }

    /// Selecting a file is valid from every state
    pub fn select_file(&self, file: AudioFile) -> SessionState {
        SessionState::FileSelected { file }
    }

    /// Start an analysis. Only `FileSelected` and `Failed` accept a submit;
    /// everything else returns `None`.
    pub fn begin_analysis(&self) -> Option<(SessionState, AnalysisRequest)> {
        match self {
            SessionState::FileSelected { file } | SessionState::Failed { file, .. } => Some((
                SessionState::Analyzing { file: file.clone() },
                AnalysisRequest::new(file.clone()),
            )),
            _ => None,
        }
    }

    /// Apply a finished analysis.
    ///
    /// Returns `None` when the result is stale: the session is no longer
    /// analyzing, or it is analyzing a different file selection.
    pub fn resolve(
        &self,
        file_id: FileId,
        result: &Result<FeedbackCollection, AnalysisError>,
    ) -> Option<SessionState> {
        let file = match self {
            SessionState::Analyzing { file } if file.id == file_id => file.clone(),
            _ => return None,
        };

        Some(match result {
            Ok(feedback) => SessionState::Ready {
                file,
                feedback: feedback.clone(),
            },
            Err(e) => SessionState::Failed {
                file,
                error_kind: e.kind(),
                detail: e.to_string(),
            },
        })
    }
}
