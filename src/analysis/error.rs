use serde::Serialize;
use thiserror::Error;

/// Category of a failed analysis, as surfaced in the session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Network failure, timeout or non-2xx status
    AnalysisFailed,
    /// 2xx response whose body is not `{ "feedback": [...] }`
    InvalidResponse,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("network error: {0}")]
    Network(String),

    #[error("analysis request timed out")]
    Timeout,

    #[error("analysis service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid analysis response: {0}")]
    InvalidResponse(String),

    #[error("analysis task failed: {0}")]
    Task(String),

    #[error("analysis was abandoned before it finished")]
    Abandoned,
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            AnalysisError::Network(_)
            | AnalysisError::Timeout
            | AnalysisError::Status { .. }
            | AnalysisError::Task(_)
            | AnalysisError::Abandoned => ErrorKind::AnalysisFailed,
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AnalysisError::Timeout
        } else {
            AnalysisError::Network(e.to_string())
        }
    }
}
