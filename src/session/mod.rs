//! Upload/review session
//!
//! This module provides the `UploadSession` state machine that manages:
//! - File selection and the local preview handle
//! - Submission to the analysis service, with stale results fenced off
//! - The feedback store of the last completed analysis
//! - Seeking the playback surface to feedback timestamps

mod session;
mod snapshot;
mod state;

pub use session::{AnalysisOutcome, PendingAnalysis, Resolution, UploadSession};
pub use snapshot::{FileSummary, SessionSnapshot, RETRY_NOTICE};
pub use state::{Phase, SessionState};
