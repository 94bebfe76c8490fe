pub mod analysis;
pub mod audio;
pub mod config;
pub mod feedback;
pub mod http;
pub mod session;

pub use analysis::{AnalysisError, AnalysisRequest, AnalysisService, ErrorKind, HttpAnalysisClient};
pub use audio::{AudioFile, PlaybackController, PlaybackSurface, SeekOutcome, TrackedSurface};
pub use config::Config;
pub use feedback::{FeedbackCollection, FeedbackItem, FeedbackStore, TimestampError};
pub use http::{create_router, AppState};
pub use session::{Phase, Resolution, SessionSnapshot, SessionState, UploadSession};
