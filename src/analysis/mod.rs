//! Client side of the remote analysis service
//!
//! Contract: `POST /analyze` with a multipart `file` field; a 200 response
//! carries `{ "feedback": [ { "principle", "timestamp", "description" } ] }`.
//! Any other status, or a transport failure, is an analysis failure.

pub mod client;
pub mod error;
pub mod messages;

pub use client::{AnalysisService, HttpAnalysisClient};
pub use error::{AnalysisError, ErrorKind};
pub use messages::{parse_analysis_body, AnalysisRequest};
