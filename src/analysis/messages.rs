use super::error::AnalysisError;
use crate::audio::AudioFile;
use crate::feedback::{FeedbackCollection, FeedbackItem};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Name of the multipart field carrying the recording
pub const FILE_FIELD: &str = "file";

/// One submission of a recording to the analysis service
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub file: AudioFile,
}

impl AnalysisRequest {
    pub fn new(file: AudioFile) -> Self {
        Self { file }
    }
}

/// Error body the analysis service sends with a failure status
#[derive(Debug, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

/// Interpret a successful response body.
///
/// The top level must be an object with a `feedback` array. Every object
/// entry becomes an item, with fields that are missing or not text rendered as
/// empty strings; array entries that are not objects are dropped.
pub fn parse_analysis_body(body: &str) -> Result<FeedbackCollection, AnalysisError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AnalysisError::InvalidResponse(format!("body is not JSON: {}", e)))?;

    let feedback = value
        .as_object()
        .ok_or_else(|| AnalysisError::InvalidResponse("body is not an object".to_string()))?
        .get("feedback")
        .ok_or_else(|| AnalysisError::InvalidResponse("missing \"feedback\" key".to_string()))?
        .as_array()
        .ok_or_else(|| {
            AnalysisError::InvalidResponse("\"feedback\" is not an array".to_string())
        })?;

    Ok(feedback
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry.as_object() {
            Some(fields) => Some(FeedbackItem {
                principle: text_field(fields, "principle"),
                timestamp: text_field(fields, "timestamp"),
                description: text_field(fields, "description"),
            }),
            None => {
                warn!("Dropping feedback entry {}: not an object", index);
                None
            }
        })
        .collect())
}

/// Field as display text: strings verbatim, numbers and booleans formatted,
/// anything else (missing, null, nested) empty
fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Pull a human-readable message out of a failure body
pub fn failure_message(body: &str) -> String {
    match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "no details".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
