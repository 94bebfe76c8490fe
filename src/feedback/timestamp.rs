//! `MM:SS` timestamp codec
//!
//! Feedback items point into the recording with a `MM:SS` string. Minutes are
//! unbounded (a 100 minute lesson is `100:00`), seconds are expected in 0-59.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("malformed timestamp {0:?}, expected MM:SS")]
    Malformed(String),
}

/// Parse a `MM:SS` string into an offset in seconds.
///
/// Exactly one `:` separator and two unsigned numeric parts are required.
/// Surrounding whitespace is ignored. A seconds part above 59 is accepted and
/// simply added (`"00:75"` is 75 seconds).
pub fn parse(text: &str) -> Result<u32, TimestampError> {
    let malformed = || TimestampError::Malformed(text.to_string());

    let mut parts = text.trim().split(':');
    let (minutes, seconds) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(s), None) => (m, s),
        _ => return Err(malformed()),
    };

    let minutes = parse_component(minutes).ok_or_else(malformed)?;
    let seconds = parse_component(seconds).ok_or_else(malformed)?;

    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or_else(malformed)
}

/// Format an offset in seconds as `MM:SS`, zero-padding both fields.
pub fn format(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn parse_component(part: &str) -> Option<u32> {
    // u32::from_str accepts a leading '+', which is not a valid timestamp digit
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
