//! Error mapping for HTTP responses
//!
//! Converts a non-success response into a `ClientError` carrying the best
//! message the body offers, falling back to one derived from the status.

use reqwest::StatusCode;
use serde_json::Value;

use super::ClientError;

/// Fields checked, in order, for an error message in a JSON error body.
/// `detail` is what FastAPI's `HTTPException` produces.
const MESSAGE_FIELDS: [&str; 3] = ["message", "detail", "error"];

/// Whether a status code is in the success range
pub fn is_success_status(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Extract a non-empty string message from a JSON error body
pub fn extract_message(json: &Value) -> Option<&str> {
    MESSAGE_FIELDS
        .iter()
        .filter_map(|field| json.get(*field))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|message| !message.is_empty())
}

/// Generic message used when the body carries nothing better
pub fn status_fallback_message(status: u16) -> String {
    format!("HTTP error! status: {}", status)
}

/// Reason phrase for a status, preferring the one sent by the server
fn reason_phrase(status: u16, reason: Option<&str>) -> Option<String> {
    reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .or_else(|| {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
        })
}

/// Map a non-success HTTP response to a `ClientError`
///
/// The message is never empty.
pub fn map_http_error(status: u16, reason: Option<&str>, body: &str) -> ClientError {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(json) => extract_message(&json)
            .map(str::to_string)
            .unwrap_or_else(|| status_fallback_message(status)),
        Err(_) => reason_phrase(status, reason).unwrap_or_else(|| status_fallback_message(status)),
    };

    ClientError::http(status, message)
}
