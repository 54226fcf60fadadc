use std::path::PathBuf;

use foundation::geo::CoordError;
use incidents::RecordId;
use serde_json::Value;

/// Failure of a read or status-update call.
#[derive(Debug)]
pub enum ApiError {
    Transport(reqwest::Error),
    Status { status: u16, message: String },
    NotFound { resource: &'static str, id: RecordId },
    Invalid { field: &'static str, reason: String },
    Decode(serde_json::Error),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "request failed: {e}"),
            ApiError::Status { status, message } => write!(f, "HTTP {status}: {message}"),
            ApiError::NotFound { resource, id } => write!(f, "{resource} {id} not found"),
            ApiError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
            ApiError::Decode(e) => write!(f, "unexpected response body: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e)
    }
}

/// Failure of an incident report or simulation.
///
/// `FakeImageDetected` is kept apart from other rejections so the dashboard
/// can tell the reporter their photo was refused.
#[derive(Debug)]
pub enum ReportError {
    InvalidSeverity(u8),
    InvalidPosition(CoordError),
    Attachment { path: PathBuf, source: std::io::Error },
    FakeImageDetected { message: String, incident_id: Option<RecordId> },
    Rejected { status: u16, message: String },
    Transport(reqwest::Error),
    Decode(serde_json::Error),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::InvalidSeverity(s) => write!(f, "severity {s} is outside 1..=5"),
            ReportError::InvalidPosition(e) => write!(f, "invalid position: {e}"),
            ReportError::Attachment { path, source } => {
                write!(f, "cannot read attachment {}: {source}", path.display())
            }
            ReportError::FakeImageDetected { message, .. } => {
                write!(f, "attachment rejected as fake: {message}")
            }
            ReportError::Rejected { status, message } => {
                write!(f, "report rejected (HTTP {status}): {message}")
            }
            ReportError::Transport(e) => write!(f, "request failed: {e}"),
            ReportError::Decode(e) => write!(f, "unexpected response body: {e}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::InvalidPosition(e) => Some(e),
            ReportError::Attachment { source, .. } => Some(source),
            ReportError::Transport(e) => Some(e),
            ReportError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(e: reqwest::Error) -> Self {
        ReportError::Transport(e)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError::Decode(e)
    }
}

const MAX_MESSAGE_CHARS: usize = 200;

/// Maps a non-success report response to a `ReportError`.
pub fn classify_report_failure(status: u16, body: &str) -> ReportError {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if json.get("error").and_then(Value::as_str) == Some("fake_image_detected") {
            return ReportError::FakeImageDetected {
                message: json
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("image flagged by the detector")
                    .to_string(),
                incident_id: json.get("incident_id").and_then(Value::as_u64),
            };
        }
    }
    ReportError::Rejected {
        status,
        message: error_message(body),
    }
}

/// Best human-readable message in an error body.
///
/// Prefers `message`, then `error`, then the raw body cut to a short prefix.
pub fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = json.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_MESSAGE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::{ReportError, classify_report_failure, error_message};
    use pretty_assertions::assert_eq;

    #[test]
    fn fake_image_is_its_own_error() {
        let body = r#"{"error":"fake_image_detected","message":"File 'a.jpg' was flagged","incident_id":17}"#;
        match classify_report_failure(400, body) {
            ReportError::FakeImageDetected {
                message,
                incident_id,
            } => {
                assert_eq!(message, "File 'a.jpg' was flagged");
                assert_eq!(incident_id, Some(17));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn other_bad_request_is_rejected() {
        let body = r#"{"error":"latitude and longitude are required"}"#;
        match classify_report_failure(400, body) {
            ReportError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "latitude and longitude are required");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_truncated() {
        let body = "x".repeat(500);
        assert_eq!(error_message(&body).len(), 200);
        assert_eq!(error_message("   "), "empty response body");
        assert_eq!(error_message("<h1>Bad Gateway</h1>"), "<h1>Bad Gateway</h1>");
    }

    #[test]
    fn server_error_keeps_status() {
        assert!(matches!(
            classify_report_failure(500, "{}"),
            ReportError::Rejected { status: 500, .. }
        ));
    }
}
