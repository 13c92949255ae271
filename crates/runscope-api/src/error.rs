//! Runscope error types.
//!
//! Failed API calls return the standard envelope with an `error` object:
//!
//! ```json
//! { "data": {}, "meta": { "status": "error" },
//!   "error": { "status": 403, "message": "You must provide a valid Authorization header ..." } }
//! ```
//!
//! The body status wins over the HTTP status when it is non-zero, and the
//! HTTP reason phrase stands in for a missing message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad category of a Runscope failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunscopeErrorKind {
    /// Connection, TLS or body transfer failure.
    Network,
    /// The API answered with a status >= 400.
    Api,
    /// A response body could not be decoded.
    Parse,
    /// The client was built with unusable settings.
    InvalidConfig,
}

/// Error returned by every Runscope API operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunscopeError {
    pub kind: RunscopeErrorKind,
    /// HTTP (or envelope) status for `Api` errors.
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for RunscopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} {}", status, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for RunscopeError {}

impl From<reqwest::Error> for RunscopeError {
    fn from(e: reqwest::Error) -> Self {
        Self::network(format!("Request failed: {}", e))
    }
}

impl From<serde_json::Error> for RunscopeError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse(format!("Failed to parse response JSON: {}", e))
    }
}

/// Convenience alias.
pub type RunscopeResult<T> = Result<T, RunscopeError>;

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    message: Option<String>,
}

impl RunscopeError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self {
            kind: RunscopeErrorKind::Network,
            status: None,
            message: msg.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self {
            kind: RunscopeErrorKind::Parse,
            status: None,
            message: msg.into(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self {
            kind: RunscopeErrorKind::InvalidConfig,
            status: None,
            message: msg.into(),
        }
    }

    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self {
            kind: RunscopeErrorKind::Api,
            status: Some(status),
            message: msg.into(),
        }
    }

    /// Build from an error response. `reason` is the HTTP reason phrase.
    pub fn from_api_response(http_status: u16, reason: &str, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_default();

        let status = match parsed.status {
            Some(s) if s != 0 => s,
            _ => http_status,
        };
        let message = match parsed.message {
            Some(m) if !m.is_empty() => m,
            _ => reason.to_string(),
        };

        Self::api(status, message)
    }

    /// The status code for API errors.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// True for a 404, which callers use to detect out-of-band deletion.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const INVALID_TOKEN: &str = r#"{
        "data": {},
        "meta": { "status": "error" },
        "error": {
            "status": 403,
            "message": "You must provide a valid Authorization header to use the Runscope API.",
            "more_info": "https://www.runscope.com/docs/api/authentication"
        }
    }"#;

    #[test]
    fn test_display_uses_envelope_message() {
        let err = RunscopeError::from_api_response(403, "Forbidden", INVALID_TOKEN);
        assert_eq!(
            err.to_string(),
            "403 You must provide a valid Authorization header to use the Runscope API."
        );
        assert_eq!(err.kind, RunscopeErrorKind::Api);
    }

    #[test]
    fn test_falls_back_to_reason_phrase() {
        let err = RunscopeError::from_api_response(404, "Not Found", "<html>gone</html>");
        assert_eq!(err.to_string(), "404 Not Found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_zero_body_status_uses_http_status() {
        let body = r#"{"error": {"status": 0, "message": "bucket missing"}}"#;
        let err = RunscopeError::from_api_response(404, "Not Found", body);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message, "bucket missing");
    }

    #[test]
    fn test_body_status_wins() {
        let body = r#"{"error": {"status": 404, "message": "no such test"}}"#;
        let err = RunscopeError::from_api_response(400, "Bad Request", body);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_null_error_object() {
        let err = RunscopeError::from_api_response(500, "Internal Server Error", r#"{"error": null}"#);
        assert_eq!(err.to_string(), "500 Internal Server Error");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_non_api_display() {
        let err = RunscopeError::network("connection refused");
        assert_eq!(err.to_string(), "Network: connection refused");
        assert_eq!(err.status(), None);
    }
}
