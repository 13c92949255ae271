//! Provider-level errors.
//!
//! Every handler failure ends up as a single terminal diagnostic for the
//! current operation; nothing is retried.

use runscope_api::RunscopeError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderErrorKind {
    /// Configuration rejected before any network call.
    Validation,
    /// Malformed import id or failed import lookup.
    Import,
    /// The Runscope API call failed.
    Api,
    /// State or configuration did not match the declared schema types.
    Decode,
    /// Provider block is missing or unusable.
    Config,
    /// The requested object or type does not exist.
    NotFound,
    /// The resource type does not support the operation.
    Unsupported,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    /// Offending attribute path, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProviderError {}

impl From<ProviderError> for String {
    fn from(e: ProviderError) -> String {
        e.message
    }
}

impl From<RunscopeError> for ProviderError {
    fn from(e: RunscopeError) -> Self {
        Self::api(e.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        Self::decode(format!("Invalid attribute data: {}", e))
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

impl ProviderError {
    fn with_kind(kind: ProviderErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            attribute: None,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::Validation, msg)
    }

    /// Validation failure pinned to one attribute.
    pub fn invalid_attribute(path: impl Into<String>, msg: impl fmt::Display) -> Self {
        let path = path.into();
        Self {
            kind: ProviderErrorKind::Validation,
            message: format!("{}: {}", path, msg),
            attribute: Some(path),
        }
    }

    pub fn import(msg: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::Import, msg)
    }

    pub fn api(msg: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::Api, msg)
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::Decode, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::Config, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::NotFound, msg)
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::Unsupported, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_attribute_records_path() {
        let err = ProviderError::invalid_attribute("assertion.0.comparison", "expected one of [equal]");
        assert_eq!(err.kind, ProviderErrorKind::Validation);
        assert_eq!(err.attribute.as_deref(), Some("assertion.0.comparison"));
        assert_eq!(
            err.to_string(),
            "assertion.0.comparison: expected one of [equal]"
        );
    }

    #[test]
    fn test_from_runscope_error() {
        let err: ProviderError = RunscopeError::api(404, "Not Found").into();
        assert_eq!(err.kind, ProviderErrorKind::Api);
        assert_eq!(err.message, "404 Not Found");
    }
}
