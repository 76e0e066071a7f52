// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Recall memory adapter.

use thiserror::Error;

use crate::types::BackendKind;

/// The error type returned by every backend adapter and command.
///
/// Each variant corresponds to one failure class callers may want to tell
/// apart; all of them render to a human-readable message that ends up in
/// the `error` field of the JSON envelope.
#[derive(Debug, Error)]
pub enum RecallError {
    /// Configuration errors, e.g. the RPC dispatcher was never installed.
    /// Raised before any network attempt.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection failure or non-2xx HTTP status.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },

    /// A backend call did not finish within its time bound.
    #[error("request timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The active backend cannot perform this operation.
    #[error("{operation} is not supported by the {backend} backend{}", hint_suffix(.hint))]
    Unsupported {
        operation: String,
        backend: BackendKind,
        hint: Option<String>,
    },

    /// Missing or malformed command arguments, rejected content.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with a payload we could not interpret.
    #[error("unexpected backend response: {0}")]
    Decode(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_deref().map(|h| format!(": {h}")).unwrap_or_default()
}

impl RecallError {
    /// Builds a transport error for a non-2xx response, keeping status and body.
    pub fn http_status(status: u16, body: &str) -> Self {
        RecallError::Transport {
            message: format!("HTTP {status}: {body}"),
            status: Some(status),
        }
    }

    /// Returns true when the error came from the time bound rather than the transport.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RecallError::Timeout { .. })
    }
}

impl From<serde_json::Error> for RecallError {
    fn from(e: serde_json::Error) -> Self {
        RecallError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_keeps_code_and_body() {
        let err = RecallError::http_status(503, "overloaded");
        assert_eq!(err.to_string(), "transport error: HTTP 503: overloaded");
        match err {
            RecallError::Transport { status, .. } => assert_eq!(status, Some(503)),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn timeout_message_is_distinct() {
        let err = RecallError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "request timed out after 30s");
    }

    #[test]
    fn unsupported_renders_hint() {
        let err = RecallError::Unsupported {
            operation: "delete".into(),
            backend: BackendKind::ToolCall,
            hint: Some("use reinforce with a negative boost".into()),
        };
        assert_eq!(
            err.to_string(),
            "delete is not supported by the tool-call backend: use reinforce with a negative boost"
        );
    }

    #[test]
    fn validation_message_is_verbatim() {
        let err = RecallError::Validation("content is required".into());
        assert_eq!(err.to_string(), "content is required");
    }
}
