//! Error types for the Web Help Desk client.
//!
//! This module defines `WhdError`, the unified error type returned by every
//! client operation.
//!
//! # Security
//!
//! Web Help Desk authenticates through query parameters, so credentials end up
//! inside request URLs and can surface in transport errors. Use
//! `sanitize_message()` (or `WhdClient::sanitize_error`) before logging or
//! displaying anything that came back from the network.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Maximum length for response bodies carried inside errors.
pub const MAX_ERROR_BODY_LEN: usize = 500;

/// Unified error type for all Web Help Desk operations.
#[derive(Error, Debug)]
pub enum WhdError {
    /// Missing or malformed configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never got a response (connect, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Building the reqwest client failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Non-success status without a more specific mapping.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The (sanitized, truncated) response body.
        body: String,
    },

    /// Request timed out.
    #[error("request timed out after {duration:?} ({operation})")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// The server answered 429.
    #[error("rate limited by server - please wait before retrying")]
    RateLimited {
        /// Suggested retry delay, if provided by server.
        retry_after: Option<Duration>,
    },

    /// Server temporarily unavailable (HTTP 5xx other than 501).
    #[error("service temporarily unavailable ({status})")]
    ServiceUnavailable {
        /// The specific status code.
        status: reqwest::StatusCode,
    },

    /// The server answered 404.
    #[error("not found: {resource}")]
    NotFound {
        /// Description of the resource that was not found.
        resource: String,
    },

    /// Authentication failed - bad API key, password or expired session.
    #[error("authentication failed - check WHD credentials")]
    Authentication,

    /// Serializing an outbound payload failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server answered with something that is not the expected JSON.
    #[error("invalid JSON from WHD: {source}: {body}")]
    Decode {
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
        /// The (sanitized, truncated) response body.
        body: String,
    },

    /// Web Help Desk refused the operation and explained why.
    #[error("rejected by WHD: {reason}")]
    Rejected {
        /// The `reason` field from the response.
        reason: String,
    },

    /// Opening or closing a session failed.
    #[error("session error: {0}")]
    Session(String),

    /// The response parsed but lacked a field we need.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Reading or removing a local file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Input refused before any request was sent.
    #[error("validation error: {0}")]
    Validation(String),
}

impl WhdError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        WhdError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        WhdError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        WhdError::Validation(message.into())
    }

    /// Creates a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        WhdError::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        WhdError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates a rejection error from a server-supplied reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        WhdError::Rejected {
            reason: reason.into(),
        }
    }

    /// Creates a session error.
    pub fn session(message: impl Into<String>) -> Self {
        WhdError::Session(message.into())
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        WhdError::InvalidResponse(message.into())
    }

    /// Returns true if this error is transient and the operation should be retried.
    ///
    /// Retryable errors include:
    /// - Rate limiting (HTTP 429)
    /// - Server errors (HTTP 5xx except 501 Not Implemented)
    /// - Timeouts and connection failures
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            WhdError::RateLimited { .. } => true,
            WhdError::ServiceUnavailable { .. } => true,
            WhdError::Timeout { .. } => true,
            WhdError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            WhdError::HttpStatus { status, .. } => {
                status.as_u16() == 429
                    || (status.is_server_error() && *status != reqwest::StatusCode::NOT_IMPLEMENTED)
            }
            _ => false,
        }
    }

    /// Returns true for a 429, mapped or raw.
    #[must_use]
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, WhdError::RateLimited { .. })
            || matches!(self, WhdError::HttpStatus { status, .. } if status.as_u16() == 429)
    }

    /// Returns the delay the server asked for, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            WhdError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Replaces every occurrence of each secret in `message` with `[REDACTED]`.
    ///
    /// Empty secrets are ignored.
    #[must_use]
    pub fn sanitize_message(message: &str, secrets: &[&str]) -> String {
        secrets
            .iter()
            .filter(|s| !s.is_empty())
            .fold(message.to_string(), |acc, secret| {
                acc.replace(secret, "[REDACTED]")
            })
    }

    /// Display message with `secrets` redacted.
    #[must_use]
    pub fn sanitized_display(&self, secrets: &[&str]) -> String {
        Self::sanitize_message(&self.to_string(), secrets)
    }

    /// Sanitizes and truncates a response body before it is stored in an error.
    pub(crate) fn clip_body(body: &str, secrets: &[&str]) -> String {
        let body = Self::sanitize_message(body, secrets);
        if body.len() > MAX_ERROR_BODY_LEN {
            let mut end = MAX_ERROR_BODY_LEN;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...[truncated]", &body[..end])
        } else {
            body
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_error() {
        let err = WhdError::missing_env("WHD_API_KEY");
        assert!(err.to_string().contains("WHD_API_KEY"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_rejected_error() {
        let err = WhdError::rejected("Ticket 99 does not exist");
        assert_eq!(err.to_string(), "rejected by WHD: Ticket 99 does not exist");
    }

    #[test]
    fn test_timeout_error() {
        let err = WhdError::timeout(Duration::from_secs(30), "GET Ticket/1");
        let msg = err.to_string();
        assert!(msg.contains("timed out"));
        assert!(msg.contains("30s"));
    }

    #[test]
    fn test_is_retryable_rate_limited() {
        let err = WhdError::RateLimited { retry_after: None };
        assert!(err.is_retryable());
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_is_retryable_service_unavailable() {
        let err = WhdError::ServiceUnavailable {
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        assert!(err.is_retryable());
        assert!(!err.is_rate_limit());
    }

    #[test]
    fn test_not_implemented_is_not_retryable() {
        let err = WhdError::HttpStatus {
            status: reqwest::StatusCode::NOT_IMPLEMENTED,
            body: String::new(),
        };
        assert!(!err.is_retryable());

        let err = WhdError::HttpStatus {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        assert!(!WhdError::not_found("Ticket/1").is_retryable());
        assert!(!WhdError::Authentication.is_retryable());
        assert!(!WhdError::rejected("nope").is_retryable());
        assert!(!WhdError::validation("bad").is_retryable());
    }

    #[test]
    fn test_sanitize_message_removes_all_secrets() {
        let message = "GET /ra/Tickets?username=bob&password=hunter2&apiKey=k3y failed";
        let sanitized = WhdError::sanitize_message(message, &["hunter2", "k3y"]);
        assert!(!sanitized.contains("hunter2"));
        assert!(!sanitized.contains("k3y"));
        assert!(sanitized.contains("username=bob"));
        assert_eq!(sanitized.matches("[REDACTED]").count(), 2);
    }

    #[test]
    fn test_sanitize_message_ignores_empty_secret() {
        let message = "Some error message";
        assert_eq!(WhdError::sanitize_message(message, &[""]), message);
    }

    #[test]
    fn test_clip_body_truncates() {
        let body = "x".repeat(MAX_ERROR_BODY_LEN + 20);
        let clipped = WhdError::clip_body(&body, &[]);
        assert!(clipped.ends_with("...[truncated]"));
        assert_eq!(clipped.len(), MAX_ERROR_BODY_LEN + "...[truncated]".len());
    }

    #[test]
    fn test_clip_body_respects_char_boundaries() {
        let body = format!("{}é", "a".repeat(MAX_ERROR_BODY_LEN - 1));
        let clipped = WhdError::clip_body(&body, &[]);
        assert!(clipped.starts_with(&"a".repeat(MAX_ERROR_BODY_LEN - 1)));
        assert!(clipped.ends_with("...[truncated]"));
    }

    #[test]
    fn test_retry_after_rate_limited() {
        let err = WhdError::RateLimited {
            retry_after: Some(Duration::from_secs(5)),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(5)));
        assert_eq!(WhdError::Authentication.retry_after(), None);
    }
}
