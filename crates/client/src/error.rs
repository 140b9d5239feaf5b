//! Uniform error shape for outbound service calls.

use serde::Deserialize;

/// Structured error payload returned by the service on non-2xx responses.
///
/// The service is not entirely consistent about which fields it fills in,
/// so everything past `error` is optional. A body that is not JSON at all
/// degrades via [`ServiceErrorBody::from_raw`].
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    /// Short machine-ish error description. Always present in structured
    /// bodies.
    pub error: String,
    /// Human-readable message, when the service provides one.
    #[serde(default)]
    pub message: Option<String>,
    /// Stack trace or extended diagnostics (debug deployments only).
    #[serde(default)]
    pub detail: Option<String>,
    /// Actionable hint for the user ("try a shorter prompt").
    #[serde(default)]
    pub suggest: Option<String>,
}

impl ServiceErrorBody {
    /// Wrap an unstructured (non-JSON) response body.
    pub fn from_raw(text: impl Into<String>) -> Self {
        Self {
            error: text.into(),
            message: None,
            detail: None,
            suggest: None,
        }
    }

    /// The best human-readable description available.
    pub fn display_message(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.error)
    }
}

/// Errors from the SoundForge REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A precondition was violated before any network call was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The HTTP request itself failed (network, DNS, timeout) or the
    /// response body was not the JSON the contract promises.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status and a structured body.
    #[error("Service error ({status}): {}", .body.display_message())]
    Service {
        /// HTTP status code.
        status: u16,
        /// Parsed (or degraded) error payload.
        body: ServiceErrorBody,
    },
}

impl ApiError {
    /// Whether this failure happened before a request was dispatched.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
