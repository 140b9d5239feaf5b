//! The audio-generation request payload and its preconditions.

use serde::Serialize;
use validator::Validate;

use crate::error::CoreError;

/// Shortest generation the service accepts, in seconds.
pub const MIN_DURATION_SECS: u32 = 10;
/// Longest generation the service accepts, in seconds.
pub const MAX_DURATION_SECS: u32 = 60;

/// Body of `POST /generate-audio`.
///
/// The form layer enforces these preconditions before submission; the
/// client re-checks them via [`GenerateRequest::validate_bounds`] so an
/// invalid request is never dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct GenerateRequest {
    /// Free-text description of the audio to generate.
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub prompt: String,

    /// Requested clip length in seconds.
    #[validate(range(min = 10, max = 60, message = "duration must be between 10 and 60 seconds"))]
    pub duration: u32,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>, duration: u32) -> Self {
        Self {
            prompt: prompt.into(),
            duration,
        }
    }

    /// Check preconditions, mapping validator output to a [`CoreError`].
    ///
    /// A whitespace-only prompt counts as empty.
    pub fn validate_bounds(&self) -> Result<(), CoreError> {
        if self.prompt.trim().is_empty() {
            return Err(CoreError::Validation("prompt must not be empty".into()));
        }
        self.validate().map_err(|e| {
            let msg = e
                .field_errors()
                .into_iter()
                .flat_map(|(_, errs)| errs.iter())
                .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
                .collect::<Vec<_>>()
                .join("; ");
            CoreError::Validation(msg)
        })
    }
}
