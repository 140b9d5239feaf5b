//! The service trait the tracker depends on.
//!
//! [`AudioApi`](crate::AudioApi) is the production implementation; tests
//! drive the tracker with a scripted mock instead of a live server.

use async_trait::async_trait;
use soundforge_core::{GenerateRequest, StatusReport};

use crate::api::SubmitResponse;
use crate::error::ApiError;

/// Outbound operations against the audio-generation service.
#[async_trait]
pub trait AudioService: Send + Sync {
    /// Submit a generation request. Preconditions (non-empty prompt,
    /// duration bounds) are checked before anything is sent.
    async fn submit(&self, request: &GenerateRequest) -> Result<SubmitResponse, ApiError>;

    /// Fetch the current status of a job.
    async fn status(&self, filename: &str) -> Result<StatusReport, ApiError>;

    /// Ask the service to cancel a queued or running job.
    async fn cancel(&self, filename: &str) -> Result<(), ApiError>;

    /// Diagnostic version/build info, passed through for display.
    async fn version(&self) -> Result<serde_json::Value, ApiError>;
}
