//! REST API client for the SoundForge HTTP endpoints.
//!
//! Wraps the service HTTP API (submission, status polling, cancellation,
//! version diagnostics) using [`reqwest`]. All paths are resolved against
//! a single configurable base URL.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use soundforge_core::{GenerateRequest, JobStatus, StatusReport};

use crate::error::{ApiError, ServiceErrorBody};
use crate::service::AudioService;

/// Default per-request timeout. A hung call surfaces as a transport
/// error instead of stalling its job's reconciliation indefinitely.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a single SoundForge service.
pub struct AudioApi {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

/// Response returned by `POST /generate-audio` after successfully
/// queuing a job.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    /// Always `queued` on success.
    pub status: JobStatus,
    /// Server-assigned identifier for the job.
    pub filename: String,
    /// Where the artifact will be served from once generated.
    #[serde(default)]
    pub file_url: Option<String>,
    /// Optional human-readable confirmation.
    #[serde(default)]
    pub message: Option<String>,
    /// Position in the generation queue at submit time.
    #[serde(default)]
    pub queue_position: Option<u32>,
}

impl AudioApi {
    /// Create a new API client.
    ///
    /// * `base_url` - service base, e.g. `http://localhost:8000/api`.
    ///   A trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create an API client with a specific per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            request_timeout,
        }
    }

    /// Service base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or an [`ApiError::Service`] carrying the
    /// parsed (or degraded) error body on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<ServiceErrorBody>(&text)
                .unwrap_or_else(|_| ServiceErrorBody::from_raw(text));
            return Err(ApiError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl AudioService for AudioApi {
    /// Submit a generation request via `POST /generate-audio`.
    ///
    /// Preconditions are enforced by the form layer, but re-checked here:
    /// a request that violates them is rejected without touching the
    /// network.
    async fn submit(&self, request: &GenerateRequest) -> Result<SubmitResponse, ApiError> {
        request
            .validate_bounds()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let response = self
            .client
            .post(self.endpoint("generate-audio"))
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await?;

        let submitted: SubmitResponse = Self::parse_response(response).await?;
        tracing::info!(
            filename = %submitted.filename,
            queue_position = submitted.queue_position,
            "Generation request queued",
        );
        Ok(submitted)
    }

    /// Fetch job status via `GET /status/{filename}`.
    async fn status(&self, filename: &str) -> Result<StatusReport, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&format!("status/{filename}")))
            .timeout(self.request_timeout)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Request cancellation via `POST /cancel-audio/{filename}`.
    async fn cancel(&self, filename: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(&format!("cancel-audio/{filename}")))
            .timeout(self.request_timeout)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Fetch diagnostic info via `GET /version`. The payload shape is
    /// deployment-specific, so it is passed through untyped.
    async fn version(&self) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .get(self.endpoint("version"))
            .timeout(self.request_timeout)
            .send()
            .await?;

        Self::parse_response(response).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
