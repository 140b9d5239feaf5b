//! Session-scoped tracking context.
//!
//! A [`Session`] owns every piece of mutable tracker state -- the job
//! registry, the console, the last-failed-request slot, and the most
//! recent artifact -- and is created/torn down explicitly at session
//! boundaries. All state is ephemeral; nothing survives a restart.
//!
//! Created once via [`Session::start`], then cheaply cloned as an `Arc`
//! into whatever surface drives it. [`Session::shutdown`] cancels the
//! poller so no tick fires after the owning view is gone.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use soundforge_client::{ApiError, AudioService};
use soundforge_core::{
    Console, CoreError, GenerateRequest, JobRecord, JobStatus, LogEntry, Reconciliation,
    StatusReport,
};
use soundforge_events::{EventBus, TrackerEvent};

use crate::config::TrackerConfig;
use crate::poller;
use crate::registry::{JobRegistry, PendingJob};
use crate::retry::{preview, FailedRequest};

/// How long `shutdown` waits for the poller task to exit.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// The most recent confirmed generation artifact, exposed for playback.
#[derive(Debug, Clone)]
pub struct GeneratedAudio {
    pub filename: String,
    pub url: String,
}

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A domain-level failure (validation, duplicate job, unknown job).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A transport or service failure from the API client.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Client-side orchestrator for audio-generation jobs.
///
/// All status changes flow through the poller's reconciliation or the
/// explicit [`cancel`](Session::cancel) operation; side effects (events,
/// console lines) fire exactly once per transition because terminal
/// states absorb every later report.
pub struct Session {
    id: Uuid,
    service: Arc<dyn AudioService>,
    config: TrackerConfig,
    registry: RwLock<JobRegistry>,
    console: Mutex<Console>,
    last_failed: Mutex<Option<FailedRequest>>,
    latest_artifact: RwLock<Option<GeneratedAudio>>,
    events: EventBus,
    /// Cancelled during shutdown; the poller loop watches it.
    cancel: CancellationToken,
    poller_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Create a session without starting the polling loop.
    ///
    /// Useful when the embedding surface drives reconciliation itself
    /// via [`poll_pending_once`](Session::poll_pending_once); most
    /// callers want [`start`](Session::start) instead.
    pub fn new(service: Arc<dyn AudioService>, config: TrackerConfig) -> Arc<Self> {
        let id = Uuid::new_v4();
        tracing::info!(session_id = %id, api_base = %config.api_base, "Tracker session created");

        Arc::new(Self {
            id,
            service,
            console: Mutex::new(Console::with_capacity(config.console_capacity)),
            config,
            registry: RwLock::new(JobRegistry::new()),
            last_failed: Mutex::new(None),
            latest_artifact: RwLock::new(None),
            events: EventBus::default(),
            cancel: CancellationToken::new(),
            poller_handle: Mutex::new(None),
        })
    }

    /// Create a session and start its polling loop.
    pub async fn start(service: Arc<dyn AudioService>, config: TrackerConfig) -> Arc<Self> {
        let session = Self::new(service, config);

        let handle = tokio::spawn(poller::run(
            Arc::clone(&session),
            session.config.poll_interval,
            session.cancel.child_token(),
        ));
        *session.poller_handle.lock().await = Some(handle);

        session
    }

    /// Unique identifier of this session, for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Subscribe to job lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.events.subscribe()
    }

    // ---- submission ----

    /// Submit a generation request and track the resulting job.
    ///
    /// Returns the server-assigned filename. A validation failure is
    /// rejected before any network call and is not captured as
    /// retryable; transport and service failures are captured in the
    /// last-failed-request slot for [`retry`](Session::retry).
    pub async fn submit(&self, prompt: &str, duration: u32) -> Result<String, SessionError> {
        let request = GenerateRequest::new(prompt, duration);
        request.validate_bounds()?;

        {
            let mut console = self.console.lock().await;
            console.info("Sending audio generation request to backend");
            console.info(format!("Prompt ({duration}s): \"{}\"", preview(prompt, 100)));
        }

        match self.service.submit(&request).await {
            Ok(accepted) => {
                self.registry
                    .write()
                    .await
                    .insert_queued(accepted.filename.as_str(), prompt)?;

                {
                    let mut console = self.console.lock().await;
                    console.info(format!("Audio generation queued: {}", accepted.filename));
                    if let Some(url) = &accepted.file_url {
                        console.info(format!("File URL will be: {url}"));
                    }
                }

                tracing::info!(
                    session_id = %self.id,
                    filename = %accepted.filename,
                    "Job queued",
                );
                self.events.publish(TrackerEvent::JobQueued {
                    filename: accepted.filename.clone(),
                    prompt: prompt.to_string(),
                });
                Ok(accepted.filename)
            }
            Err(err) => {
                if !err.is_validation() {
                    *self.last_failed.lock().await = Some(FailedRequest::new(prompt, duration));
                }

                {
                    let mut console = self.console.lock().await;
                    console.error(format!("Audio generation request failed: {err}"));
                    if let ApiError::Service { body, .. } = &err {
                        if let Some(suggest) = &body.suggest {
                            console.info(format!("Suggestion: {suggest}"));
                        }
                    }
                    console.info("Retry is available for the last failed request");
                }

                tracing::warn!(session_id = %self.id, error = %err, "Submission failed");
                self.events.publish(TrackerEvent::SubmitFailed {
                    error: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// Re-submit the last failed request with identical parameters.
    ///
    /// The slot is cleared when the retry is dispatched, not when it
    /// succeeds -- a failing retry re-captures it. Returns `Ok(None)`
    /// without any network call when nothing failed before.
    pub async fn retry(&self) -> Result<Option<String>, SessionError> {
        let Some(failed) = self.last_failed.lock().await.take() else {
            tracing::debug!(session_id = %self.id, "Retry requested with nothing to retry");
            return Ok(None);
        };

        self.console.lock().await.info(format!(
            "Retrying failed request: \"{}\"",
            failed.prompt_preview()
        ));

        let filename = self.submit(&failed.prompt, failed.duration).await?;
        Ok(Some(filename))
    }

    // ---- cancellation ----

    /// Cancel a tracked job.
    ///
    /// The local record is marked `canceled` immediately and excluded
    /// from the next pending-set snapshot; the remote cancel call is
    /// best-effort and a failure does not roll the local state back.
    /// Canceling an already-terminal job is a no-op.
    pub async fn cancel(&self, filename: &str) -> Result<(), SessionError> {
        let transitioned = self.registry.write().await.cancel(filename)?;
        if !transitioned {
            tracing::debug!(filename, "Cancel requested for terminal job");
            return Ok(());
        }

        self.console
            .lock()
            .await
            .info(format!("Audio generation canceled: {filename}"));
        self.events.publish(TrackerEvent::JobCancelled {
            filename: filename.to_string(),
        });

        if let Err(e) = self.service.cancel(filename).await {
            tracing::warn!(filename, error = %e, "Remote cancel failed");
            self.console
                .lock()
                .await
                .warning(format!("Remote cancel for {filename} failed: {e}"));
        }
        Ok(())
    }

    // ---- reconciliation ----

    /// Snapshot of the pending set for one tick.
    pub(crate) async fn pending_snapshot(&self) -> Vec<PendingJob> {
        self.registry.read().await.pending()
    }

    /// Poll every pending job once and apply the results.
    ///
    /// This is the body of one poller tick, exposed so tests and
    /// embedding surfaces can drive reconciliation deterministically.
    /// Per-job failures are isolated: one failed poll never affects the
    /// others, and the failing job simply stays pending.
    pub async fn poll_pending_once(&self) {
        let pending = self.pending_snapshot().await;
        if pending.is_empty() {
            return;
        }
        tracing::debug!(
            session_id = %self.id,
            count = pending.len(),
            "Polling status for pending jobs",
        );
        futures::future::join_all(
            pending
                .into_iter()
                .map(|job| self.poll_one(job.filename)),
        )
        .await;
    }

    /// Poll one job and reconcile the outcome.
    pub(crate) async fn poll_one(&self, filename: String) {
        match self.service.status(&filename).await {
            Ok(report) => self.apply_report(&filename, &report).await,
            Err(err) => {
                // Transport failure during polling is never fatal: log it
                // and let the next tick retry.
                tracing::warn!(filename = %filename, error = %err, "Status poll failed");
                self.console
                    .lock()
                    .await
                    .error(format!("Failed to poll status for {filename}: {err}"));
            }
        }
    }

    /// Apply a status report to a job and fire transition side effects.
    pub(crate) async fn apply_report(&self, filename: &str, report: &StatusReport) {
        let (outcome, record) = {
            let mut registry = self.registry.write().await;
            match registry.apply_report(filename, report) {
                Ok(outcome) => (outcome, registry.get(filename).cloned()),
                Err(e) => {
                    tracing::warn!(filename, error = %e, "Dropping report for unknown job");
                    return;
                }
            }
        };
        let Some(record) = record else { return };

        match outcome {
            Reconciliation::Transition(JobStatus::Complete) => {
                let url = record.file_url.clone().unwrap_or_default();
                *self.latest_artifact.write().await = Some(GeneratedAudio {
                    filename: record.filename.clone(),
                    url: url.clone(),
                });

                self.console.lock().await.info(format!(
                    "Audio generation completed successfully: {filename}"
                ));
                tracing::info!(session_id = %self.id, filename, "Job completed");
                self.events.publish(TrackerEvent::JobCompleted {
                    filename: record.filename,
                    prompt: record.prompt,
                    file_url: url,
                });
            }
            Reconciliation::Transition(JobStatus::Error) => {
                {
                    let mut console = self.console.lock().await;
                    console.error(format!("Audio generation failed: {filename}"));
                    console.info("You can retry the request from the form");
                }
                tracing::warn!(session_id = %self.id, filename, "Job failed");
                self.events.publish(TrackerEvent::JobFailed {
                    filename: record.filename,
                    prompt: record.prompt,
                });
            }
            Reconciliation::Transition(next) => {
                self.console.lock().await.info(format!(
                    "Status update for {filename}: queued -> {next}"
                ));
            }
            Reconciliation::DeferredCompletion => {
                tracing::debug!(
                    filename,
                    "Completion reported without a confirmed artifact; keeping job pending",
                );
            }
            Reconciliation::Unchanged => {
                tracing::debug!(filename, status = %record.status, "Status unchanged");
            }
        }
    }

    // ---- accessors ----

    /// All tracked jobs, oldest first.
    pub async fn jobs(&self) -> Vec<JobRecord> {
        self.registry.read().await.jobs().to_vec()
    }

    /// Current console contents, oldest first.
    pub async fn console_entries(&self) -> Vec<LogEntry> {
        self.console.lock().await.entries()
    }

    /// Empty the console (one audit entry remains).
    pub async fn clear_console(&self) {
        self.console.lock().await.clear();
    }

    /// The most recent confirmed artifact, if any job completed.
    pub async fn latest_artifact(&self) -> Option<GeneratedAudio> {
        self.latest_artifact.read().await.clone()
    }

    /// The captured last-failed request, if any.
    pub async fn last_failed_request(&self) -> Option<FailedRequest> {
        self.last_failed.lock().await.clone()
    }

    /// Service diagnostics, passed through for display.
    pub async fn service_version(&self) -> Result<serde_json::Value, SessionError> {
        Ok(self.service.version().await?)
    }

    // ---- teardown ----

    /// Stop the poller and tear the session down.
    ///
    /// After this returns no further tick fires; in-flight polls finish
    /// against a registry that no longer changes.
    pub async fn shutdown(&self) {
        tracing::info!(session_id = %self.id, "Shutting down tracker session");
        self.cancel.cancel();

        if let Some(handle) = self.poller_handle.lock().await.take() {
            let _ = tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await;
        }
    }
}
