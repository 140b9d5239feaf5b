//! Job lifecycle types and the status reconciliation rule.
//!
//! A job moves through `queued -> generating -> {complete|error}` driven by
//! status reports polled from the generation service, or jumps to `canceled`
//! via an explicit user action. Terminal states are absorbing: once a job is
//! complete, canceled, or errored, no report moves it again.
//!
//! [`reconcile`] is the single place that decides what a status report means
//! for a job. Keeping it pure lets the registry apply it under its lock and
//! lets side effects (events, console lines) fire exactly once per
//! transition.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Job status
// ---------------------------------------------------------------------------

/// Lifecycle state of a single generation job.
///
/// Serialized lowercase on the wire (`"queued"`, `"generating"`, ...),
/// matching the service's status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted by the service, waiting for a worker.
    Queued,
    /// A worker is producing the audio.
    Generating,
    /// Finished and the artifact is confirmed to exist.
    Complete,
    /// Canceled by the user before completion.
    Canceled,
    /// The service reported a generation failure.
    Error,
}

impl JobStatus {
    /// Terminal states never change again and are excluded from polling.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Canceled | Self::Error)
    }

    /// Pending jobs form the poller's per-tick work unit.
    pub fn is_pending(self) -> bool {
        !self.is_terminal()
    }

    /// The lowercase wire name, for log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Generating => "generating",
            Self::Complete => "complete",
            Self::Canceled => "canceled",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Status reports
// ---------------------------------------------------------------------------

/// Payload of `GET /status/{filename}`.
///
/// `file_exists` and `file_url` are only meaningful when the service
/// reports `complete`; the service omits them otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,
    #[serde(default)]
    pub file_exists: Option<bool>,
    #[serde(default)]
    pub file_url: Option<String>,
}

impl StatusReport {
    /// A report that only carries a status.
    pub fn status_only(status: JobStatus) -> Self {
        Self {
            status,
            file_exists: None,
            file_url: None,
        }
    }

    /// Whether the report announces a completion whose artifact the
    /// service has confirmed on disk.
    pub fn is_confirmed_completion(&self) -> bool {
        self.status == JobStatus::Complete && self.file_exists == Some(true)
    }
}

// ---------------------------------------------------------------------------
// Job record
// ---------------------------------------------------------------------------

/// One tracked generation job.
///
/// `filename` is the server-assigned identifier and is unique within a
/// registry. `file_url` is filled in when the job reaches `complete`.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub filename: String,
    pub prompt: String,
    pub status: JobStatus,
    pub file_url: Option<String>,
}

impl JobRecord {
    /// Create a freshly-queued record, as returned by a successful submit.
    pub fn queued(filename: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            prompt: prompt.into(),
            status: JobStatus::Queued,
            file_url: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Outcome of applying one status report to one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Nothing changed. Applying the same report again is a no-op, so
    /// side effects keyed on transitions cannot double-fire.
    Unchanged,
    /// The job moved to a new status.
    Transition(JobStatus),
    /// The service said `complete` but did not confirm the artifact
    /// exists. The job stays pending and is re-polled next tick.
    DeferredCompletion,
}

/// Decide what a status report means for a job currently in `current`.
///
/// Rules:
/// - terminal `current` absorbs everything (`Unchanged`);
/// - `complete` transitions only with a confirmed artifact, otherwise the
///   completion is deferred;
/// - `error` and `generating` reports transition a pending job;
/// - a `queued` or `canceled` report never moves a pending job -- the
///   service cannot re-queue, and cancellation is a local operation.
pub fn reconcile(current: JobStatus, report: &StatusReport) -> Reconciliation {
    if current.is_terminal() {
        return Reconciliation::Unchanged;
    }

    match report.status {
        JobStatus::Complete => {
            if report.is_confirmed_completion() {
                Reconciliation::Transition(JobStatus::Complete)
            } else {
                Reconciliation::DeferredCompletion
            }
        }
        JobStatus::Error => Reconciliation::Transition(JobStatus::Error),
        JobStatus::Generating if current == JobStatus::Queued => {
            Reconciliation::Transition(JobStatus::Generating)
        }
        // Same status, or a report that cannot move a pending job.
        _ => Reconciliation::Unchanged,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
