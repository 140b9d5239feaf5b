//! In-memory job registry.
//!
//! The registry is the only owner of job records: every status change
//! flows through [`JobRegistry::apply_report`] (poll reconciliation) or
//! [`JobRegistry::cancel`] (explicit user action). Records are kept in
//! insertion order; whether a display surface shows them newest-first is
//! its own choice.

use soundforge_core::{reconcile, CoreError, JobRecord, JobStatus, Reconciliation, StatusReport};

/// Snapshot entry for one pending job, taken at tick start.
#[derive(Debug, Clone)]
pub struct PendingJob {
    pub filename: String,
    pub prompt: String,
}

/// Insertion-ordered collection of job records with unique filenames.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Vec<JobRecord>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a freshly-queued job.
    ///
    /// Filenames are server-assigned and unique; a duplicate is a
    /// conflict, not an update.
    pub fn insert_queued(
        &mut self,
        filename: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Result<(), CoreError> {
        let filename = filename.into();
        if self.find(&filename).is_some() {
            return Err(CoreError::Conflict(format!(
                "job {filename} is already tracked"
            )));
        }
        self.jobs.push(JobRecord::queued(filename, prompt.into()));
        Ok(())
    }

    pub fn get(&self, filename: &str) -> Option<&JobRecord> {
        self.jobs.iter().find(|j| j.filename == filename)
    }

    /// All records, oldest first.
    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Snapshot of the pending set -- the poller's work unit for one tick.
    pub fn pending(&self) -> Vec<PendingJob> {
        self.jobs
            .iter()
            .filter(|j| j.status.is_pending())
            .map(|j| PendingJob {
                filename: j.filename.clone(),
                prompt: j.prompt.clone(),
            })
            .collect()
    }

    /// Apply one status report to one job.
    ///
    /// On a transition the record is updated in place; a confirmed
    /// completion also captures the artifact URL from the report. The
    /// returned [`Reconciliation`] tells the caller whether side effects
    /// (events, console lines) should fire -- applying the same report to
    /// an already-terminal job yields `Unchanged` and therefore nothing.
    pub fn apply_report(
        &mut self,
        filename: &str,
        report: &StatusReport,
    ) -> Result<Reconciliation, CoreError> {
        let job = self
            .find_mut(filename)
            .ok_or_else(|| CoreError::NotFound(filename.to_string()))?;

        let outcome = reconcile(job.status, report);
        if let Reconciliation::Transition(next) = outcome {
            job.status = next;
            if next == JobStatus::Complete {
                job.file_url = report.file_url.clone();
            }
        }
        Ok(outcome)
    }

    /// Cancel a job locally.
    ///
    /// Returns `true` if the job transitioned to `canceled`, `false` if
    /// it was already terminal (idempotent no-op).
    pub fn cancel(&mut self, filename: &str) -> Result<bool, CoreError> {
        let job = self
            .find_mut(filename)
            .ok_or_else(|| CoreError::NotFound(filename.to_string()))?;

        if job.status.is_terminal() {
            return Ok(false);
        }
        job.status = JobStatus::Canceled;
        Ok(true)
    }

    fn find(&self, filename: &str) -> Option<&JobRecord> {
        self.jobs.iter().find(|j| j.filename == filename)
    }

    fn find_mut(&mut self, filename: &str) -> Option<&mut JobRecord> {
        self.jobs.iter_mut().find(|j| j.filename == filename)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
