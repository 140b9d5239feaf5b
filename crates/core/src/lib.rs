//! SoundForge domain types and pure tracking logic.
//!
//! This crate holds everything the job tracker needs that does not touch
//! the network or the async runtime:
//!
//! - [`job`] — job status enum, status reports, and the reconciliation
//!   rule that drives the per-job state machine.
//! - [`request`] — the validated audio-generation request payload.
//! - [`console`] — the session console: an append-only, leveled,
//!   bounded log sink.
//! - [`error`] — the shared domain error type.

pub mod console;
pub mod error;
pub mod job;
pub mod request;
pub mod types;

pub use console::{Console, LogEntry, LogLevel};
pub use error::CoreError;
pub use job::{reconcile, JobRecord, JobStatus, Reconciliation, StatusReport};
pub use request::GenerateRequest;
