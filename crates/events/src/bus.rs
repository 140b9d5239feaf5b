//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans [`TrackerEvent`]s out to any number of subscribers.
//! The tracker publishes exactly one event per job transition; a
//! presentation layer renders them as user notifications.

use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// TrackerEvent
// ---------------------------------------------------------------------------

/// A job lifecycle event emitted by the tracker session.
///
/// Terminal events (`JobCompleted`, `JobFailed`, `JobCancelled`) fire at
/// most once per job; the registry's absorbing terminal states guarantee
/// re-applying a stale status report emits nothing.
#[derive(Debug, Clone, Serialize)]
pub enum TrackerEvent {
    /// A submission was accepted and the job entered the queue.
    JobQueued { filename: String, prompt: String },

    /// The artifact was generated and confirmed to exist.
    JobCompleted {
        filename: String,
        prompt: String,
        file_url: String,
    },

    /// The service reported a generation failure.
    JobFailed { filename: String, prompt: String },

    /// The user canceled the job.
    JobCancelled { filename: String },

    /// A submission attempt failed before a job was created.
    SubmitFailed { error: String },
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`TrackerEvent`].
pub struct EventBus {
    sender: broadcast::Sender<TrackerEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed events are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped -- the tracker
    /// does not require anyone to be listening.
    pub fn publish(&self, event: TrackerEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
