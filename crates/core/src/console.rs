//! The session console: an append-only, timestamped, leveled log sink.
//!
//! The console is the user-visible event record consumed by a display
//! surface. It is distinct from `tracing`, which is the developer-facing
//! layer -- terminal job transitions write to both.
//!
//! Growth is bounded by a ring buffer; when full, the oldest entries are
//! evicted so `append` always succeeds. Sessions are short-lived and the
//! console is never persisted.

use std::collections::VecDeque;

use chrono::Utc;
use serde::Serialize;

use crate::types::Timestamp;

/// Default ring-buffer capacity.
pub const DEFAULT_CONSOLE_CAPACITY: usize = 1000;

/// Severity of a console entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One console line. Entries are never mutated after append.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }

    /// Render as the display surface shows it: `[HH:MM:SS] LEVEL: message`.
    pub fn render(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.level,
            self.message
        )
    }
}

/// Bounded append-only log, created empty at session start.
#[derive(Debug)]
pub struct Console {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Console {
    /// Create a console bounded at `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append an entry, evicting the oldest if the buffer is full.
    pub fn append(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry::now(level, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.append(LogLevel::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.append(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.append(LogLevel::Error, message);
    }

    /// Empty the console, leaving one self-describing entry so the clear
    /// action itself stays auditable.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.info("Console cleared by user");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CONSOLE_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
