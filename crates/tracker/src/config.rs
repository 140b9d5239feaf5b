use std::time::Duration;

use soundforge_core::console::DEFAULT_CONSOLE_CAPACITY;

/// Tracker configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Base URL of the generation service API (default:
    /// `http://localhost:8000/api`). All endpoint paths are resolved
    /// relative to it.
    pub api_base: String,
    /// Period of the status-polling loop (default: 2 seconds).
    pub poll_interval: Duration,
    /// Per-request HTTP timeout (default: 10 seconds). A poll that
    /// exceeds it is treated as a transient transport failure.
    pub request_timeout: Duration,
    /// Maximum number of console entries retained (default: 1000).
    pub console_capacity: usize,
}

impl TrackerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `SOUNDFORGE_API_BASE`  | `http://localhost:8000/api` |
    /// | `POLL_INTERVAL_SECS`   | `2`                         |
    /// | `REQUEST_TIMEOUT_SECS` | `10`                        |
    /// | `CONSOLE_CAPACITY`     | `1000`                      |
    pub fn from_env() -> Self {
        let api_base = std::env::var("SOUNDFORGE_API_BASE")
            .unwrap_or_else(|_| "http://localhost:8000/api".into());

        let poll_interval_secs: u64 = std::env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "2".into())
            .parse()
            .expect("POLL_INTERVAL_SECS must be a valid u64");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let console_capacity: usize = std::env::var("CONSOLE_CAPACITY")
            .unwrap_or_else(|_| DEFAULT_CONSOLE_CAPACITY.to_string())
            .parse()
            .expect("CONSOLE_CAPACITY must be a valid usize");

        Self {
            api_base,
            poll_interval: Duration::from_secs(poll_interval_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
            console_capacity,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000/api".into(),
            poll_interval: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            console_capacity: DEFAULT_CONSOLE_CAPACITY,
        }
    }
}
