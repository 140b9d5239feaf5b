//! The last-failed-request slot.
//!
//! Only the most recent submission failure is retryable: every new
//! failure overwrites the slot, and dispatching a retry clears it
//! optimistically (a failing retry simply re-captures it).

use soundforge_core::GenerateRequest;

/// A submission captured verbatim at the moment it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRequest {
    pub prompt: String,
    pub duration: u32,
}

impl FailedRequest {
    pub fn new(prompt: impl Into<String>, duration: u32) -> Self {
        Self {
            prompt: prompt.into(),
            duration,
        }
    }

    /// Rebuild the exact request that failed.
    pub fn to_request(&self) -> GenerateRequest {
        GenerateRequest::new(self.prompt.clone(), self.duration)
    }

    /// Short prompt excerpt for log lines.
    pub fn prompt_preview(&self) -> String {
        preview(&self.prompt, 30)
    }
}

/// Truncate `text` to `max` characters with an ellipsis.
pub(crate) fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_into_an_identical_request() {
        let failed = FailedRequest::new("rain on a tin roof", 30);
        let request = failed.to_request();
        assert_eq!(request.prompt, "rain on a tin roof");
        assert_eq!(request.duration, 30);
    }

    #[test]
    fn preview_truncates_long_prompts() {
        let failed = FailedRequest::new("a".repeat(100), 30);
        let p = failed.prompt_preview();
        assert_eq!(p.chars().count(), 33); // 30 + "..."
        assert!(p.ends_with("..."));
    }

    #[test]
    fn preview_keeps_short_prompts_whole() {
        let failed = FailedRequest::new("thunder", 30);
        assert_eq!(failed.prompt_preview(), "thunder");
    }
}
