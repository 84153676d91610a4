//! Progress/diagnostics sink.
//!
//! The client never prints. Anything a user should see during a long
//! operation (deprecation warnings, for instance) goes to an injected
//! [`ProgressReporter`].

pub mod messages;

use std::sync::Mutex;

/// Receives human-readable issue notifications.
pub trait ProgressReporter: Send + Sync {
    /// Report an issue the user should know about.
    fn report_issue(&self, message: &str);
}

/// Forwards issues to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report_issue(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Keeps every reported issue in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    issues: Mutex<Vec<String>>,
}

impl CollectingReporter {
    /// Create empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of reported issues, oldest first
    pub fn issues(&self) -> Vec<String> {
        self.issues
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of reported issues
    pub fn len(&self) -> usize {
        self.issues
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Check if nothing was reported
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProgressReporter for CollectingReporter {
    fn report_issue(&self, message: &str) {
        self.issues
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_reporter() {
        let reporter = CollectingReporter::new();
        assert!(reporter.is_empty());

        reporter.report_issue("first");
        reporter.report_issue("second");

        assert_eq!(reporter.len(), 2);
        assert_eq!(reporter.issues(), vec!["first", "second"]);
    }
}
