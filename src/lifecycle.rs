//! Endpoint lifecycle monitoring.
//!
//! Runs on every response (success, failure, and intermediate `202`s alike)
//! since endpoint deprecation is independent of the outcome of any single
//! call. Deprecation is informational and never fails the call carrying it.

use std::sync::Arc;

use http::HeaderMap;

use crate::progress::{messages, ProgressReporter};
use crate::protocol::{EndpointStatus, ENDPOINT_STATUS_HEADER};

/// Watches responses for the endpoint-status signal.
#[derive(Clone)]
pub struct EndpointMonitor {
    reporter: Arc<dyn ProgressReporter>,
    locale: String,
}

impl std::fmt::Debug for EndpointMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointMonitor")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl EndpointMonitor {
    /// Create monitor reporting to `reporter` in `locale`
    pub fn new(reporter: Arc<dyn ProgressReporter>, locale: impl Into<String>) -> Self {
        Self {
            reporter,
            locale: checked_locale(locale.into()),
        }
    }

    /// Switch the language of emitted messages
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = checked_locale(locale.into());
        self
    }

    /// Inspect one response's headers.
    ///
    /// Emits at most one notification per call.
    pub fn inspect(&self, headers: &HeaderMap) -> Option<EndpointStatus> {
        let status = EndpointStatus::from_headers(headers);

        match status {
            Some(EndpointStatus::Deprecated) => {
                tracing::warn!("Service endpoint reported as deprecated");
                self.reporter
                    .report_issue(messages::endpoint_deprecated(&self.locale));
            },
            Some(_) => {},
            None => {
                if let Some(raw) = headers.get(ENDPOINT_STATUS_HEADER) {
                    tracing::debug!(value = ?raw, "Ignoring unknown endpoint status");
                }
            },
        }

        status
    }
}

/// Keep the requested locale; unsupported ones are served in English.
fn checked_locale(locale: String) -> String {
    if !messages::is_supported(&locale) {
        tracing::warn!(
            locale = %locale,
            fallback = messages::DEFAULT_LOCALE,
            "No translated messages for locale"
        );
    }
    locale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CollectingReporter;
    use http::HeaderValue;

    fn monitor() -> (EndpointMonitor, Arc<CollectingReporter>) {
        let reporter = Arc::new(CollectingReporter::new());
        (EndpointMonitor::new(reporter.clone(), "en"), reporter)
    }

    fn with_status(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ENDPOINT_STATUS_HEADER, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_deprecated_reports_once() {
        let (monitor, reporter) = monitor();

        let status = monitor.inspect(&with_status("Deprecated"));

        assert_eq!(status, Some(EndpointStatus::Deprecated));
        assert_eq!(reporter.issues(), vec![messages::endpoint_deprecated("en")]);
    }

    #[test]
    fn test_normal_and_absent_are_silent() {
        let (monitor, reporter) = monitor();

        assert_eq!(monitor.inspect(&with_status("Normal")), Some(EndpointStatus::Normal));
        assert_eq!(monitor.inspect(&HeaderMap::new()), None);
        assert_eq!(monitor.inspect(&with_status("retired-maybe")), None);

        assert!(reporter.is_empty());
    }

    #[test]
    fn test_localized_message() {
        let reporter = Arc::new(CollectingReporter::new());
        let monitor = EndpointMonitor::new(reporter.clone(), "de-DE");

        monitor.inspect(&with_status("deprecated"));

        assert_eq!(reporter.issues(), vec![messages::endpoint_deprecated("de")]);
    }

    #[test]
    fn test_unsupported_locale_falls_back_to_english() {
        let (monitor, reporter) = monitor();
        let monitor = monitor.with_locale("xx-YY");

        monitor.inspect(&with_status("Deprecated"));

        assert!(!messages::is_supported("xx-YY"));
        assert_eq!(reporter.issues(), vec![messages::endpoint_deprecated("en")]);
    }
}
