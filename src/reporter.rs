//! Test-result reporters
//!
//! Every assertion helper funnels its outcome through a [`Reporter`]. The
//! helpers never panic themselves, so the reporter decides whether a failure
//! aborts the test ([`PanicReporter`]) or is collected for later inspection
//! ([`FailureLog`]).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::location::Location;
use crate::logging;

/// Sink for assertion failures.
pub trait Reporter: Send + Sync {
    fn report_failure(&self, message: &str, location: Location);
}

/// A single recorded assertion failure
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub message: String,
    pub location: Location,
    pub recorded_at: DateTime<Utc>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Collects failures in memory.
#[derive(Debug, Default)]
pub struct FailureLog {
    failures: Mutex<Vec<Failure>>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Failure>> {
        // A panicking test thread must not hide the failures recorded so far.
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of every failure recorded so far, in report order
    pub fn failures(&self) -> Vec<Failure> {
        self.lock().clone()
    }

    /// Messages of every recorded failure, in report order
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|f| f.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes and returns all recorded failures.
    pub fn take(&self) -> Vec<Failure> {
        std::mem::take(&mut *self.lock())
    }

    /// Panics with every recorded failure if any were reported.
    #[track_caller]
    pub fn assert_clean(&self) {
        let failures = self.lock();
        if failures.is_empty() {
            return;
        }
        let listing = failures
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        panic!("{} assertion failure(s):\n{listing}", failures.len());
    }
}

impl Reporter for FailureLog {
    fn report_failure(&self, message: &str, location: Location) {
        logging::log_failure(message, &location);
        self.lock().push(Failure {
            message: message.to_string(),
            location,
            recorded_at: Utc::now(),
        });
    }
}

/// Panics on the first reported failure, like a plain `assert!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    fn report_failure(&self, message: &str, location: Location) {
        logging::log_failure(message, &location);
        panic!("{location}: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::here;

    #[test]
    fn test_failure_log_records_in_order() {
        let log = FailureLog::new();
        assert!(log.is_empty());

        log.report_failure("first", here!());
        log.report_failure("second", here!());

        assert_eq!(log.len(), 2);
        assert_eq!(log.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_failure_log_take_drains() {
        let log = FailureLog::new();
        log.report_failure("boom", here!());

        let taken = log.take();
        assert_eq!(taken.len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_assert_clean_passes_when_empty() {
        FailureLog::new().assert_clean();
    }

    #[test]
    #[should_panic(expected = "1 assertion failure(s)")]
    fn test_assert_clean_panics_with_failures() {
        let log = FailureLog::new();
        log.report_failure("path exists but should not: /tmp/x", here!());
        log.assert_clean();
    }

    #[test]
    #[should_panic(expected = "Unexpected nil value")]
    fn test_panic_reporter_panics() {
        PanicReporter.report_failure("Unexpected nil value", here!());
    }

    #[test]
    fn test_failure_serializes_to_json() {
        let log = FailureLog::new();
        log.report_failure("oops", Location::new("a.rs", 3, 1));

        let json = serde_json::to_value(log.failures()).unwrap();
        assert_eq!(json[0]["message"], "oops");
        assert_eq!(json[0]["location"]["file"], "a.rs");
        assert_eq!(json[0]["location"]["line"], 3);
        assert!(json[0]["recorded_at"].is_string());
    }
}
