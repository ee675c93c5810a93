//! Dispatch failure policy and per-pass reporting

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Capability, ObjectError, ObjectId};

/// What a pass does when an object callback fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and keep dispatching to the remaining objects
    #[default]
    Continue,
    /// Abort the pass and surface the failure immediately
    FailFast,
}

/// A capability callback returned an error
#[derive(thiserror::Error, Debug)]
#[error("{capability} dispatch failed for object `{object}`: {source}")]
pub struct CapabilityDispatchError {
    /// Object whose callback failed
    pub object: ObjectId,
    /// Pass that was running
    pub capability: Capability,
    /// The callback's error
    #[source]
    pub source: ObjectError,
}

/// Outcome of one dispatch pass over a collection
#[derive(Debug)]
pub struct PassReport {
    /// Pass that ran
    pub capability: Capability,
    /// Callbacks invoked
    pub calls: usize,
    /// Callbacks that failed
    pub errors: usize,
    /// First failure, kept for the frame report
    pub first_error: Option<CapabilityDispatchError>,
    /// Events taken by an event pass; the rest are still undelivered
    pub consumed: usize,
    /// Time spent in callbacks of objects that opted into profiling
    pub profiled: Duration,
}

impl PassReport {
    /// Empty report for `capability`
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            calls: 0,
            errors: 0,
            first_error: None,
            consumed: 0,
            profiled: Duration::ZERO,
        }
    }

    /// Count a failure, keeping only the first one
    pub fn record(&mut self, error: CapabilityDispatchError) {
        log::error!("{}", error);
        self.errors += 1;
        if self.first_error.is_none() {
            self.first_error = Some(error);
        }
    }

    /// Fold another report of the same pass into this one
    pub fn merge(&mut self, other: PassReport) {
        self.calls += other.calls;
        self.errors += other.errors;
        self.consumed += other.consumed;
        self.profiled += other.profiled;
        if self.first_error.is_none() {
            self.first_error = other.first_error;
        }
    }

    /// Whether any callback failed
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(id: &str) -> CapabilityDispatchError {
        CapabilityDispatchError {
            object: ObjectId::new(id),
            capability: Capability::Logical,
            source: ObjectError::msg("boom"),
        }
    }

    #[test]
    fn test_record_keeps_first_error() {
        let mut report = PassReport::new(Capability::Logical);
        report.record(failure("a"));
        report.record(failure("b"));

        assert_eq!(report.errors, 2);
        assert_eq!(report.first_error.unwrap().object, ObjectId::new("a"));
    }

    #[test]
    fn test_merge() {
        let mut first = PassReport::new(Capability::Logical);
        first.calls = 2;
        let mut second = PassReport::new(Capability::Logical);
        second.calls = 3;
        second.record(failure("c"));

        first.merge(second);
        assert_eq!(first.calls, 5);
        assert!(first.has_errors());
        assert_eq!(first.first_error.unwrap().object.as_str(), "c");
    }

    #[test]
    fn test_error_message_names_object_and_pass() {
        let message = failure("ship").to_string();
        assert!(message.contains("ship"));
        assert!(message.contains("logical"));
        assert!(message.contains("boom"));
    }
}
