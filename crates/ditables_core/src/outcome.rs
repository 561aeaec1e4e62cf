//! Outcome of running one feature test against one framework.

use crate::check::{FeatureResult, FeatureSignal};

/// Details of a failed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    /// Full diagnostic representation captured at the moment of failure (unsanitized).
    pub trace: String,
    /// Short note on how the run failed, when it did not fail through the check itself (panic, timeout, ...).
    pub message: Option<String>,
}

/// Classified result of one (test, framework) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Success,
    Failure(FailureDetail),
    SkippedDueToDependency(String),
    Concern(String),
}

/// Kind of a `TestOutcome`, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    Failure,
    SkippedDueToDependency,
    Concern,
}

impl TestOutcome {
    /// A failure carrying only a trace.
    pub fn failure(trace: impl Into<String>) -> Self {
        TestOutcome::Failure(FailureDetail {
            trace: trace.into(),
            message: None,
        })
    }

    /// A failure carrying a trace and a short message.
    pub fn failure_with_message(trace: impl Into<String>, message: impl Into<String>) -> Self {
        TestOutcome::Failure(FailureDetail {
            trace: trace.into(),
            message: Some(message.into()),
        })
    }

    /// Classify the value returned by a feature check.
    pub fn from_result(result: FeatureResult) -> Self {
        match result {
            Ok(()) => TestOutcome::Success,
            Err(FeatureSignal::Fault(fault)) => TestOutcome::failure(fault.report()),
            Err(FeatureSignal::SkippedDueToDependency(reason)) => TestOutcome::SkippedDueToDependency(reason),
            Err(FeatureSignal::Concern(message)) => TestOutcome::Concern(message),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            TestOutcome::Success => OutcomeKind::Success,
            TestOutcome::Failure(_) => OutcomeKind::Failure,
            TestOutcome::SkippedDueToDependency(_) => OutcomeKind::SkippedDueToDependency,
            TestOutcome::Concern(_) => OutcomeKind::Concern,
        }
    }

    /// Free-text message attached to the outcome, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            TestOutcome::Success => None,
            TestOutcome::Failure(detail) => detail.message.as_deref(),
            TestOutcome::SkippedDueToDependency(message) | TestOutcome::Concern(message) => Some(message),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TestOutcome::Failure(_))
    }
}
