//! Signals a feature check uses to report anything other than plain success.
//!
//! A check is a function returning `FeatureResult`. `Ok(())` means the framework supports the feature. The error
//! side distinguishes a real failure (`Fault`) from a test that declines to run (`SkippedDueToDependency`) and a
//! result that needs a human to look at it (`Concern`).
//!
//! Adapter errors convert into faults through `?`, recording where the check gave up.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt::{self, Write as _};
use std::panic::Location;

use crate::adapter::AdapterError;

/// Result of a feature check.
pub type FeatureResult = Result<(), FeatureSignal>;

/// Non-success results of a feature check.
#[derive(Debug)]
pub enum FeatureSignal {
    /// The framework failed the feature.
    Fault(Fault),
    /// A prerequisite feature is missing, so the check is meaningless for this framework.
    SkippedDueToDependency(String),
    /// The result is ambiguous; the message explains what a reviewer should look at.
    Concern(String),
}

/// A captured feature failure with everything known at the moment it happened.
#[derive(Debug)]
pub struct Fault {
    message: String,
    location: &'static Location<'static>,
    source: Option<AdapterError>,
    backtrace: Backtrace,
}

impl Fault {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: Location::caller(),
            source: None,
            backtrace: Backtrace::capture(),
        }
    }

    /// A fault caused by an adapter call.
    #[track_caller]
    pub fn from_adapter(error: AdapterError) -> Self {
        Self {
            message: format!("adapter call failed: {error}"),
            location: Location::caller(),
            source: Some(error),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    pub fn adapter_error(&self) -> Option<&AdapterError> {
        self.source.as_ref()
    }

    /// Full diagnostic representation: message, location, cause and (when captured) the backtrace.
    pub fn report(&self) -> String {
        let mut out = String::new();
        // Writing to String cannot fail.
        let _ = write!(out, "{}\n  at {}", self.message, self.location);
        if let Some(source) = &self.source {
            let _ = write!(out, "\ncaused by: {source:?}");
        }
        if self.backtrace.status() == BacktraceStatus::Captured {
            let _ = write!(out, "\nstack backtrace:\n{}", self.backtrace);
        }
        out
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.message, self.location)
    }
}

impl Error for Fault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

impl From<Fault> for FeatureSignal {
    fn from(fault: Fault) -> Self {
        FeatureSignal::Fault(fault)
    }
}

impl From<AdapterError> for FeatureSignal {
    #[track_caller]
    fn from(error: AdapterError) -> Self {
        FeatureSignal::Fault(Fault::from_adapter(error))
    }
}

/// Decline the check because a prerequisite feature is not available.
pub fn skip_due_to_dependency(reason: impl Into<String>) -> FeatureResult {
    Err(FeatureSignal::SkippedDueToDependency(reason.into()))
}

/// Report an ambiguous result for human review.
pub fn concern(message: impl Into<String>) -> FeatureResult {
    Err(FeatureSignal::Concern(message.into()))
}

/// Fail the enclosing check with a formatted message unless `cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::FeatureSignal::Fault($crate::Fault::new(format!($($arg)+))));
        }
    };
}
