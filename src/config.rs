//! Configuration for report generation

use std::time::Duration;

use crate::engine::sanitizer::DEFAULT_REDACTION_MARKER;

/// Default per-run time budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for one report generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of runs executing at once (`None` = unbounded)
    pub max_concurrency: Option<usize>,
    /// Time budget per (test, framework) run (`None` = no limit)
    pub timeout: Option<Duration>,
    /// Text substituted for scrubbed path prefixes
    pub redaction_marker: String,
    /// Whether POSIX absolute paths are scrubbed in addition to Windows paths
    pub scrub_posix_paths: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            timeout: Some(DEFAULT_TIMEOUT),
            redaction_marker: DEFAULT_REDACTION_MARKER.to_string(),
            scrub_posix_paths: true,
        }
    }
}

impl RunConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of concurrent runs. `0` means unbounded.
    pub fn with_max_concurrency(mut self, jobs: usize) -> Self {
        self.max_concurrency = (jobs > 0).then_some(jobs);
        self
    }

    /// Set the per-run time budget (`None` disables it)
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the redaction marker
    pub fn with_redaction_marker(mut self, marker: impl Into<String>) -> Self {
        self.redaction_marker = marker.into();
        self
    }

    /// Enable or disable POSIX path scrubbing
    pub fn with_posix_paths(mut self, scrub: bool) -> Self {
        self.scrub_posix_paths = scrub;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Defaults
    // ========================================

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.max_concurrency, None);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.redaction_marker, "[removed]");
        assert!(config.scrub_posix_paths);
    }

    // ========================================
    // Builders
    // ========================================

    #[test]
    fn test_zero_jobs_is_unbounded() {
        assert_eq!(RunConfig::new().with_max_concurrency(0).max_concurrency, None);
        assert_eq!(RunConfig::new().with_max_concurrency(4).max_concurrency, Some(4));
    }

    #[test]
    fn test_builder_chain() {
        let config = RunConfig::new()
            .with_timeout(None)
            .with_redaction_marker("<path>")
            .with_posix_paths(false);
        assert_eq!(config.timeout, None);
        assert_eq!(config.redaction_marker, "<path>");
        assert!(!config.scrub_posix_paths);
    }
}
