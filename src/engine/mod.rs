//! Report engine
//!
//! Drives one report generation from catalog to tables:
//!
//! 1. validate the catalog and the framework list,
//! 2. group and order tests (metadata only),
//! 3. launch one run per (test, framework) pair ([`scheduler`]),
//! 4. stream one table per group as its runs complete ([`assembly`]).
//!
//! ## Modules
//!
//! - `runner` - executes one run (blocking pool, panic capture, timeout)
//! - `panic_capture` - process panic hook that diverts panics raised inside runs
//! - `scheduler` - fan-out over all pairs
//! - `assembly` - outcome-to-cell transform and table stream
//! - `sanitizer` - path scrubbing and data URIs

pub mod assembly;
pub mod panic_capture;
pub mod runner;
pub mod sanitizer;
pub mod scheduler;

use std::collections::HashSet;
use std::sync::Arc;

use ditables_core::{Catalog, FeatureTable, FeatureTest, FrameworkUnderTest, group_and_order};
use futures::TryStreamExt;

pub use assembly::{TableStream, assemble, cell_for};
pub use runner::{AdapterSlot, RunHandle, Runner};
pub use sanitizer::{FsProbe, PathKind, PathProbe, Sanitizer};
pub use scheduler::{RunKey, RunSet, Scheduler};

use crate::config::RunConfig;
use crate::error::ReportError;

/// Generates feature tables for a catalog and a set of frameworks.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    config: RunConfig,
    sanitizer: Arc<Sanitizer>,
}

impl ReportEngine {
    pub fn new(config: RunConfig) -> Self {
        let sanitizer = Sanitizer::new(config.redaction_marker.clone()).with_posix_paths(config.scrub_posix_paths);
        Self {
            config,
            sanitizer: Arc::new(sanitizer),
        }
    }

    /// Replace the sanitizer (e.g. to use an in-memory path probe).
    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = Arc::new(sanitizer);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Launch every run and return the table stream.
    ///
    /// Must be called within a tokio runtime: runs start immediately, before the stream is polled.
    ///
    /// ## Errors
    ///
    /// - `ReportError::Catalog` if the catalog does not validate.
    /// - `ReportError::NoFrameworks` / `ReportError::DuplicateFramework` for an unusable framework list.
    pub fn stream(&self, catalog: &Catalog, frameworks: &[FrameworkUnderTest]) -> Result<TableStream, ReportError> {
        catalog.validate()?;
        check_frameworks(frameworks)?;

        let groups = group_and_order(catalog.groups(), catalog.tests())?;
        let tests: Vec<FeatureTest> = groups.iter().flat_map(|g| g.tests.iter().cloned()).collect();
        tracing::info!(
            groups = groups.len(),
            tests = tests.len(),
            frameworks = frameworks.len(),
            "generating report"
        );

        let runs = Scheduler::new(&self.config).run_all(&tests, frameworks);
        Ok(assemble(groups, frameworks, runs, Arc::clone(&self.sanitizer)))
    }

    /// Generate every table.
    ///
    /// ## Errors
    ///
    /// Same as [`ReportEngine::stream`], plus `ReportError::MissingRun` if assembly finds a pair without a run.
    pub async fn generate(
        &self,
        catalog: &Catalog,
        frameworks: &[FrameworkUnderTest],
    ) -> Result<Vec<FeatureTable>, ReportError> {
        self.stream(catalog, frameworks)?.try_collect().await
    }
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}

fn check_frameworks(frameworks: &[FrameworkUnderTest]) -> Result<(), ReportError> {
    if frameworks.is_empty() {
        return Err(ReportError::NoFrameworks);
    }
    let mut seen = HashSet::new();
    for framework in frameworks {
        if !seen.insert(&framework.id) {
            return Err(ReportError::DuplicateFramework(framework.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ditables_core::{CatalogError, FeatureGroup};

    fn catalog() -> Catalog {
        Catalog::new()
            .with_group(FeatureGroup::new("g", "G"))
            .with_test(FeatureTest::new("g", "t", "T", |_| Ok(())))
    }

    #[tokio::test]
    async fn test_no_frameworks() {
        let err = ReportEngine::default().generate(&catalog(), &[]).await.unwrap_err();
        assert!(matches!(err, ReportError::NoFrameworks));
    }

    #[tokio::test]
    async fn test_duplicate_framework() {
        let frameworks = ditables_frameworks::frameworks();
        let doubled = [frameworks[0].clone(), frameworks[0].clone()];
        let err = ReportEngine::default().generate(&catalog(), &doubled).await.unwrap_err();
        assert!(matches!(err, ReportError::DuplicateFramework(id) if id.as_str() == "registry"));
    }

    #[tokio::test]
    async fn test_invalid_catalog() {
        let catalog = catalog().with_test(FeatureTest::new("g", "t", "T again", |_| Ok(())));
        let err = ReportEngine::default()
            .generate(&catalog, &ditables_frameworks::frameworks())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Catalog(CatalogError::DuplicateTest(_))));
    }

    #[tokio::test]
    async fn test_one_table_per_group() {
        let tables = ReportEngine::default()
            .generate(&catalog(), &ditables_frameworks::frameworks())
            .await
            .unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].frameworks.len(), 2);
        assert_eq!(tables[0].rows()[0].cells.len(), 2);
    }
}
