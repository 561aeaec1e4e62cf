//! Run scheduler: fans out one run per (test, framework) pair.

use std::collections::HashMap;

use ditables_core::{AdapterIsolation, FeatureTest, FrameworkId, FrameworkUnderTest, TestId, TestOutcome};

use super::runner::{AdapterSlot, RunHandle, Runner};
use crate::config::RunConfig;

/// Identity of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunKey {
    pub test: TestId,
    pub framework: FrameworkId,
}

impl RunKey {
    pub fn new(test: impl Into<TestId>, framework: impl Into<FrameworkId>) -> Self {
        Self {
            test: test.into(),
            framework: framework.into(),
        }
    }
}

/// Launched runs, keyed by pair. Every handle resolves to an outcome.
#[derive(Debug, Default)]
pub struct RunSet {
    runs: HashMap<RunKey, RunHandle>,
}

impl RunSet {
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn contains(&self, key: &RunKey) -> bool {
        self.runs.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &RunKey> {
        self.runs.keys()
    }

    /// Remove the handle for `key`; each run is awaited by exactly one consumer.
    pub fn take(&mut self, key: &RunKey) -> Option<RunHandle> {
        self.runs.remove(key)
    }

    /// Await every run.
    pub async fn into_outcomes(self) -> HashMap<RunKey, TestOutcome> {
        let (keys, handles): (Vec<RunKey>, Vec<RunHandle>) = self.runs.into_iter().unzip();
        let outcomes = futures::future::join_all(handles.into_iter().map(RunHandle::outcome)).await;
        keys.into_iter().zip(outcomes).collect()
    }
}

/// Launches runs for a whole report.
#[derive(Debug, Clone)]
pub struct Scheduler {
    runner: Runner,
}

impl Scheduler {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            runner: Runner::new(config.timeout, config.max_concurrency),
        }
    }

    /// Launch every pair of `tests` × `frameworks`. Must be called within a tokio runtime.
    ///
    /// ## Notes
    /// - Never fails; failed runs surface as failure outcomes.
    /// - A pair that appears twice (duplicate ids) is launched once.
    #[tracing::instrument(skip_all, fields(tests = tests.len(), frameworks = frameworks.len()))]
    pub fn run_all(&self, tests: &[FeatureTest], frameworks: &[FrameworkUnderTest]) -> RunSet {
        let mut runs = HashMap::with_capacity(tests.len() * frameworks.len());

        for framework in frameworks {
            let shared = match framework.isolation {
                AdapterIsolation::FreshPerRun => None,
                AdapterIsolation::SharedPerReport => Some(AdapterSlot::shared(framework.factory())),
            };

            for test in tests {
                let key = RunKey {
                    test: test.id.clone(),
                    framework: framework.id.clone(),
                };
                if runs.contains_key(&key) {
                    tracing::warn!(test = %key.test, framework = %key.framework, "duplicate run skipped");
                    continue;
                }
                let slot = shared
                    .clone()
                    .unwrap_or_else(|| AdapterSlot::fresh(framework.factory()));
                let handle = self.runner.run(test, &framework.id, slot);
                runs.insert(key, handle);
            }
        }

        tracing::debug!(runs = runs.len(), "runs launched");
        RunSet { runs }
    }
}
