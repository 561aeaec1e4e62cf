//! Test runner: executes one feature test against one framework.
//!
//! The check runs on tokio's blocking pool inside a panic capture. Whatever happens (success, fault, panic,
//! timeout, cancellation) the handle resolves to a `TestOutcome`; nothing escapes to the caller.

use std::sync::Arc;
use std::time::Duration;

use ditables_core::{AdapterFactory, FeatureCheck, FeatureResult, FeatureTest, FrameworkAdapter, FrameworkId, TestOutcome};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::Instrument;

use super::panic_capture;

type SharedAdapter = Arc<Mutex<Option<Box<dyn FrameworkAdapter>>>>;

/// Where a run gets its adapter from.
#[derive(Clone)]
pub enum AdapterSlot {
    /// Build a fresh adapter for this run.
    Fresh(AdapterFactory),
    /// Use the framework's report-wide adapter, created on first use. Runs sharing it are serialized.
    ///
    /// Once a run times out its check keeps the adapter locked, so the slot is marked abandoned and every later
    /// run of the framework fails as collateral instead of waiting for the lock.
    Shared {
        adapter: SharedAdapter,
        factory: AdapterFactory,
        abandoned: Arc<watch::Sender<bool>>,
    },
}

impl AdapterSlot {
    pub fn fresh(factory: AdapterFactory) -> Self {
        AdapterSlot::Fresh(factory)
    }

    pub fn shared(factory: AdapterFactory) -> Self {
        AdapterSlot::Shared {
            adapter: Arc::new(Mutex::new(None)),
            factory,
            abandoned: Arc::new(watch::Sender::new(false)),
        }
    }
}

/// Handle to a launched run.
#[derive(Debug)]
pub struct RunHandle {
    task: JoinHandle<TestOutcome>,
}

impl RunHandle {
    /// Wait for the run. Never fails: a lost task becomes a failure outcome.
    pub async fn outcome(self) -> TestOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => join_failure(e),
        }
    }
}

/// Launches runs with a shared time budget and concurrency bound.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    timeout: Option<Duration>,
    permits: Option<Arc<Semaphore>>,
}

impl Runner {
    pub fn new(timeout: Option<Duration>, max_concurrency: Option<usize>) -> Self {
        Self {
            timeout,
            permits: max_concurrency.map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    /// Launch `test` against the adapter provided by `slot`. Must be called within a tokio runtime.
    pub fn run(&self, test: &FeatureTest, framework: &FrameworkId, slot: AdapterSlot) -> RunHandle {
        let check = Arc::clone(&test.check);
        let timeout = self.timeout;
        let permits = self.permits.clone();
        let span = tracing::debug_span!("run", test = %test.id, framework = %framework);

        let task = tokio::spawn(
            async move {
                // A closed semaphore only means nobody bounds us anymore.
                let permit = match permits {
                    Some(permits) => permits.acquire_owned().await.ok(),
                    None => None,
                };
                let outcome = execute(check, slot, timeout, permit).await;
                tracing::debug!(outcome = ?outcome.kind(), "run finished");
                outcome
            }
            .instrument(span),
        );
        RunHandle { task }
    }
}

/// Run the check on the blocking pool. The permit travels with the check and is released only when it returns,
/// so timed-out checks still count against the concurrency bound.
async fn execute(
    check: FeatureCheck,
    slot: AdapterSlot,
    timeout: Option<Duration>,
    permit: Option<OwnedSemaphorePermit>,
) -> TestOutcome {
    let (blocking, abandoned) = match slot {
        AdapterSlot::Fresh(factory) => {
            let blocking = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                outcome_of(|| {
                    let mut adapter = factory();
                    check(adapter.as_mut())
                })
            });
            (blocking, None)
        }
        AdapterSlot::Shared {
            adapter,
            factory,
            abandoned,
        } => {
            let mut guard = tokio::select! {
                guard = adapter.lock_owned() => guard,
                () = wait_abandoned(abandoned.subscribe()) => return blocked(),
            };
            // The timed-out holder may return after all; its adapter state is still suspect.
            if *abandoned.borrow() {
                return blocked();
            }
            let blocking = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                outcome_of(|| {
                    let adapter = guard.get_or_insert_with(|| factory());
                    check(adapter.as_mut())
                })
            });
            (blocking, Some(abandoned))
        }
    };

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, blocking).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(?limit, "run timed out");
                if let Some(abandoned) = abandoned {
                    abandoned.send_replace(true);
                }
                return TestOutcome::failure_with_message(
                    format!("run exceeded its time budget of {limit:?}"),
                    "timed out",
                );
            }
        },
        None => blocking.await,
    };

    joined.unwrap_or_else(join_failure)
}

/// Resolves once the shared adapter has been abandoned by a timed-out run.
async fn wait_abandoned(mut abandoned: watch::Receiver<bool>) {
    loop {
        if *abandoned.borrow_and_update() {
            return;
        }
        if abandoned.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn blocked() -> TestOutcome {
    tracing::debug!("shared adapter abandoned by a timed-out run");
    TestOutcome::failure_with_message(
        "the framework's shared adapter is still held by a run that exceeded its time budget",
        "blocked by timed-out run",
    )
}

fn outcome_of(check: impl FnOnce() -> FeatureResult) -> TestOutcome {
    match panic_capture::capture(check) {
        Ok(result) => TestOutcome::from_result(result),
        Err(panic) => {
            tracing::debug!(message = %panic.message, "check panicked");
            TestOutcome::failure_with_message(panic.report(), "panicked")
        }
    }
}

fn join_failure(error: JoinError) -> TestOutcome {
    if error.is_panic() {
        let message = panic_capture::payload_message(&*error.into_panic());
        tracing::warn!(%message, "run task panicked outside its check");
        TestOutcome::failure_with_message(format!("panicked: {message}"), "panicked")
    } else {
        TestOutcome::failure_with_message("run was cancelled before it completed", "cancelled")
    }
}
