//! Table assembly: turns outcomes into cells and cells into tables.
//!
//! Tables come out as a stream in group order. A table waits for its own runs only, so early groups can be rendered
//! while later ones are still running.

use std::sync::Arc;

use ditables_core::{
    Feature, FeatureCell, FeatureRow, FeatureState, FeatureTable, FrameworkColumn, FrameworkUnderTest, OrderedGroup,
    TestOutcome,
};
use futures::future::join_all;
use futures::stream::{self, BoxStream, StreamExt};

use super::sanitizer::{Sanitizer, encode_data_uri};
use super::scheduler::{RunKey, RunSet};
use crate::error::ReportError;

/// Stream of finished tables, in display order.
pub type TableStream = BoxStream<'static, Result<FeatureTable, ReportError>>;

/// Transform one outcome into its cell.
///
/// Pure apart from the sanitizer's filesystem probe: the same outcome always yields the same state and value.
pub fn cell_for(outcome: &TestOutcome, sanitizer: &Sanitizer) -> FeatureCell {
    let mut cell = FeatureCell::new(FeatureState::from_kind(outcome.kind()));
    if let TestOutcome::Failure(detail) = outcome {
        let sanitized = sanitizer.sanitize(&detail.trace);
        cell.display_uri = Some(encode_data_uri(&sanitized));
        cell.raw_error = Some(sanitized);
    }
    cell.comment = outcome.message().map(str::to_string);
    cell
}

struct Pending {
    groups: std::vec::IntoIter<OrderedGroup>,
    columns: Vec<FrameworkColumn>,
    runs: RunSet,
    sanitizer: Arc<Sanitizer>,
}

/// Build one table per group, awaiting each group's runs in turn.
///
/// The stream ends after the first error.
pub fn assemble(
    groups: Vec<OrderedGroup>,
    frameworks: &[FrameworkUnderTest],
    runs: RunSet,
    sanitizer: Arc<Sanitizer>,
) -> TableStream {
    let pending = Pending {
        groups: groups.into_iter(),
        columns: frameworks.iter().map(FrameworkColumn::from).collect(),
        runs,
        sanitizer,
    };

    stream::unfold(pending, |mut pending| async move {
        let group = pending.groups.next()?;
        let table = build_table(group, &pending.columns, &mut pending.runs, &pending.sanitizer).await;
        if table.is_err() {
            pending.groups = Vec::new().into_iter();
        }
        Some((table, pending))
    })
    .boxed()
}

#[tracing::instrument(skip_all, fields(group = %ordered.group.id, rows = ordered.tests.len()))]
async fn build_table(
    ordered: OrderedGroup,
    columns: &[FrameworkColumn],
    runs: &mut RunSet,
    sanitizer: &Sanitizer,
) -> Result<FeatureTable, ReportError> {
    let mut handles = Vec::with_capacity(ordered.tests.len() * columns.len());
    for test in &ordered.tests {
        for column in columns {
            let key = RunKey {
                test: test.id.clone(),
                framework: column.id.clone(),
            };
            let handle = runs.take(&key).ok_or_else(|| ReportError::MissingRun {
                test: key.test.clone(),
                framework: key.framework.clone(),
            })?;
            handles.push(handle.outcome());
        }
    }

    let mut outcomes = join_all(handles).await.into_iter();
    let mut table = FeatureTable::new(&ordered.group, columns.to_vec());
    for test in &ordered.tests {
        let cells: Vec<FeatureCell> = outcomes
            .by_ref()
            .take(columns.len())
            .map(|outcome| cell_for(&outcome, sanitizer))
            .collect();
        table
            .push_row(FeatureRow {
                feature: Feature::from(test),
                cells,
            })
            .expect("INVARIANT: one outcome is collected per column");
    }

    tracing::debug!("table complete");
    Ok(table)
}
