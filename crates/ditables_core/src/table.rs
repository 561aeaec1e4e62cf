//! Table structures handed to renderers.
//!
//! One `FeatureTable` exists per feature group. Rows are features (tests), columns are frameworks, and every row
//! holds exactly one cell per column.

use crate::framework::{FrameworkId, FrameworkUnderTest};
use crate::metadata::{FeatureGroup, FeatureTest, GroupId, Scoring, TestId};
use crate::outcome::OutcomeKind;

/// Display state of a cell; mirrors the outcome kind one-to-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureState {
    Success,
    Failure,
    Skipped,
    Concern,
}

impl FeatureState {
    pub fn from_kind(kind: OutcomeKind) -> Self {
        match kind {
            OutcomeKind::Success => FeatureState::Success,
            OutcomeKind::Failure => FeatureState::Failure,
            OutcomeKind::SkippedDueToDependency => FeatureState::Skipped,
            OutcomeKind::Concern => FeatureState::Concern,
        }
    }

    /// Short label shown in the cell.
    pub fn display_value(self) -> &'static str {
        match self {
            FeatureState::Success => "supported",
            FeatureState::Failure => "failed",
            FeatureState::Skipped => "skipped",
            FeatureState::Concern => "see comment",
        }
    }

    /// Stable lowercase name for machine-readable output.
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureState::Success => "success",
            FeatureState::Failure => "failure",
            FeatureState::Skipped => "skipped",
            FeatureState::Concern => "concern",
        }
    }
}

/// Intersection of one feature and one framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCell {
    pub display_value: &'static str,
    pub state: FeatureState,
    /// Sanitized diagnostic text of a failure.
    pub raw_error: Option<String>,
    /// Self-contained URI carrying `raw_error`.
    pub display_uri: Option<String>,
    pub comment: Option<String>,
}

impl FeatureCell {
    pub fn new(state: FeatureState) -> Self {
        Self {
            display_value: state.display_value(),
            state,
            raw_error: None,
            display_uri: None,
            comment: None,
        }
    }
}

/// A feature row header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub test: TestId,
    pub display_name: String,
    pub description: Option<String>,
}

impl From<&FeatureTest> for Feature {
    fn from(test: &FeatureTest) -> Self {
        Self {
            test: test.id.clone(),
            display_name: test.display_name.clone(),
            description: test.description.clone(),
        }
    }
}

/// A framework column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkColumn {
    pub id: FrameworkId,
    pub display_name: String,
    pub version: Option<String>,
    pub url: Option<String>,
}

impl From<&FrameworkUnderTest> for FrameworkColumn {
    fn from(framework: &FrameworkUnderTest) -> Self {
        Self {
            id: framework.id.clone(),
            display_name: framework.display_name.clone(),
            version: framework.version.clone(),
            url: framework.url.clone(),
        }
    }
}

/// A feature with its cells, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    pub feature: Feature,
    pub cells: Vec<FeatureCell>,
}

/// Results of one feature group across all frameworks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureTable {
    pub group: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub scoring: Scoring,
    pub frameworks: Vec<FrameworkColumn>,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new(group: &FeatureGroup, frameworks: Vec<FrameworkColumn>) -> Self {
        Self {
            group: group.id.clone(),
            name: group.display_name.clone(),
            description: group.description.clone(),
            scoring: group.scoring,
            frameworks,
            rows: Vec::new(),
        }
    }

    /// Append a row.
    ///
    /// ## Returns
    /// - `Err(row)` (handing the row back) when the number of cells differs from the number of columns.
    pub fn push_row(&mut self, row: FeatureRow) -> Result<(), FeatureRow> {
        if row.cells.len() != self.frameworks.len() {
            return Err(row);
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Cell for `test` under `framework`.
    pub fn cell(&self, test: &TestId, framework: &FrameworkId) -> Option<&FeatureCell> {
        let column = self.frameworks.iter().position(|f| &f.id == framework)?;
        let row = self.rows.iter().find(|r| &r.feature.test == test)?;
        row.cells.get(column)
    }

    /// Count cells in `state` for the column at `framework`.
    pub fn count(&self, framework: &FrameworkId, state: FeatureState) -> usize {
        let Some(column) = self.frameworks.iter().position(|f| &f.id == framework) else {
            return 0;
        };
        self.rows
            .iter()
            .filter(|r| r.cells.get(column).is_some_and(|c| c.state == state))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(id: &str) -> FrameworkColumn {
        FrameworkColumn {
            id: FrameworkId::from(id),
            display_name: id.to_uppercase(),
            version: None,
            url: None,
        }
    }

    fn feature(id: &str) -> Feature {
        Feature {
            test: TestId::from(id),
            display_name: id.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(FeatureState::Success.display_value(), "supported");
        assert_eq!(FeatureState::Failure.display_value(), "failed");
        assert_eq!(FeatureState::Skipped.display_value(), "skipped");
        assert_eq!(FeatureState::Concern.display_value(), "see comment");
    }

    #[test]
    fn test_state_mirrors_kind() {
        assert_eq!(
            FeatureState::from_kind(OutcomeKind::SkippedDueToDependency),
            FeatureState::Skipped
        );
        assert_eq!(FeatureState::from_kind(OutcomeKind::Concern), FeatureState::Concern);
    }

    #[test]
    fn test_cell_lookup() {
        let group = FeatureGroup::new("g", "G");
        let mut table = FeatureTable::new(&group, vec![column("a"), column("b")]);
        table
            .push_row(FeatureRow {
                feature: feature("t"),
                cells: vec![FeatureCell::new(FeatureState::Success), FeatureCell::new(FeatureState::Failure)],
            })
            .unwrap();

        let cell = table.cell(&TestId::from("t"), &FrameworkId::from("b")).unwrap();
        assert_eq!(cell.state, FeatureState::Failure);
        assert!(table.cell(&TestId::from("t"), &FrameworkId::from("c")).is_none());
        assert_eq!(table.count(&FrameworkId::from("a"), FeatureState::Success), 1);
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let group = FeatureGroup::new("g", "G");
        let mut table = FeatureTable::new(&group, vec![column("a")]);
        let row = FeatureRow {
            feature: feature("t"),
            cells: Vec::new(),
        };
        assert!(table.push_row(row).is_err());
        assert!(table.rows().is_empty());
    }
}
