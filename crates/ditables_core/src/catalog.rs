//! Catalog of declared feature groups and tests.
//!
//! The catalog is the explicit replacement for metadata discovery: groups and tests are added in declaration
//! order, and that order is the discovery order used to break display-order ties.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use crate::metadata::{FeatureGroup, FeatureTest, GroupId, TestId};

/// Reasons a catalog cannot produce a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateGroup(GroupId),
    DuplicateTest(TestId),
    UnknownGroup { test: TestId, group: GroupId },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateGroup(id) => write!(f, "feature group `{id}` is declared more than once"),
            CatalogError::DuplicateTest(id) => write!(f, "feature test `{id}` is declared more than once"),
            CatalogError::UnknownGroup { test, group } => {
                write!(f, "feature test `{test}` belongs to undeclared group `{group}`")
            }
        }
    }
}

impl Error for CatalogError {}

/// Declared groups and tests, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    groups: Vec<FeatureGroup>,
    tests: Vec<FeatureTest>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: FeatureGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_test(mut self, test: FeatureTest) -> Self {
        self.tests.push(test);
        self
    }

    pub fn add_group(&mut self, group: FeatureGroup) {
        self.groups.push(group);
    }

    pub fn add_test(&mut self, test: FeatureTest) {
        self.tests.push(test);
    }

    pub fn groups(&self) -> &[FeatureGroup] {
        &self.groups
    }

    pub fn tests(&self) -> &[FeatureTest] {
        &self.tests
    }

    pub fn group(&self, id: &GroupId) -> Option<&FeatureGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Keep only tests whose id or display name contains `keyword` (case-insensitive).
    ///
    /// Groups are kept as declared; groups left without tests simply produce no table.
    pub fn filtered(mut self, keyword: &str) -> Self {
        let needle = keyword.to_lowercase();
        self.tests.retain(|t| {
            t.id.as_str().to_lowercase().contains(&needle) || t.display_name.to_lowercase().contains(&needle)
        });
        self
    }

    /// Check identities and group references.
    ///
    /// ## Errors
    ///
    /// Returns the first duplicate group id, duplicate test id, or test referencing an undeclared group.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut groups = HashSet::new();
        for group in &self.groups {
            if !groups.insert(&group.id) {
                return Err(CatalogError::DuplicateGroup(group.id.clone()));
            }
        }

        let mut tests = HashSet::new();
        for test in &self.tests {
            if !tests.insert(&test.id) {
                return Err(CatalogError::DuplicateTest(test.id.clone()));
            }
            if !groups.contains(&test.group) {
                return Err(CatalogError::UnknownGroup {
                    test: test.id.clone(),
                    group: test.group.clone(),
                });
            }
        }
        Ok(())
    }
}
