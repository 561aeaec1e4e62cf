//! Declared metadata for feature groups and feature tests.
//!
//! Metadata is attached when a test or group is declared and read once at discovery. Descriptions are normalized
//! on the way in so authors can indent multi-line text naturally.

use std::fmt;
use std::sync::Arc;

use crate::adapter::FrameworkAdapter;
use crate::check::FeatureResult;

/// Executable predicate of a feature test.
pub type FeatureCheck = Arc<dyn Fn(&mut dyn FrameworkAdapter) -> FeatureResult + Send + Sync>;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(Arc::from(value))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(Arc::from(value))
            }
        }
    };
}

pub(crate) use string_id;

string_id!(
    /// Identity of a feature group.
    GroupId
);

string_id!(
    /// Identity of a feature test.
    TestId
);

/// Explicit display position. Unordered items sort after every ordered one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayOrder(Option<i32>);

impl DisplayOrder {
    pub const LAST: DisplayOrder = DisplayOrder(None);

    pub const fn at(order: i32) -> Self {
        Self(Some(order))
    }

    pub fn get(self) -> Option<i32> {
        self.0
    }

    /// Key used for sorting; an absent order is `i32::MAX`.
    pub fn sort_key(self) -> i32 {
        self.0.unwrap_or(i32::MAX)
    }
}

/// Weight of a feature group when frameworks are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoring(u32);

impl Scoring {
    pub const NOT_SCORED: Scoring = Scoring(0);

    pub const fn weight(weight: u32) -> Self {
        Self(weight)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_scored(self) -> bool {
        self.0 > 0
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Scoring(1)
    }
}

/// Remove leading whitespace from every line of a description.
pub fn normalize_description(description: &str) -> String {
    let mut out = String::with_capacity(description.len());
    for (i, line) in description.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.trim_start_matches([' ', '\t']));
    }
    out
}

/// A named cluster of related feature tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGroup {
    pub id: GroupId,
    pub display_name: String,
    pub description: Option<String>,
    pub display_order: DisplayOrder,
    pub scoring: Scoring,
}

impl FeatureGroup {
    pub fn new(id: impl Into<GroupId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: None,
            display_order: DisplayOrder::LAST,
            scoring: Scoring::default(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(normalize_description(description));
        self
    }

    pub fn with_display_order(mut self, order: i32) -> Self {
        self.display_order = DisplayOrder::at(order);
        self
    }

    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }
}

/// One predicate checking whether a framework supports a specific DI behavior.
#[derive(Clone)]
pub struct FeatureTest {
    pub id: TestId,
    pub group: GroupId,
    pub display_name: String,
    pub description: Option<String>,
    pub display_order: DisplayOrder,
    pub check: FeatureCheck,
}

impl FeatureTest {
    pub fn new<F>(group: impl Into<GroupId>, id: impl Into<TestId>, display_name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&mut dyn FrameworkAdapter) -> FeatureResult + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            group: group.into(),
            display_name: display_name.into(),
            description: None,
            display_order: DisplayOrder::LAST,
            check: Arc::new(check),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(normalize_description(description));
        self
    }

    pub fn with_display_order(mut self, order: i32) -> Self {
        self.display_order = DisplayOrder::at(order);
        self
    }
}

impl fmt::Debug for FeatureTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureTest")
            .field("id", &self.id)
            .field("group", &self.group)
            .field("display_name", &self.display_name)
            .field("display_order", &self.display_order)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // DisplayOrder tests
    // ========================================

    #[test]
    fn test_absent_order_sorts_last() {
        assert_eq!(DisplayOrder::LAST.sort_key(), i32::MAX);
        assert!(DisplayOrder::at(1_000).sort_key() < DisplayOrder::LAST.sort_key());
        assert_eq!(DisplayOrder::default(), DisplayOrder::LAST);
    }

    #[test]
    fn test_negative_order_sorts_first() {
        assert!(DisplayOrder::at(-1).sort_key() < DisplayOrder::at(0).sort_key());
    }

    // ========================================
    // Description normalization tests
    // ========================================

    #[test]
    fn test_normalize_strips_indentation() {
        let description = "First line\n        second line\n\tthird line";
        assert_eq!(
            normalize_description(description),
            "First line\nsecond line\nthird line"
        );
    }

    #[test]
    fn test_normalize_keeps_blank_lines() {
        assert_eq!(normalize_description("a\n   \nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_keeps_inner_spacing() {
        assert_eq!(normalize_description("  a  b"), "a  b");
    }

    // ========================================
    // Builder tests
    // ========================================

    #[test]
    fn test_group_builder() {
        let group = FeatureGroup::new("basic", "Basic")
            .with_description("   Core features")
            .with_display_order(1)
            .with_scoring(Scoring::weight(3));
        assert_eq!(group.id.as_str(), "basic");
        assert_eq!(group.description.as_deref(), Some("Core features"));
        assert_eq!(group.display_order.get(), Some(1));
        assert_eq!(group.scoring.value(), 3);
    }

    #[test]
    fn test_default_scoring_is_scored() {
        assert!(Scoring::default().is_scored());
        assert!(!Scoring::NOT_SCORED.is_scored());
    }

    #[test]
    fn test_feature_test_defaults() {
        let test = FeatureTest::new("basic", "basic.singleton", "Singleton", |_| Ok(()));
        assert_eq!(test.group, GroupId::from("basic"));
        assert_eq!(test.display_order, DisplayOrder::LAST);
        assert!(test.description.is_none());
        assert!(format!("{test:?}").contains("basic.singleton"));
    }
}
