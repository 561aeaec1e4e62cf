//! Grouping and display ordering of feature tests.
//!
//! Ordering only ever looks at declared metadata and discovery order, never at run results, so the layout of a
//! report cannot depend on which runs finished first.

use crate::catalog::CatalogError;
use crate::metadata::{FeatureGroup, FeatureTest, GroupId};

/// A group with its tests in display order.
#[derive(Debug, Clone)]
pub struct OrderedGroup {
    pub group: FeatureGroup,
    pub tests: Vec<FeatureTest>,
}

/// Group `tests` by their declaring group and order both levels for display.
///
/// ## Returns
/// - Groups in ascending display order (absent = last), ties in order of the group's first test.
/// - Within each group, tests in ascending display order, ties in discovery order.
///
/// ## Errors
///
/// Returns `CatalogError::UnknownGroup` if a test names a group missing from `groups`.
///
/// ## Notes
/// - Groups without tests do not appear.
pub fn group_and_order(groups: &[FeatureGroup], tests: &[FeatureTest]) -> Result<Vec<OrderedGroup>, CatalogError> {
    let mut ordered: Vec<OrderedGroup> = Vec::new();

    for test in tests {
        if let Some(existing) = ordered.iter_mut().find(|g| g.group.id == test.group) {
            existing.tests.push(test.clone());
            continue;
        }
        let group = find_group(groups, &test.group).ok_or_else(|| CatalogError::UnknownGroup {
            test: test.id.clone(),
            group: test.group.clone(),
        })?;
        ordered.push(OrderedGroup {
            group: group.clone(),
            tests: vec![test.clone()],
        });
    }

    // `sort_by_key` is stable, which keeps discovery order for equal keys.
    ordered.sort_by_key(|g| g.group.display_order.sort_key());
    for group in &mut ordered {
        group.tests.sort_by_key(|t| t.display_order.sort_key());
    }
    Ok(ordered)
}

fn find_group<'a>(groups: &'a [FeatureGroup], id: &GroupId) -> Option<&'a FeatureGroup> {
    groups.iter().find(|g| &g.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test(group: &str, id: &str, order: Option<i32>) -> FeatureTest {
        let t = FeatureTest::new(group, id, id, |_| Ok(()));
        match order {
            Some(o) => t.with_display_order(o),
            None => t,
        }
    }

    fn ids(group: &OrderedGroup) -> Vec<&str> {
        group.tests.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_orders_tests_within_group() {
        let groups = [FeatureGroup::new("g", "G")];
        let tests = [
            test("g", "b", None),
            test("g", "a", Some(1)),
            test("g", "c", Some(0)),
        ];
        let ordered = group_and_order(&groups, &tests).unwrap();
        assert_eq!(ordered.len(), 1);
        assert_eq!(ids(&ordered[0]), ["c", "a", "b"]);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let groups = [FeatureGroup::new("g", "G")];
        let tests = [
            test("g", "x", None),
            test("g", "y", Some(5)),
            test("g", "z", None),
            test("g", "w", Some(5)),
        ];
        let ordered = group_and_order(&groups, &tests).unwrap();
        assert_eq!(ids(&ordered[0]), ["y", "w", "x", "z"]);
    }

    #[test]
    fn test_orders_groups() {
        let groups = [
            FeatureGroup::new("errors", "Errors"),
            FeatureGroup::new("basic", "Basic").with_display_order(1),
            FeatureGroup::new("generics", "Generics").with_display_order(2),
        ];
        let tests = [
            test("errors", "e", None),
            test("generics", "g", None),
            test("basic", "b", None),
        ];
        let ordered = group_and_order(&groups, &tests).unwrap();
        let names: Vec<&str> = ordered.iter().map(|g| g.group.id.as_str()).collect();
        assert_eq!(names, ["basic", "generics", "errors"]);
    }

    #[test]
    fn test_unordered_groups_follow_first_test() {
        let groups = [FeatureGroup::new("a", "A"), FeatureGroup::new("b", "B")];
        let tests = [test("b", "1", None), test("a", "2", None), test("b", "3", None)];
        let ordered = group_and_order(&groups, &tests).unwrap();
        let names: Vec<&str> = ordered.iter().map(|g| g.group.id.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(ids(&ordered[0]), ["1", "3"]);
    }

    #[test]
    fn test_groups_without_tests_are_dropped() {
        let groups = [FeatureGroup::new("empty", "Empty"), FeatureGroup::new("g", "G")];
        let tests = [test("g", "t", None)];
        let ordered = group_and_order(&groups, &tests).unwrap();
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].group.id.as_str(), "g");
    }

    #[test]
    fn test_unknown_group_is_an_error() {
        let tests = [test("nowhere", "t", None)];
        assert!(matches!(
            group_and_order(&[], &tests),
            Err(CatalogError::UnknownGroup { .. })
        ));
    }
}
