//! Built-in feature suite
//!
//! The catalog every report runs by default. Groups and tests are declared here in discovery order; display order
//! comes from their metadata.

pub mod basic;
pub mod collections;
pub mod errors;
pub mod generics;
pub mod services;

use ditables_core::{Catalog, FeatureGroup, Scoring};

/// The built-in catalog.
pub fn catalog() -> Catalog {
    let mut catalog = Catalog::new()
        .with_group(
            FeatureGroup::new(basic::GROUP, "Basic")
                .with_description("Registration and lifetimes every container is expected to support.")
                .with_display_order(1)
                .with_scoring(Scoring::weight(3)),
        )
        .with_group(
            FeatureGroup::new(generics::GROUP, "Open generics")
                .with_description("Registering generic definitions once for all closed types.")
                .with_display_order(2)
                .with_scoring(Scoring::weight(2)),
        )
        .with_group(
            FeatureGroup::new(collections::GROUP, "Collections")
                .with_description("Several registrations of one service.")
                .with_display_order(3),
        )
        .with_group(
            FeatureGroup::new(errors::GROUP, "Error handling")
                .with_description(
                    "How failures are reported.
                     Not scored: crashing frameworks skip these checks.",
                )
                .with_scoring(Scoring::NOT_SCORED),
        );

    for test in errors::tests()
        .into_iter()
        .chain(basic::tests())
        .chain(generics::tests())
        .chain(collections::tests())
    {
        catalog.add_test(test);
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use ditables_core::group_and_order;

    #[test]
    fn test_catalog_is_valid() {
        assert_eq!(catalog().validate(), Ok(()));
    }

    #[test]
    fn test_group_order() {
        let catalog = catalog();
        let ordered = group_and_order(catalog.groups(), catalog.tests()).unwrap();
        let groups: Vec<&str> = ordered.iter().map(|g| g.group.id.as_str()).collect();
        assert_eq!(groups, ["basic", "generics", "collections", "errors"]);

        let basic: Vec<&str> = ordered[0].tests.iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(basic, ["Singleton", "Transient", "Instance", "Constructor dependency"]);
    }

    #[test]
    fn test_descriptions_are_normalized() {
        let catalog = catalog();
        let errors = catalog.group(&errors::GROUP.into()).unwrap();
        assert_eq!(
            errors.description.as_deref(),
            Some("How failures are reported.\nNot scored: crashing frameworks skip these checks.")
        );
    }
}
