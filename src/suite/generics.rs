//! Open generic features.

use ditables_core::{FeatureResult, FeatureTest, FrameworkAdapter, ServiceType, ensure, skip_due_to_dependency};

use super::services::{ORDER, REPOSITORY, USER, repository};

pub const GROUP: &str = "generics";

pub fn tests() -> Vec<FeatureTest> {
    vec![
        FeatureTest::new(GROUP, "generics.open", "Open generic registration", open_generic)
            .with_description(
                "An implementation registered for `IRepository<>`
                 serves any closed `IRepository<T>`.",
            )
            .with_display_order(1),
        FeatureTest::new(
            GROUP,
            "generics.singleton_per_type",
            "Singleton per closed type",
            singleton_per_closed_type,
        )
        .with_description("An open generic singleton yields one instance per closed type.")
        .with_display_order(2),
    ]
}

fn open_generic(adapter: &mut dyn FrameworkAdapter) -> FeatureResult {
    adapter.register_transient(REPOSITORY, repository().into())?;
    let users = adapter.resolve(&REPOSITORY.close([USER])?)?;
    ensure!(
        users.downcast_ref::<ServiceType>() == Some(&USER),
        "repository was not closed over `User`"
    );
    Ok(())
}

fn singleton_per_closed_type(adapter: &mut dyn FrameworkAdapter) -> FeatureResult {
    if let Err(e) = adapter.register_singleton(REPOSITORY, repository().into()) {
        return skip_due_to_dependency(format!("open generic registration is not available ({e})"));
    }
    let users = REPOSITORY.close([USER])?;
    let orders = REPOSITORY.close([ORDER])?;

    let first = adapter.resolve(&users)?;
    let second = adapter.resolve(&users)?;
    let other = adapter.resolve(&orders)?;
    ensure!(first.same_as(&second), "`{users}` resolved to two different instances");
    ensure!(!first.same_as(&other), "`{users}` and `{orders}` share one instance");
    Ok(())
}
