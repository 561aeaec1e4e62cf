//! Multiple registrations and collection dependencies.

use ditables_core::{
    AdapterError, Fault, FeatureResult, FeatureTest, FrameworkAdapter, Instance, ServiceType, concern, ensure,
    skip_due_to_dependency,
};

use super::services::{PLUGIN, RECURSIVE, leaf, self_dependent};

pub const GROUP: &str = "collections";

pub fn tests() -> Vec<FeatureTest> {
    vec![
        FeatureTest::new(GROUP, "collections.resolve_all", "Resolve all", resolve_all)
            .with_description("Every registration of a service can be resolved, in registration order.")
            .with_display_order(1),
        FeatureTest::new(
            GROUP,
            "collections.recursive_list",
            "Recursive list dependency",
            recursive_list,
        )
        .with_description("A service depending on a list of itself is reported as recursive.")
        .with_display_order(2),
    ]
}

fn resolve_all(adapter: &mut dyn FrameworkAdapter) -> FeatureResult {
    adapter.register_transient(PLUGIN, leaf("FirstPlugin").into())?;
    adapter.register_transient(PLUGIN, leaf("SecondPlugin").into())?;

    let all = adapter.resolve_all(&PLUGIN)?;
    let names: Vec<&str> = all.iter().map(Instance::component).collect();
    if names == ["SecondPlugin"] {
        return concern("only the last registration was returned");
    }
    ensure!(
        names == ["FirstPlugin", "SecondPlugin"],
        "expected both plugins in registration order, got {names:?}"
    );
    Ok(())
}

fn recursive_list(adapter: &mut dyn FrameworkAdapter) -> FeatureResult {
    if adapter.capabilities().crashes_on_list_recursion {
        return skip_due_to_dependency("resolving a recursive list dependency crashes this framework");
    }
    adapter.register_transient(RECURSIVE, self_dependent(ServiceType::list_of(RECURSIVE)).into())?;

    match adapter.resolve(&RECURSIVE) {
        Err(AdapterError::Recursion(_)) => Ok(()),
        Err(other) => concern(format!("recursion surfaced as a different error: {other}")),
        Ok(_) => Err(Fault::new("a recursive list dependency was resolved").into()),
    }
}
