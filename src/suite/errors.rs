//! Error reporting features.

use ditables_core::{AdapterError, FeatureResult, FeatureTest, FrameworkAdapter, Fault, concern, skip_due_to_dependency};

use super::services::{RECURSIVE, UNREGISTERED, self_dependent};

pub const GROUP: &str = "errors";

pub fn tests() -> Vec<FeatureTest> {
    vec![
        FeatureTest::new(GROUP, "errors.recursion", "Recursion detection", recursion)
            .with_description("A self-referencing service graph is reported instead of looping."),
        FeatureTest::new(GROUP, "errors.unregistered", "Unregistered service", unregistered)
            .with_description("Resolving an unknown service fails with an error that names it."),
    ]
}

fn recursion(adapter: &mut dyn FrameworkAdapter) -> FeatureResult {
    if adapter.capabilities().crashes_on_recursion {
        return skip_due_to_dependency("resolving a recursive graph crashes this framework");
    }
    adapter.register_transient(RECURSIVE, self_dependent(RECURSIVE).into())?;

    match adapter.resolve(&RECURSIVE) {
        Err(AdapterError::Recursion(_)) => Ok(()),
        Err(other) => concern(format!("recursion surfaced as a different error: {other}")),
        Ok(_) => Err(Fault::new("a recursive graph was resolved").into()),
    }
}

fn unregistered(adapter: &mut dyn FrameworkAdapter) -> FeatureResult {
    match adapter.resolve(&UNREGISTERED) {
        Ok(instance) => Err(Fault::new(format!("resolved `{}` for an unregistered service", instance.component())).into()),
        Err(e) if e.to_string().contains(UNREGISTERED.name()) => Ok(()),
        Err(e) => concern(format!("the error does not name the missing service: {e}")),
    }
}
