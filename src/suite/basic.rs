//! Basic registration and lifetime features.

use ditables_core::{FeatureResult, FeatureTest, FrameworkAdapter, Instance, ensure};

use super::services::{DEPENDENCY, Marker, SERVICE, leaf, service_with_dependency};

pub const GROUP: &str = "basic";

pub fn tests() -> Vec<FeatureTest> {
    vec![
        FeatureTest::new(GROUP, "basic.singleton", "Singleton", singleton)
            .with_description("Resolving a singleton twice returns the same instance.")
            .with_display_order(1),
        FeatureTest::new(GROUP, "basic.transient", "Transient", transient)
            .with_description("Resolving a transient twice returns two different instances.")
            .with_display_order(2),
        FeatureTest::new(GROUP, "basic.instance", "Instance", instance)
            .with_description("A pre-built instance is returned as registered.")
            .with_display_order(3),
        FeatureTest::new(GROUP, "basic.constructor", "Constructor dependency", constructor_dependency)
            .with_description("Constructor parameters are resolved from the container.")
            .with_display_order(4),
    ]
}

fn singleton(adapter: &mut dyn FrameworkAdapter) -> FeatureResult {
    adapter.register_singleton(SERVICE, leaf("Service").into())?;
    let first = adapter.resolve(&SERVICE)?;
    let second = adapter.resolve(&SERVICE)?;
    ensure!(first.same_as(&second), "singleton resolved to two different instances");
    Ok(())
}

fn transient(adapter: &mut dyn FrameworkAdapter) -> FeatureResult {
    adapter.register_transient(SERVICE, leaf("Service").into())?;
    let first = adapter.resolve(&SERVICE)?;
    let second = adapter.resolve(&SERVICE)?;
    ensure!(!first.same_as(&second), "transient resolved to the same instance twice");
    Ok(())
}

fn instance(adapter: &mut dyn FrameworkAdapter) -> FeatureResult {
    let registered = Instance::new("Preset", Marker);
    adapter.register_instance(SERVICE, registered.clone())?;
    let resolved = adapter.resolve(&SERVICE)?;
    ensure!(
        resolved.same_as(&registered),
        "resolved `{}` instead of the registered instance",
        resolved.component()
    );
    Ok(())
}

fn constructor_dependency(adapter: &mut dyn FrameworkAdapter) -> FeatureResult {
    adapter.register_transient(DEPENDENCY, leaf("Dependency").into())?;
    adapter.register_transient(SERVICE, service_with_dependency().into())?;
    let service = adapter.resolve(&SERVICE)?;
    let dependency = service.downcast_ref::<Instance>();
    ensure!(
        dependency.is_some_and(|d| d.component() == "Dependency"),
        "service was built without its dependency"
    );
    Ok(())
}
