//! Services and components shared by the built-in feature checks.

use ditables_core::{Component, GenericComponent, Instance, ServiceType};

pub const SERVICE: ServiceType = ServiceType::named("IService");
pub const DEPENDENCY: ServiceType = ServiceType::named("IDependency");
pub const PLUGIN: ServiceType = ServiceType::named("IPlugin");
pub const RECURSIVE: ServiceType = ServiceType::named("IRecursive");
pub const UNREGISTERED: ServiceType = ServiceType::named("IUnregistered");

pub const REPOSITORY: ServiceType = ServiceType::generic_definition("IRepository", 1);
pub const USER: ServiceType = ServiceType::named("User");
pub const ORDER: ServiceType = ServiceType::named("Order");

/// Marker value held by leaf components.
#[derive(Debug, Default)]
pub struct Marker;

pub fn leaf(name: &'static str) -> Component {
    Component::leaf(name, || Marker)
}

/// `Service(IDependency)`: holds the resolved dependency.
pub fn service_with_dependency() -> Component {
    Component::new("ServiceWithDependency", vec![DEPENDENCY], |deps| {
        Ok(Instance::new("ServiceWithDependency", deps[0].clone()))
    })
}

/// `Repository<T>`: remembers the type argument it was closed over.
pub fn repository() -> GenericComponent {
    GenericComponent::new("Repository<>", 1, |arguments| {
        let item = arguments.first().cloned().unwrap_or(ServiceType::named("?"));
        Component::new("Repository", Vec::new(), move |_| Ok(Instance::new("Repository", item.clone())))
    })
}

/// A component that depends on the service it is registered for.
pub fn self_dependent(service: ServiceType) -> Component {
    Component::new("SelfDependent", vec![service], |deps| {
        Ok(Instance::new("SelfDependent", deps[0].clone()))
    })
}
