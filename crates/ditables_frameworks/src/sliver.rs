//! Sliver: a deliberately small container.
//!
//! One binding per service (rebinding replaces), closed types only, no collection support and no cycle detection.
//! A recursive graph is followed until the depth limit is hit, which brings the resolving thread down.

use std::collections::HashMap;

use ditables_core::{
    AdapterError, AdapterResult, Capabilities, Component, FrameworkAdapter, Implementation, Instance, ServiceShape,
    ServiceType,
};

/// Nesting depth at which resolution gives up.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone)]
enum Binding {
    Singleton(Component),
    Transient(Component),
    Constant(Instance),
}

#[derive(Debug, Default)]
pub struct SliverAdapter {
    bindings: HashMap<ServiceType, Binding>,
    singletons: HashMap<ServiceType, Instance>,
}

impl SliverAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn component(service: &ServiceType, implementation: Implementation) -> AdapterResult<Component> {
        if service.shape() == ServiceShape::OpenGeneric {
            return Err(AdapterError::Unsupported(format!("open generic registration of `{service}`")));
        }
        match implementation {
            Implementation::Component(component) => Ok(component),
            Implementation::Generic(generic) => Err(AdapterError::Unsupported(format!(
                "generic component `{}`",
                generic.name()
            ))),
        }
    }

    fn resolve_at(&mut self, service: &ServiceType, depth: usize) -> AdapterResult<Instance> {
        if depth > MAX_DEPTH {
            panic!("stack overflow while resolving `{service}`");
        }
        let binding = self
            .bindings
            .get(service)
            .cloned()
            .ok_or_else(|| AdapterError::NotRegistered(service.clone()))?;

        match binding {
            Binding::Constant(instance) => Ok(instance),
            Binding::Transient(component) => self.build(&component, depth),
            Binding::Singleton(component) => {
                if let Some(instance) = self.singletons.get(service) {
                    return Ok(instance.clone());
                }
                let instance = self.build(&component, depth)?;
                self.singletons.insert(service.clone(), instance.clone());
                Ok(instance)
            }
        }
    }

    fn build(&mut self, component: &Component, depth: usize) -> AdapterResult<Instance> {
        let mut dependencies = Vec::with_capacity(component.dependencies().len());
        for dependency in component.dependencies() {
            dependencies.push(self.resolve_at(dependency, depth + 1)?);
        }
        component.construct(&dependencies)
    }
}

impl FrameworkAdapter for SliverAdapter {
    fn register_singleton(&mut self, service: ServiceType, implementation: Implementation) -> AdapterResult<()> {
        let component = Self::component(&service, implementation)?;
        self.singletons.remove(&service);
        self.bindings.insert(service, Binding::Singleton(component));
        Ok(())
    }

    fn register_transient(&mut self, service: ServiceType, implementation: Implementation) -> AdapterResult<()> {
        let component = Self::component(&service, implementation)?;
        self.bindings.insert(service, Binding::Transient(component));
        Ok(())
    }

    fn register_instance(&mut self, service: ServiceType, instance: Instance) -> AdapterResult<()> {
        if service.shape() == ServiceShape::OpenGeneric {
            return Err(AdapterError::Unsupported(format!("open generic registration of `{service}`")));
        }
        self.bindings.insert(service, Binding::Constant(instance));
        Ok(())
    }

    fn resolve(&mut self, service: &ServiceType) -> AdapterResult<Instance> {
        self.resolve_at(service, 0)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            crashes_on_recursion: true,
            crashes_on_list_recursion: true,
        }
    }
}
