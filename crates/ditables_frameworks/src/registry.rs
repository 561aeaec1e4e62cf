//! Registry: a full-featured container.
//!
//! Supports multiple registrations per service (the last one wins on `resolve`), open generic definitions,
//! collection resolution through `IEnumerable<T>` and reports recursive graphs as errors.

use std::collections::HashMap;

use ditables_core::{
    AdapterError, AdapterResult, Component, FrameworkAdapter, GenericComponent, Implementation, Instance,
    ServiceShape, ServiceType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifetime {
    Singleton,
    Transient,
}

#[derive(Debug, Clone)]
enum Provided {
    Component(Component),
    Generic(GenericComponent),
    Instance(Instance),
}

#[derive(Debug, Clone)]
struct Registration {
    id: usize,
    lifetime: Lifetime,
    provided: Provided,
}

/// Container with full registration and resolution support.
#[derive(Debug, Default)]
pub struct RegistryAdapter {
    registrations: HashMap<ServiceType, Vec<Registration>>,
    /// Keyed by the open definition.
    generics: HashMap<ServiceType, Vec<Registration>>,
    /// Keyed by the resolved (closed) service and registration id.
    singletons: HashMap<(ServiceType, usize), Instance>,
    resolving: Vec<ServiceType>,
    next_id: usize,
}

impl RegistryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, service: ServiceType, lifetime: Lifetime, implementation: Implementation) -> AdapterResult<()> {
        let id = self.next_id;
        self.next_id += 1;

        match (service.shape(), implementation) {
            (ServiceShape::Plain | ServiceShape::ClosedGeneric, Implementation::Component(component)) => {
                tracing::trace!(%service, component = component.name(), "register");
                self.registrations.entry(service).or_default().push(Registration {
                    id,
                    lifetime,
                    provided: Provided::Component(component),
                });
                Ok(())
            }
            (ServiceShape::OpenGeneric, Implementation::Generic(generic)) if generic.arity() == service.arity() => {
                tracing::trace!(%service, component = generic.name(), "register generic");
                self.generics.entry(service).or_default().push(Registration {
                    id,
                    lifetime,
                    provided: Provided::Generic(generic),
                });
                Ok(())
            }
            (ServiceShape::OpenGeneric, Implementation::Generic(generic)) => Err(AdapterError::ShapeMismatch {
                detail: format!(
                    "`{}` takes {} type argument(s), the service takes {}",
                    generic.name(),
                    generic.arity(),
                    service.arity()
                ),
                service,
            }),
            (ServiceShape::OpenGeneric, Implementation::Component(component)) => Err(AdapterError::ShapeMismatch {
                detail: format!("`{}` is not a generic component", component.name()),
                service,
            }),
            (ServiceShape::Plain | ServiceShape::ClosedGeneric, Implementation::Generic(generic)) => {
                Err(AdapterError::ShapeMismatch {
                    detail: format!("generic component `{}` needs an open generic service", generic.name()),
                    service,
                })
            }
        }
    }

    /// Run `f` with `service` on the resolution stack.
    fn guarded<T>(
        &mut self,
        service: &ServiceType,
        f: impl FnOnce(&mut Self) -> AdapterResult<T>,
    ) -> AdapterResult<T> {
        if self.resolving.contains(service) {
            let mut path = self.resolving.clone();
            path.push(service.clone());
            return Err(AdapterError::Recursion(path));
        }
        self.resolving.push(service.clone());
        let result = f(self);
        self.resolving.pop();
        result
    }

    fn activate(&mut self, service: &ServiceType, registration: &Registration) -> AdapterResult<Instance> {
        let component = match &registration.provided {
            Provided::Instance(instance) => return Ok(instance.clone()),
            Provided::Component(component) => component.clone(),
            Provided::Generic(generic) => generic.specialize(service.arguments()),
        };

        let key = (service.clone(), registration.id);
        if registration.lifetime == Lifetime::Singleton {
            if let Some(instance) = self.singletons.get(&key) {
                return Ok(instance.clone());
            }
        }

        let instance = self.guarded(service, |this| {
            let dependencies = component
                .dependencies()
                .iter()
                .map(|dependency| this.resolve(dependency))
                .collect::<AdapterResult<Vec<_>>>()?;
            component.construct(&dependencies)
        })?;

        if registration.lifetime == Lifetime::Singleton {
            self.singletons.insert(key, instance.clone());
        }
        Ok(instance)
    }

    /// Every registration that can produce `service`, in registration order.
    fn candidates(&self, service: &ServiceType) -> Vec<Registration> {
        let mut found: Vec<Registration> = self.registrations.get(service).cloned().unwrap_or_default();
        if let Some(definition) = service.definition() {
            if let Some(generic) = self.generics.get(&definition) {
                found.extend(generic.iter().cloned());
            }
        }
        found.sort_by_key(|r| r.id);
        found
    }
}

impl FrameworkAdapter for RegistryAdapter {
    fn register_singleton(&mut self, service: ServiceType, implementation: Implementation) -> AdapterResult<()> {
        self.register(service, Lifetime::Singleton, implementation)
    }

    fn register_transient(&mut self, service: ServiceType, implementation: Implementation) -> AdapterResult<()> {
        self.register(service, Lifetime::Transient, implementation)
    }

    fn register_instance(&mut self, service: ServiceType, instance: Instance) -> AdapterResult<()> {
        if service.shape() == ServiceShape::OpenGeneric {
            return Err(AdapterError::ShapeMismatch {
                service,
                detail: "an instance cannot stand in for an open generic".to_string(),
            });
        }
        let id = self.next_id;
        self.next_id += 1;
        self.registrations.entry(service).or_default().push(Registration {
            id,
            lifetime: Lifetime::Singleton,
            provided: Provided::Instance(instance),
        });
        Ok(())
    }

    fn resolve(&mut self, service: &ServiceType) -> AdapterResult<Instance> {
        tracing::trace!(%service, depth = self.resolving.len(), "resolve");
        if let Some(registration) = self.candidates(service).pop() {
            return self.activate(service, &registration);
        }
        if let Some(item) = service.list_item() {
            let item = item.clone();
            return self.guarded(service, |this| {
                let all = this.resolve_all(&item)?;
                Ok(Instance::new("List", all))
            });
        }
        Err(AdapterError::NotRegistered(service.clone()))
    }

    fn resolve_all(&mut self, service: &ServiceType) -> AdapterResult<Vec<Instance>> {
        self.candidates(service)
            .iter()
            .map(|registration| self.activate(service, registration))
            .collect()
    }
}
