//! Service model spoken between feature tests and framework adapters.
//!
//! A `ServiceType` names what is requested from a container. Implementations are explicit values instead of
//! runtime types: a `Component` knows its dependencies and how to construct itself from them, and a
//! `GenericComponent` knows how to specialize itself for the arguments of a closed generic service.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::adapter::{AdapterError, AdapterResult};

/// Shape of a service type, used by adapters to pick a registration path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceShape {
    /// A non-generic service (`IService`).
    Plain,
    /// A generic definition without arguments (`IRepository<>`).
    OpenGeneric,
    /// A generic service with all arguments supplied (`IRepository<User>`).
    ClosedGeneric,
}

/// Identify a service requested from a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceType {
    name: Cow<'static, str>,
    arity: usize,
    arguments: Vec<ServiceType>,
}

impl ServiceType {
    /// Collection service. Adapters that support it resolve `IEnumerable<T>` to every registration of `T`.
    pub const LIST: ServiceType = ServiceType::generic_definition("IEnumerable", 1);

    /// A plain, non-generic service.
    pub const fn named(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            arity: 0,
            arguments: Vec::new(),
        }
    }

    /// An open generic definition taking `arity` type arguments.
    pub const fn generic_definition(name: &'static str, arity: usize) -> Self {
        Self {
            name: Cow::Borrowed(name),
            arity,
            arguments: Vec::new(),
        }
    }

    /// Close an open generic definition over `arguments`.
    ///
    /// ## Errors
    ///
    /// Returns `AdapterError::ShapeMismatch` if `self` is not an open definition or the argument count differs
    /// from its arity.
    pub fn close(&self, arguments: impl IntoIterator<Item = ServiceType>) -> AdapterResult<ServiceType> {
        let arguments: Vec<ServiceType> = arguments.into_iter().collect();
        if self.shape() != ServiceShape::OpenGeneric {
            return Err(AdapterError::ShapeMismatch {
                service: self.clone(),
                detail: "only open generic definitions can be closed".to_string(),
            });
        }
        if arguments.len() != self.arity {
            return Err(AdapterError::ShapeMismatch {
                service: self.clone(),
                detail: format!("expected {} type argument(s), got {}", self.arity, arguments.len()),
            });
        }
        Ok(Self {
            name: self.name.clone(),
            arity: self.arity,
            arguments,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn arguments(&self) -> &[ServiceType] {
        &self.arguments
    }

    pub fn shape(&self) -> ServiceShape {
        if self.arity == 0 {
            ServiceShape::Plain
        } else if self.arguments.is_empty() {
            ServiceShape::OpenGeneric
        } else {
            ServiceShape::ClosedGeneric
        }
    }

    /// `IEnumerable<item>`.
    pub fn list_of(item: ServiceType) -> ServiceType {
        Self {
            name: Self::LIST.name,
            arity: 1,
            arguments: vec![item],
        }
    }

    /// The item type if `self` is a collection service.
    pub fn list_item(&self) -> Option<&ServiceType> {
        match self.arguments.as_slice() {
            [item] if self.name == Self::LIST.name => Some(item),
            _ => None,
        }
    }

    /// The open definition of a closed generic service, or `None` for any other shape.
    pub fn definition(&self) -> Option<ServiceType> {
        match self.shape() {
            ServiceShape::ClosedGeneric => Some(Self {
                name: self.name.clone(),
                arity: self.arity,
                arguments: Vec::new(),
            }),
            ServiceShape::Plain | ServiceShape::OpenGeneric => None,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match self.shape() {
            ServiceShape::Plain => Ok(()),
            ServiceShape::OpenGeneric => write!(f, "<{}>", ",".repeat(self.arity - 1)),
            ServiceShape::ClosedGeneric => {
                f.write_str("<")?;
                for (i, arg) in self.arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
        }
    }
}

/// A resolved service instance.
///
/// Identity matters for lifetime checks: two instances are the same object only if they share the same allocation.
#[derive(Clone)]
pub struct Instance {
    component: Cow<'static, str>,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T: Any + Send + Sync>(component: impl Into<Cow<'static, str>>, value: T) -> Self {
        Self {
            component: component.into(),
            value: Arc::new(value),
        }
    }

    /// Name of the component that produced this instance.
    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Whether `self` and `other` are the same object.
    pub fn same_as(&self, other: &Instance) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.value), Arc::as_ptr(&other.value))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("component", &self.component)
            .field("addr", &Arc::as_ptr(&self.value).cast::<()>())
            .finish()
    }
}

type Construct = Arc<dyn Fn(&[Instance]) -> AdapterResult<Instance> + Send + Sync>;
type Specialize = Arc<dyn Fn(&[ServiceType]) -> Component + Send + Sync>;

/// A concrete implementation: its dependencies, resolved in order, are passed to `construct`.
#[derive(Clone)]
pub struct Component {
    name: Cow<'static, str>,
    dependencies: Vec<ServiceType>,
    construct: Construct,
}

impl Component {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, dependencies: Vec<ServiceType>, construct: F) -> Self
    where
        F: Fn(&[Instance]) -> AdapterResult<Instance> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            dependencies,
            construct: Arc::new(construct),
        }
    }

    /// A component without dependencies that builds a fresh `T` on every construction.
    pub fn leaf<T, F>(name: &'static str, make: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(name, Vec::new(), move |_| Ok(Instance::new(name, make())))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[ServiceType] {
        &self.dependencies
    }

    /// Build an instance from already resolved dependencies.
    ///
    /// ## Errors
    ///
    /// Returns `AdapterError::Construction` if the number of dependencies does not match the declaration, or
    /// whatever the construct closure reports.
    pub fn construct(&self, dependencies: &[Instance]) -> AdapterResult<Instance> {
        if dependencies.len() != self.dependencies.len() {
            return Err(AdapterError::Construction {
                component: self.name.to_string(),
                message: format!(
                    "expected {} dependencies, got {}",
                    self.dependencies.len(),
                    dependencies.len()
                ),
            });
        }
        (self.construct)(dependencies)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// An implementation of an open generic definition (`Repository<>` for `IRepository<>`).
#[derive(Clone)]
pub struct GenericComponent {
    name: Cow<'static, str>,
    arity: usize,
    specialize: Specialize,
}

impl GenericComponent {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, arity: usize, specialize: F) -> Self
    where
        F: Fn(&[ServiceType]) -> Component + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            specialize: Arc::new(specialize),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Produce the closed component for the arguments of a closed generic service.
    pub fn specialize(&self, arguments: &[ServiceType]) -> Component {
        (self.specialize)(arguments)
    }
}

impl fmt::Debug for GenericComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericComponent")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// What gets registered against a service type.
#[derive(Debug, Clone)]
pub enum Implementation {
    Component(Component),
    Generic(GenericComponent),
}

impl Implementation {
    pub fn name(&self) -> &str {
        match self {
            Implementation::Component(c) => c.name(),
            Implementation::Generic(g) => g.name(),
        }
    }
}

impl From<Component> for Implementation {
    fn from(component: Component) -> Self {
        Implementation::Component(component)
    }
}

impl From<GenericComponent> for Implementation {
    fn from(component: GenericComponent) -> Self {
        Implementation::Generic(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: ServiceType = ServiceType::generic_definition("IRepository", 1);
    const USER: ServiceType = ServiceType::named("User");

    // ========================================
    // ServiceType shape tests
    // ========================================

    #[test]
    fn test_plain_shape() {
        assert_eq!(USER.shape(), ServiceShape::Plain);
        assert_eq!(USER.to_string(), "User");
        assert!(USER.definition().is_none());
    }

    #[test]
    fn test_open_generic_display() {
        assert_eq!(REPO.shape(), ServiceShape::OpenGeneric);
        assert_eq!(REPO.to_string(), "IRepository<>");
        assert_eq!(ServiceType::generic_definition("IMap", 2).to_string(), "IMap<,>");
    }

    #[test]
    fn test_close_generic() {
        let closed = REPO.close([USER]).unwrap();
        assert_eq!(closed.shape(), ServiceShape::ClosedGeneric);
        assert_eq!(closed.to_string(), "IRepository<User>");
        assert_eq!(closed.definition(), Some(REPO));
    }

    #[test]
    fn test_list_of() {
        let list = ServiceType::list_of(USER);
        assert_eq!(list.to_string(), "IEnumerable<User>");
        assert_eq!(list.list_item(), Some(&USER));
        assert_eq!(list.definition(), Some(ServiceType::LIST));
        assert!(REPO.close([USER]).unwrap().list_item().is_none());
    }

    #[test]
    fn test_close_wrong_arity() {
        let err = REPO.close([USER, USER]).unwrap_err();
        assert!(matches!(err, AdapterError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_close_plain_is_rejected() {
        assert!(USER.close([]).is_err());
    }

    // ========================================
    // Instance identity tests
    // ========================================

    #[test]
    fn test_instance_identity() {
        let a = Instance::new("Service", 1_u32);
        let b = a.clone();
        let c = Instance::new("Service", 1_u32);
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
        assert_eq!(a.downcast_ref::<u32>(), Some(&1));
        assert_eq!(a.component(), "Service");
    }

    // ========================================
    // Component tests
    // ========================================

    #[test]
    fn test_component_checks_dependency_count() {
        let component = Component::new("NeedsOne", vec![USER], |deps| Ok(deps[0].clone()));
        let err = component.construct(&[]).unwrap_err();
        assert!(matches!(err, AdapterError::Construction { .. }));
    }

    #[test]
    fn test_leaf_builds_fresh_values() {
        let component = Component::leaf("Counter", || 7_i64);
        let a = component.construct(&[]).unwrap();
        let b = component.construct(&[]).unwrap();
        assert!(!a.same_as(&b));
        assert_eq!(a.component(), "Counter");
    }

    #[test]
    fn test_generic_specialize() {
        let generic = GenericComponent::new("Repository<>", 1, |args| {
            let item = args[0].clone();
            Component::new("Repository", Vec::new(), move |_| Ok(Instance::new("Repository", item.clone())))
        });
        let component = generic.specialize(&[USER]);
        let instance = component.construct(&[]).unwrap();
        assert_eq!(instance.downcast_ref::<ServiceType>(), Some(&USER));
    }
}
