//! Framework adapter capability interface.
//!
//! Each DI framework is wrapped by one implementation of `FrameworkAdapter`. Feature tests only ever talk to a
//! framework through this trait, so every framework is exercised by the exact same code.

use std::error::Error;
use std::fmt;

use crate::service::{Implementation, Instance, ServiceType};

/// Capability flags a feature test may consult before exercising risky behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Resolving a self-referencing service graph brings the process down instead of reporting an error.
    pub crashes_on_recursion: bool,
    /// Same as `crashes_on_recursion`, but for graphs that recurse through a collection dependency.
    pub crashes_on_list_recursion: bool,
}

/// Errors reported by adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// No registration exists for the service.
    NotRegistered(ServiceType),
    /// Resolution re-entered a service that is already being resolved. Carries the resolution path.
    Recursion(Vec<ServiceType>),
    /// The framework has no support for the requested operation.
    Unsupported(String),
    /// The implementation does not fit the service's shape (e.g. a plain component for an open generic).
    ShapeMismatch { service: ServiceType, detail: String },
    /// A component failed to construct.
    Construction { component: String, message: String },
    /// Any other framework-specific failure.
    Framework(String),
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::NotRegistered(service) => write!(f, "service `{service}` is not registered"),
            AdapterError::Recursion(path) => {
                f.write_str("recursive dependency detected: ")?;
                for (i, service) in path.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" -> ")?;
                    }
                    write!(f, "{service}")?;
                }
                Ok(())
            }
            AdapterError::Unsupported(what) => write!(f, "not supported: {what}"),
            AdapterError::ShapeMismatch { service, detail } => write!(f, "cannot register `{service}`: {detail}"),
            AdapterError::Construction { component, message } => {
                write!(f, "failed to construct `{component}`: {message}")
            }
            AdapterError::Framework(message) => f.write_str(message),
        }
    }
}

impl Error for AdapterError {}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Uniform capability interface over one DI framework.
///
/// All operations take `&mut self`: containers commonly accumulate registrations and build lazily on first
/// resolution. An adapter instance is used by one feature run at a time.
pub trait FrameworkAdapter: Send {
    /// Register `implementation` so every resolution of `service` yields the same instance.
    fn register_singleton(&mut self, service: ServiceType, implementation: Implementation) -> AdapterResult<()>;

    /// Register `implementation` so every resolution of `service` yields a new instance.
    fn register_transient(&mut self, service: ServiceType, implementation: Implementation) -> AdapterResult<()>;

    /// Register a pre-built instance for `service`.
    fn register_instance(&mut self, service: ServiceType, instance: Instance) -> AdapterResult<()>;

    /// Resolve one instance of `service`.
    fn resolve(&mut self, service: &ServiceType) -> AdapterResult<Instance>;

    /// Resolve every registration of `service`, in registration order.
    ///
    /// Not every framework supports this; the default reports `Unsupported`.
    fn resolve_all(&mut self, service: &ServiceType) -> AdapterResult<Vec<Instance>> {
        Err(AdapterError::Unsupported(format!("resolving all instances of `{service}`")))
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty;

    impl FrameworkAdapter for Empty {
        fn register_singleton(&mut self, _: ServiceType, _: Implementation) -> AdapterResult<()> {
            Ok(())
        }

        fn register_transient(&mut self, _: ServiceType, _: Implementation) -> AdapterResult<()> {
            Ok(())
        }

        fn register_instance(&mut self, _: ServiceType, _: Instance) -> AdapterResult<()> {
            Ok(())
        }

        fn resolve(&mut self, service: &ServiceType) -> AdapterResult<Instance> {
            Err(AdapterError::NotRegistered(service.clone()))
        }
    }

    #[test]
    fn test_resolve_all_defaults_to_unsupported() {
        let err = Empty.resolve_all(&ServiceType::named("IPlugin")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "not supported: resolving all instances of `IPlugin`"
        );
    }

    #[test]
    fn test_default_capabilities() {
        assert_eq!(Empty.capabilities(), Capabilities::default());
        assert!(!Empty.capabilities().crashes_on_recursion);
    }

    #[test]
    fn test_recursion_display() {
        let err = AdapterError::Recursion(vec![
            ServiceType::named("A"),
            ServiceType::named("B"),
            ServiceType::named("A"),
        ]);
        assert_eq!(err.to_string(), "recursive dependency detected: A -> B -> A");
    }

    #[test]
    fn test_not_registered_names_service() {
        let err = AdapterError::NotRegistered(ServiceType::named("IMissing"));
        assert!(err.to_string().contains("IMissing"));
    }
}
