//! Reference framework adapters.
//!
//! Two in-process containers with deliberately different feature sets, so a report always has something to
//! compare. Each is exposed as a `FrameworkUnderTest` through [`frameworks`].

pub mod registry;
pub mod sliver;

use ditables_core::FrameworkUnderTest;

pub use registry::RegistryAdapter;
pub use sliver::SliverAdapter;

/// All bundled frameworks, in column order.
pub fn frameworks() -> Vec<FrameworkUnderTest> {
    vec![
        FrameworkUnderTest::new("registry", "Registry", || Box::new(RegistryAdapter::new()))
            .with_version(env!("CARGO_PKG_VERSION")),
        FrameworkUnderTest::new("sliver", "Sliver", || Box::new(SliverAdapter::new()))
            .with_version(env!("CARGO_PKG_VERSION")),
    ]
}
