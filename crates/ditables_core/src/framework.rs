//! Frameworks under test.

use std::fmt;
use std::sync::Arc;

use crate::adapter::{Capabilities, FrameworkAdapter};
use crate::metadata::string_id;

string_id!(
    /// Identity of a framework column.
    FrameworkId
);

/// Builds a fresh adapter for a framework.
pub type AdapterFactory = Arc<dyn Fn() -> Box<dyn FrameworkAdapter> + Send + Sync>;

/// How adapter instances are shared between the runs of one framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdapterIsolation {
    /// Every run gets its own adapter; runs share no state.
    #[default]
    FreshPerRun,
    /// One adapter per report; the framework's runs are serialized against each other.
    SharedPerReport,
}

/// One framework participating in a report.
#[derive(Clone)]
pub struct FrameworkUnderTest {
    pub id: FrameworkId,
    pub display_name: String,
    pub version: Option<String>,
    pub url: Option<String>,
    pub isolation: AdapterIsolation,
    capabilities: Capabilities,
    factory: AdapterFactory,
}

impl FrameworkUnderTest {
    /// Declare a framework. The factory is invoked once here to read the adapter's capability flags.
    pub fn new<F>(id: impl Into<FrameworkId>, display_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn FrameworkAdapter> + Send + Sync + 'static,
    {
        let capabilities = factory().capabilities();
        Self {
            id: id.into(),
            display_name: display_name.into(),
            version: None,
            url: None,
            isolation: AdapterIsolation::default(),
            capabilities,
            factory: Arc::new(factory),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_isolation(mut self, isolation: AdapterIsolation) -> Self {
        self.isolation = isolation;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn factory(&self) -> AdapterFactory {
        Arc::clone(&self.factory)
    }

    pub fn create_adapter(&self) -> Box<dyn FrameworkAdapter> {
        (self.factory)()
    }
}

impl fmt::Debug for FrameworkUnderTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameworkUnderTest")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("version", &self.version)
            .field("isolation", &self.isolation)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}
