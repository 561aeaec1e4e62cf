//! Provide the shared vocabulary of the ditables feature-table engine.
//!
//! This crate is intentionally small and dependency-free. It holds everything both the engine and the framework
//! adapters need to agree on:
//! - the adapter capability interface (`FrameworkAdapter`) and the service model it speaks (`ServiceType`,
//!   `Component`, `Instance`),
//! - feature-test metadata (`FeatureGroup`, `FeatureTest`, `Catalog`) and its display ordering,
//! - the outcome model (`TestOutcome`) and the table structures handed to renderers (`FeatureTable`, `FeatureCell`).
//!
//! ## Notes
//!
//! - **No IO** and no global state live here. Scheduling, sanitizing and rendering belong to the `ditables` crate.
//! - Errors implement `std::error::Error` by hand so adapters can depend on this crate without pulling in a stack.

pub mod adapter;
pub mod catalog;
pub mod check;
pub mod framework;
pub mod metadata;
pub mod ordering;
pub mod outcome;
pub mod service;
pub mod table;

pub use adapter::{AdapterError, AdapterResult, Capabilities, FrameworkAdapter};
pub use catalog::{Catalog, CatalogError};
pub use check::{Fault, FeatureResult, FeatureSignal, concern, skip_due_to_dependency};
pub use framework::{AdapterFactory, AdapterIsolation, FrameworkId, FrameworkUnderTest};
pub use metadata::{DisplayOrder, FeatureCheck, FeatureGroup, FeatureTest, GroupId, Scoring, TestId};
pub use ordering::{OrderedGroup, group_and_order};
pub use outcome::{FailureDetail, OutcomeKind, TestOutcome};
pub use service::{Component, GenericComponent, Implementation, Instance, ServiceShape, ServiceType};
pub use table::{Feature, FeatureCell, FeatureRow, FeatureState, FeatureTable, FrameworkColumn};
