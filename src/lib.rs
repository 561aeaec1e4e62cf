#![forbid(unsafe_code)]
//! ditables: dependency-injection framework feature tables
//!
//! Runs a catalog of feature tests against several DI frameworks concurrently and assembles the outcomes into one
//! comparison table per feature group. Tables stream out in display order as soon as their runs complete; failure
//! traces are scrubbed of local paths and embedded as data URIs.
//!
//! ## Layout
//!
//! - `ditables_core` (workspace crate): adapter interface, metadata, outcome model and table structures.
//! - `engine`: runner, scheduler, sanitizer and table assembly.
//! - `report`: Markdown and JSON renderers.
//! - `suite`: the built-in feature catalog.
//! - `cli`: command-line interface.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Feature checks**: panics raised inside a check are captured and reported as failures; they are never used for
//!   control flow.
//!
//! - **True invariants**: If a panic represents a logic error, use `.expect("INVARIANT: reason")` with a clear
//!   explanation.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod suite;
pub mod version;

pub use config::RunConfig;
pub use engine::ReportEngine;
pub use error::ReportError;
pub use version::DITABLES_VERSION;
