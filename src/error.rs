//! Report-level errors.
//!
//! Nothing that happens inside a single (test, framework) run ends up here; those become outcomes. A `ReportError`
//! means no complete report can be produced.

use ditables_core::{CatalogError, FrameworkId, TestId};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("invalid feature catalog: {0}")]
    #[diagnostic(
        code(ditables::catalog),
        help("every group and test id must be unique and every test must name a declared group")
    )]
    Catalog(#[from] CatalogError),

    #[error("framework `{0}` is listed more than once")]
    #[diagnostic(code(ditables::duplicate_framework))]
    DuplicateFramework(FrameworkId),

    #[error("no frameworks selected")]
    #[diagnostic(code(ditables::no_frameworks), help("run `ditables frameworks` to list the available ids"))]
    NoFrameworks,

    #[error("no run was scheduled for test `{test}` on framework `{framework}`")]
    #[diagnostic(code(ditables::missing_run), help("this is a bug in the scheduler"))]
    MissingRun { test: TestId, framework: FrameworkId },

    #[error("failed to write report: {0}")]
    #[diagnostic(code(ditables::io))]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ditables_core::GroupId;

    #[test]
    fn test_catalog_error_message() {
        let err = ReportError::from(CatalogError::DuplicateGroup(GroupId::from("basic")));
        assert_eq!(
            err.to_string(),
            "invalid feature catalog: feature group `basic` is declared more than once"
        );
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("ditables::catalog"));
    }

    #[test]
    fn test_missing_run_message() {
        let err = ReportError::MissingRun {
            test: TestId::from("basic.singleton"),
            framework: FrameworkId::from("sliver"),
        };
        assert_eq!(
            err.to_string(),
            "no run was scheduled for test `basic.singleton` on framework `sliver`"
        );
    }
}
