//! Report renderers
//!
//! Renderers are pure functions from finished tables to text. Markdown can be produced one table at a time, so the
//! CLI writes each table as soon as the engine emits it.

pub mod json;
pub mod markdown;

use ditables_core::FeatureTable;

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

/// Render a complete report.
pub fn render(tables: &[FeatureTable], format: ReportFormat) -> String {
    match format {
        ReportFormat::Markdown => markdown::render(tables),
        ReportFormat::Json => json::render(tables),
    }
}
