//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use ditables_core::{Catalog, FeatureTable, FrameworkUnderTest, group_and_order};
use futures::StreamExt;

use super::{CliError, CliResult, ExitCode, ReportArgs};
use crate::engine::ReportEngine;
use crate::error::ReportError;
use crate::report::{ReportFormat, json, markdown};
use crate::suite;

// ============================================================================
// report
// ============================================================================

/// Run the built-in suite against the selected frameworks and write the report.
pub fn report(args: &ReportArgs) -> CliResult<ExitCode> {
    let frameworks = select_frameworks(ditables_frameworks::frameworks(), &args.frameworks)?;
    let catalog = select_tests(suite::catalog(), args.filter.as_deref())?;
    let engine = ReportEngine::new(args.run_config());
    let format = ReportFormat::from(args.format);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Error starting async runtime: {}", e)))?;

    let mut out = open_output(args.output.as_deref())?;
    let tables = runtime
        .block_on(write_report(&engine, &catalog, &frameworks, format, &mut out))
        .map_err(diagnostic)?;

    tracing::info!(tables, "report written");
    Ok(ExitCode::SUCCESS)
}

/// Stream tables into `out`. Markdown is written table by table; JSON needs the whole report.
async fn write_report(
    engine: &ReportEngine,
    catalog: &Catalog,
    frameworks: &[FrameworkUnderTest],
    format: ReportFormat,
    out: &mut dyn Write,
) -> Result<usize, ReportError> {
    let mut stream = engine.stream(catalog, frameworks)?;
    let mut tables: Vec<FeatureTable> = Vec::new();

    if format == ReportFormat::Markdown {
        out.write_all(markdown::render_header().as_bytes())?;
    }
    while let Some(table) = stream.next().await {
        let table = table?;
        if format == ReportFormat::Markdown {
            out.write_all(b"\n")?;
            out.write_all(markdown::render_table(&table).as_bytes())?;
            out.flush()?;
        }
        tables.push(table);
    }
    if format == ReportFormat::Json {
        out.write_all(json::render(&tables).as_bytes())?;
    }
    out.flush()?;
    Ok(tables.len())
}

fn open_output(path: Option<&Path>) -> CliResult<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| CliError::failure(format!("Cannot create '{}': {}", path.display(), e)))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Keep the frameworks named in `ids`, in the order given. An empty list keeps all of them.
pub fn select_frameworks(all: Vec<FrameworkUnderTest>, ids: &[String]) -> CliResult<Vec<FrameworkUnderTest>> {
    if ids.is_empty() {
        return Ok(all);
    }
    ids.iter()
        .map(|id| {
            all.iter().find(|f| f.id.as_str() == id).cloned().ok_or_else(|| {
                let known: Vec<&str> = all.iter().map(|f| f.id.as_str()).collect();
                CliError::failure(format!("Unknown framework '{}' (known: {})", id, known.join(", ")))
            })
        })
        .collect()
}

fn select_tests(catalog: Catalog, filter: Option<&str>) -> CliResult<Catalog> {
    let Some(keyword) = filter else {
        return Ok(catalog);
    };
    let filtered = catalog.filtered(keyword);
    if filtered.is_empty() {
        return Err(CliError::failure(format!("No feature tests match '{}'", keyword)));
    }
    Ok(filtered)
}

/// Render a report error with miette's diagnostic formatting.
fn diagnostic(error: ReportError) -> CliError {
    CliError::failure(format!("{:?}", miette::Report::new(error)))
}

// ============================================================================
// list / frameworks
// ============================================================================

/// Print groups and tests in display order.
pub fn list(filter: Option<&str>) -> CliResult<ExitCode> {
    let catalog = select_tests(suite::catalog(), filter)?;
    let groups = group_and_order(catalog.groups(), catalog.tests())
        .map_err(|e| diagnostic(ReportError::from(e)))?;

    let mut out = io::stdout().lock();
    for group in &groups {
        let scoring = if group.group.scoring.is_scored() {
            format!("weight {}", group.group.scoring.value())
        } else {
            "not scored".to_string()
        };
        writeln!(out, "{} ({}, {})", group.group.display_name, group.group.id, scoring).map_err(write_error)?;
        for test in &group.tests {
            writeln!(out, "  {:<32} {}", test.id, test.display_name).map_err(write_error)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the bundled frameworks with version and capability flags.
pub fn frameworks() -> CliResult<ExitCode> {
    let mut out = io::stdout().lock();
    for framework in ditables_frameworks::frameworks() {
        let caps = framework.capabilities();
        writeln!(
            out,
            "{:<12} {} {}  crashes_on_recursion={} crashes_on_list_recursion={}",
            framework.id,
            framework.display_name,
            framework.version.as_deref().unwrap_or("-"),
            caps.crashes_on_recursion,
            caps.crashes_on_list_recursion,
        )
        .map_err(write_error)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn write_error(e: io::Error) -> CliError {
    CliError::failure(format!("Error writing output: {}", e))
}
