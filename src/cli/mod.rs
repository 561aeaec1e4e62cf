//! CLI module for ditables
//!
//! This module provides the command-line interface.
//!
//! ## Commands
//!
//! - `report` - Run the feature suite and write the report
//! - `list` - List feature groups and tests in display order
//! - `frameworks` - List the bundled frameworks
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::RunConfig;
use crate::report::ReportFormat;
use crate::version::DITABLES_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Dependency-injection framework feature tables
#[derive(Parser, Debug)]
#[command(name = "ditables")]
#[command(version = DITABLES_VERSION)]
#[command(about = "Compare dependency-injection frameworks feature by feature", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the feature suite and write the report
    Report(ReportArgs),

    /// List feature groups and tests in display order
    List {
        /// Only tests whose id or name contains this keyword
        #[arg(short = 'k', value_name = "KEYWORD")]
        filter: Option<String>,
    },

    /// List the bundled frameworks and their capability flags
    Frameworks,
}

/// Output format flag
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum number of concurrent runs (0 = unbounded)
    #[arg(short = 'j', long = "jobs", value_name = "JOBS", default_value_t = 0)]
    pub jobs: usize,

    /// Time budget per run in milliseconds
    #[arg(long = "timeout-ms", value_name = "MS", conflicts_with = "no_timeout")]
    pub timeout_ms: Option<u64>,

    /// Let runs take as long as they need
    #[arg(long = "no-timeout")]
    pub no_timeout: bool,

    /// Only include these frameworks (repeatable)
    #[arg(short = 'f', long = "framework", value_name = "FRAMEWORK")]
    pub frameworks: Vec<String>,

    /// Only run tests whose id or name contains this keyword
    #[arg(short = 'k', value_name = "KEYWORD")]
    pub filter: Option<String>,

    /// Text substituted for scrubbed paths
    #[arg(long = "redaction-marker", value_name = "TEXT")]
    pub redaction_marker: Option<String>,

    /// Leave POSIX absolute paths in failure traces untouched
    #[arg(long = "keep-posix-paths")]
    pub keep_posix_paths: bool,
}

impl ReportArgs {
    /// Engine configuration selected by these flags.
    pub fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new()
            .with_max_concurrency(self.jobs)
            .with_posix_paths(!self.keep_posix_paths);
        if self.no_timeout {
            config = config.with_timeout(None);
        } else if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(Some(Duration::from_millis(ms)));
        }
        if let Some(marker) = &self.redaction_marker {
            config = config.with_redaction_marker(marker.clone());
        }
        config
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Report(args) => commands::report(&args),
        Command::List { filter } => commands::list(filter.as_deref()),
        Command::Frameworks => commands::frameworks(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn report_args(args: &[&str]) -> ReportArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Report(args) => args,
            other => panic!("Expected Report command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_report_defaults() {
        let args = report_args(&["ditables", "report"]);
        assert_eq!(args.format, OutputFormat::Markdown);
        assert!(args.frameworks.is_empty());
        assert_eq!(args.run_config(), RunConfig::default());
    }

    #[test]
    fn test_cli_parse_report_flags() {
        let args = report_args(&[
            "ditables",
            "report",
            "--format",
            "json",
            "-o",
            "out.json",
            "-j",
            "4",
            "--timeout-ms",
            "250",
            "-f",
            "registry",
            "-f",
            "sliver",
            "-k",
            "generic",
            "--redaction-marker",
            "<path>",
            "--keep-posix-paths",
        ]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.frameworks, ["registry", "sliver"]);
        assert_eq!(args.filter.as_deref(), Some("generic"));

        let config = args.run_config();
        assert_eq!(config.max_concurrency, Some(4));
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.redaction_marker, "<path>");
        assert!(!config.scrub_posix_paths);
    }

    #[test]
    fn test_cli_parse_no_timeout() {
        let args = report_args(&["ditables", "report", "--no-timeout"]);
        assert_eq!(args.run_config().timeout, None);
    }

    #[test]
    fn test_cli_timeout_flags_conflict() {
        assert!(Cli::try_parse_from(["ditables", "report", "--no-timeout", "--timeout-ms", "5"]).is_err());
    }

    #[test]
    fn test_cli_parse_list_and_frameworks() {
        let cli = Cli::try_parse_from(["ditables", "list", "-k", "singleton"]).unwrap();
        assert!(matches!(cli.command, Command::List { filter: Some(_) }));

        let cli = Cli::try_parse_from(["ditables", "frameworks"]).unwrap();
        assert!(matches!(cli.command, Command::Frameworks));
    }
}
