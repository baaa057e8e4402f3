//! Command-line entry point for the locale parity checker.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{
    Parser,
    ValueEnum,
};
use locale_parity::{
    CheckOptions,
    check_project,
};
use tracing_subscriber::EnvFilter;

/// Checks that every translated locale file carries every key of its baseline
#[derive(Parser, Debug)]
#[command(name = "locale-parity")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Project root containing `.locale-parity.json`
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also list keys that only a target locale carries
    #[arg(long)]
    report_extra: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.debug { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_writer(std::io::stderr)
        .init();

    let options = CheckOptions { report_extra: cli.report_extra };
    let report = match check_project(&cli.root, options) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Locale check failed: {e}");
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    match cli.format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                return ExitCode::from(2);
            }
        },
    }

    if report.is_clean() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
