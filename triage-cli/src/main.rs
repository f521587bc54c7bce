#![deny(missing_docs)]
//! Triage command-line interface.
//!
//! Provides bug-report analysis, defect-signature scanning, and incident
//! record parsing workflows.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use triage_core::{
    DiagnosticScanner, IssueRecord, StdFileSystem, analyze_issue, default_patterns,
    default_priority_matrix, parse_incident_record, render_json, render_scan_summary,
    render_triage_markdown, write_report,
};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "triage", version, about = "Bug report triage and defect signature scanning")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a bug report and print a triage comment or JSON analysis.
    Analyze {
        /// Issue number to fetch from the tracker (unimplemented; use --from-file).
        issue_number: Option<u64>,
        /// JSON file containing issue data ({"title": ..., "body": ...}).
        #[arg(long = "from-file")]
        from_file: Option<PathBuf>,
        /// Output format for the analysis.
        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
    /// Scan a source tree for known defect signatures.
    Scan {
        /// Repository root to scan.
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Parse an incident record file and print it as JSON.
    Incident {
        /// Path to the incident record (COPILOT_ERROR_*.md) file.
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> CliResult<ExitCode> {
    match command {
        Commands::Analyze {
            issue_number,
            from_file,
            format,
        } => run_analyze(issue_number, from_file, format),
        Commands::Scan { path } => run_scan(&path),
        Commands::Incident { file } => run_incident(&file),
    }
}

fn run_analyze(
    issue_number: Option<u64>,
    from_file: Option<PathBuf>,
    format: OutputFormat,
) -> CliResult<ExitCode> {
    let Some(path) = from_file else {
        if issue_number.is_some() {
            eprintln!("Note: Fetching from the issue tracker is not implemented.");
            eprintln!("Use --from-file to provide issue data as JSON.");
            return Ok(ExitCode::FAILURE);
        }
        return Err("provide an issue number or --from-file".into());
    };

    let raw = std::fs::read_to_string(&path)
        .map_err(|error| format!("cannot read {}: {error}", path.display()))?;
    let record: IssueRecord = serde_json::from_str(&raw)
        .map_err(|error| format!("invalid issue data in {}: {error}", path.display()))?;

    let analysis = analyze_issue(&record, &default_patterns(), &default_priority_matrix());
    match format {
        OutputFormat::Json => println!("{}", render_json(&analysis)?),
        OutputFormat::Markdown => println!("{}", render_triage_markdown(&analysis)),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_scan(root: &Path) -> CliResult<ExitCode> {
    let scanner = DiagnosticScanner::new(StdFileSystem::new());
    let report = scanner.run(root);

    print!("{}", render_scan_summary(&report));
    let report_path = write_report(&report, root)?;
    println!("\nDetailed report saved to: {}", report_path.display());

    if report.has_blocking_findings() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_incident(file: &Path) -> CliResult<ExitCode> {
    let content = std::fs::read_to_string(file)
        .map_err(|error| format!("cannot read {}: {error}", file.display()))?;
    let record = parse_incident_record(&content)?;
    println!("{}", render_json(&record)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, OutputFormat};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn analyze_parses_from_file_and_format() {
        let cli = Cli::try_parse_from([
            "triage",
            "analyze",
            "--from-file",
            "issue.json",
            "--format",
            "json",
        ])
        .expect("parse");
        match cli.command {
            Commands::Analyze {
                issue_number,
                from_file,
                format,
            } => {
                assert_eq!(issue_number, None);
                assert_eq!(from_file, Some(PathBuf::from("issue.json")));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn analyze_defaults_to_markdown() {
        let cli = Cli::try_parse_from(["triage", "analyze", "42"]).expect("parse");
        match cli.command {
            Commands::Analyze {
                issue_number,
                format,
                ..
            } => {
                assert_eq!(issue_number, Some(42));
                assert_eq!(format, OutputFormat::Markdown);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn scan_path_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["triage", "scan"]).expect("parse");
        match cli.command {
            Commands::Scan { path } => assert_eq!(path, PathBuf::from(".")),
            _ => panic!("expected scan command"),
        }
    }
}
