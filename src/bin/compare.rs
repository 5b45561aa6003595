//! Schema Compare CLI
//!
//! Compares the JSON schemas of two directories and writes a diff report.
//!
//! Usage:
//!   schema-compare --first-directory api/v1 --second-directory api/v2 \
//!       --first-prefix v1_ --second-prefix v2_
//!   schema-compare --first-directory schemas/v1 --version v1 --next-version v2
//!   schema-compare --help

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use schema_compare::{
    comparator, report, CompareConfig, CompareError, ComparisonSession, Convention, Engine,
    OutcomeKind, RunSummary,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-compare")]
#[command(about = "Compare JSON schemas between two directories")]
struct Cli {
    /// Path to first directory containing schemas
    #[arg(long, visible_alias = "first_directory")]
    first_directory: PathBuf,

    /// Path to second directory containing schemas
    #[arg(
        long,
        visible_alias = "second_directory",
        requires_all = ["first_prefix", "second_prefix"],
        conflicts_with_all = ["version", "next_version"]
    )]
    second_directory: Option<PathBuf>,

    /// File name prefix for schemas in first directory
    #[arg(long, visible_alias = "first_prefix", requires = "second_directory")]
    first_prefix: Option<String>,

    /// File name prefix for schemas in second directory
    #[arg(long, visible_alias = "second_prefix", requires = "second_directory")]
    second_prefix: Option<String>,

    /// Version token in the first directory path and its file names
    #[arg(long, requires = "next_version")]
    version: Option<String>,

    /// Version token replacing --version to locate the second directory
    #[arg(long, visible_alias = "next_version", requires = "version")]
    next_version: Option<String>,

    /// Path for output results file (default: schema_comparison_results.txt)
    #[arg(short, long, visible_alias = "output_file")]
    output_file: Option<PathBuf>,

    /// Comparison engine (overrides configuration)
    #[arg(short, long, value_enum)]
    engine: Option<Engine>,

    /// Summary format printed on stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Configuration file layered over the default locations
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn convention(&self) -> anyhow::Result<Convention> {
        match (
            &self.second_directory,
            &self.first_prefix,
            &self.second_prefix,
            &self.version,
            &self.next_version,
        ) {
            (Some(second), Some(first_prefix), Some(second_prefix), None, None) => {
                Ok(Convention::Explicit {
                    first_directory: self.first_directory.clone(),
                    second_directory: second.clone(),
                    first_prefix: first_prefix.clone(),
                    second_prefix: second_prefix.clone(),
                })
            }
            (None, None, None, Some(version), Some(next_version)) => {
                Ok(Convention::VersionSubstitution {
                    first_directory: self.first_directory.clone(),
                    version: version.clone(),
                    next_version: next_version.clone(),
                })
            }
            _ => bail!(
                "pass either --second-directory with --first-prefix and --second-prefix, \
                 or --version with --next-version"
            ),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }

    if let Err(e) = run(cli, cancelled) {
        match e.downcast_ref::<CompareError>() {
            Some(CompareError::Interrupted) => {
                eprintln!("\nComparison interrupted by user.");
                std::process::exit(130);
            }
            Some(err) if err.is_configuration() => {
                eprintln!("❌ Configuration error: {}", err);
            }
            _ => eprintln!("❌ Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, cancelled: Arc<AtomicBool>) -> anyhow::Result<()> {
    let mut config = CompareConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(engine) = cli.engine {
        config.report.engine = engine;
    }

    let convention = cli.convention()?;
    let session = ComparisonSession::from_config(
        &convention,
        &config,
        cli.output_file.as_deref(),
        comparator::from_config(&config),
    )?
    .with_cancel_flag(cancelled);

    if matches!(cli.format, OutputFormat::Text) {
        println!(
            "🔍 Comparing {} ('{}') with {} ('{}')",
            session.first().directory.display(),
            session.first().prefix(),
            session.second().directory.display(),
            session.second().prefix()
        );
    }

    let summary = session.run()?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print_text_summary(&summary),
    }

    Ok(())
}

fn print_text_summary(summary: &RunSummary) {
    if !summary.has_matches() {
        println!("{}", report::NO_MATCHES);
    } else {
        println!("📊 SUMMARY:");
        println!("   Identical: {}", summary.count(OutcomeKind::Identical));
        println!("   Different: {}", summary.count(OutcomeKind::Different));
        println!("   Failed:    {}", summary.count(OutcomeKind::Failed));
        println!("   Only in first:  {}", summary.first_only.len());
        println!("   Only in second: {}", summary.second_only.len());
    }
    println!("\nResults saved to '{}'.", summary.output.display());
}
