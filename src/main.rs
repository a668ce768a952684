//! scoreagg - per-user score aggregation
//!
//! A CLI tool that averages the scores recorded for a named user from
//! paired name/score records and reports the result as text or JSON.
//!
//! Exit codes:
//!   0 - Success (target found, or summary-only run)
//!   1 - Runtime error (invalid input, config, I/O, etc.)
//!   2 - No records found for the target name

mod analysis;
mod cli;
mod config;
mod input;
mod models;
mod report;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{AggregateReport, Aggregation, ReportMetadata, ScoreTable};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration decides the default verbosity, so it is read before logging starts
    let (config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("An error occurred: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    debug!("scoreagg v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    origin.log();

    match run(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Aggregation failed: {:#}", e);
            eprintln!("An error occurred: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .scoreagg.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    // Reports go to stdout, diagnostics to stderr
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(args, config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Level used when `RUST_LOG` does not say otherwise.
fn default_log_level(args: &Args, config: &Config) -> Level {
    if !args.quiet && config.general.verbose {
        Level::DEBUG
    } else {
        args.log_level()
    }
}

/// `--verbose` and `--quiet` pin the level; otherwise `RUST_LOG` may refine it.
fn log_filter(args: &Args, config: &Config) -> EnvFilter {
    let level = LevelFilter::from_level(default_log_level(args, config));
    let builder = EnvFilter::builder().with_default_directive(level.into());

    if args.verbose || args.quiet {
        builder.parse_lossy("")
    } else {
        builder.from_env_lossy()
    }
}

/// Where the configuration came from, logged once the subscriber is installed.
enum ConfigOrigin {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Unreadable(String),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
            ConfigOrigin::Unreadable(reason) => warn!("Failed to load config: {}", reason),
        }
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    let (mut config, origin) = if let Some(ref config_path) = args.config {
        (
            Config::load(config_path)?,
            ConfigOrigin::Explicit(config_path.clone()),
        )
    } else {
        match Config::load_default() {
            Ok(Some(config)) => (config, ConfigOrigin::DefaultFile),
            Ok(None) => (Config::default(), ConfigOrigin::Builtin),
            Err(e) => (Config::default(), ConfigOrigin::Unreadable(format!("{:#}", e))),
        }
    };

    config.merge_with_args(args);
    config.validate()?;
    Ok((config, origin))
}

/// Where score records are read from.
#[derive(Debug, Clone, PartialEq)]
enum RecordSource {
    Inline { names: Vec<String>, scores: Vec<i64> },
    File(PathBuf),
    Sample,
}

impl RecordSource {
    fn label(&self) -> String {
        match self {
            RecordSource::Inline { .. } => "inline".to_string(),
            RecordSource::File(path) => path.display().to_string(),
            RecordSource::Sample => "sample".to_string(),
        }
    }

    fn load(&self) -> Result<ScoreTable> {
        match self {
            RecordSource::Inline { names, scores } => Ok(input::from_lists(names, scores)?),
            RecordSource::File(path) => input::load_records(path),
            RecordSource::Sample => Ok(input::sample_table()),
        }
    }
}

/// Pick the record source: inline lists, then an explicit or configured file,
/// then the built-in sample.
fn resolve_source(args: &Args, config: &Config) -> RecordSource {
    if let (Some(names), Some(scores)) = (&args.names, &args.scores) {
        return RecordSource::Inline {
            names: names.clone(),
            scores: scores.clone(),
        };
    }

    if args.sample {
        return RecordSource::Sample;
    }

    // `--input` was merged into the config
    match config.input.records_file {
        Some(ref path) => RecordSource::File(path.clone()),
        None => {
            info!("No record source given, using the built-in sample");
            RecordSource::Sample
        }
    }
}

/// Run the aggregation workflow. Returns exit code (0 or 2).
fn run(args: Args, config: Config) -> Result<i32> {
    let source = resolve_source(&args, &config);
    let table = source.load()?;
    debug!("Using {} records from {}", table.len(), source.label());
    if table.is_empty() {
        warn!("No score records loaded from {}", source.label());
    }

    let target = config.general.default_target.as_deref();
    if target.is_none() && !config.report.show_summaries {
        bail!("No target name given; use --target, set general.default_target, or pass --all");
    }

    let outcome = match target {
        Some(name) => {
            let name = analysis::validate_target(name)?;
            let aggregation = match &source {
                RecordSource::Inline { names, scores } => analysis::aggregate(names, scores, name)?,
                _ => analysis::aggregate_table(&table, name)?,
            };
            debug!(
                "target={} matches={} average={:?}",
                aggregation.target(),
                aggregation.match_count(),
                aggregation.average()
            );
            Some(aggregation)
        }
        None => None,
    };

    let summaries = if config.report.show_summaries {
        let all = analysis::summarize_by_name(&table)?;
        analysis::top_names(&all, config.report.top)
    } else {
        Vec::new()
    };

    let report = AggregateReport {
        metadata: ReportMetadata {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            source: source.label(),
            record_count: table.len(),
        },
        outcome,
        summaries,
    };
    debug!("{}", report::generate_metadata_section(&report.metadata).trim_end());

    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Text => report::generate_text_report(&report),
    };

    match args.output {
        Some(ref path) => {
            report::write_report(&output, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to: {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(exit_code(report.outcome.as_ref()))
}

/// Map the outcome to the process exit code.
fn exit_code(outcome: Option<&Aggregation>) -> i32 {
    match outcome {
        Some(aggregation) if !aggregation.is_found() => {
            warn!("No records found for '{}'", aggregation.target());
            2
        }
        _ => 0,
    }
}
