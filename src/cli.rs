//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// scoreagg - per-user score aggregation
///
/// Computes the truncated average of the scores recorded for a user
/// from paired name/score records.
///
/// Examples:
///   scoreagg --sample --target Alice
///   scoreagg --names Alice,Bob,Alice --scores 88,92,95 --target Alice
///   scoreagg --input scores.json --target Bob --format json
///   scoreagg --input scores.toml --all --top 5
///   scoreagg --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Name whose scores should be averaged
    ///
    /// Matched exactly (case-sensitive). Falls back to `default_target`
    /// from .scoreagg.toml when omitted.
    #[arg(short, long, value_name = "NAME", env = "SCOREAGG_TARGET")]
    pub target: Option<String>,

    /// User names, one per record (comma-separated)
    ///
    /// Must be given together with --scores and have the same length.
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub names: Option<Vec<String>>,

    /// Scores aligned with --names (comma-separated)
    #[arg(
        long,
        value_name = "SCORES",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub scores: Option<Vec<i64>>,

    /// JSON or TOML file holding the score records
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Use the built-in sample records
    #[arg(long)]
    pub sample: bool,

    /// Also print a per-name summary table
    #[arg(long)]
    pub all: bool,

    /// Maximum rows in the summary table
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Output format (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .scoreagg.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .scoreagg.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether records were supplied inline via --names/--scores.
    pub fn has_inline_records(&self) -> bool {
        self.names.is_some() || self.scores.is_some()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match (&self.names, &self.scores) {
            (Some(_), None) => return Err("--names requires --scores".to_string()),
            (None, Some(_)) => return Err("--scores requires --names".to_string()),
            _ => {}
        }

        let sources = [self.has_inline_records(), self.input.is_some(), self.sample]
            .iter()
            .filter(|&&set| set)
            .count();
        if sources > 1 {
            return Err(
                "Use only one record source: --names/--scores, --input, or --sample".to_string(),
            );
        }

        if let Some(ref target) = self.target {
            if target.trim().is_empty() {
                return Err("Target name must not be empty".to_string());
            }
        }

        if self.top == Some(0) {
            return Err("--top must be at least 1".to_string());
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Record file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
