//! Score record loading.
//!
//! Records come from inline parallel lists, from a JSON or TOML record
//! file, or from the built-in sample dataset.

use crate::models::{AggregateError, ScoreRecord, ScoreTable};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Supported record file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Toml,
}

impl RecordFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(RecordFormat::Json),
            "toml" => Some(RecordFormat::Toml),
            _ => None,
        }
    }
}

/// `records = [{ name = "...", score = 1 }]`
#[derive(Debug, Deserialize)]
struct RecordList {
    records: Vec<ScoreRecord>,
}

/// `names = [...]` and `scores = [...]`
#[derive(Debug, Deserialize)]
struct ParallelLists {
    names: Vec<String>,
    scores: Vec<i64>,
}

impl ParallelLists {
    fn into_table(self) -> Result<ScoreTable, AggregateError> {
        ScoreTable::from_parallel(&self.names, &self.scores)
    }
}

/// Accepted record document shapes, told apart by their top-level keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentShape {
    /// A bare array of records (JSON only).
    List,
    /// A `records` array of tables.
    Records,
    /// Parallel `names` and `scores` arrays.
    Parallel,
}

impl DocumentShape {
    /// Classify a table-shaped document. `List` is never returned here.
    fn from_keys<'a>(keys: impl Iterator<Item = &'a String>) -> Result<Self> {
        let mut parallel = false;
        for key in keys {
            match key.as_str() {
                "records" => return Ok(DocumentShape::Records),
                "names" | "scores" => parallel = true,
                _ => {}
            }
        }

        if parallel {
            Ok(DocumentShape::Parallel)
        } else {
            bail!("Expected a `records` list or `names`/`scores` arrays")
        }
    }
}

fn parse_json(content: &str) -> Result<ScoreTable> {
    let value: serde_json::Value =
        serde_json::from_str(content).context("Invalid JSON record document")?;

    let shape = match value {
        serde_json::Value::Array(_) => DocumentShape::List,
        serde_json::Value::Object(ref map) => DocumentShape::from_keys(map.keys())?,
        _ => bail!("Expected a JSON array of records or an object"),
    };

    let table = match shape {
        DocumentShape::List => {
            let records: Vec<ScoreRecord> =
                serde_json::from_value(value).context("Invalid record list")?;
            ScoreTable::new(records)
        }
        DocumentShape::Records => {
            let list: RecordList =
                serde_json::from_value(value).context("Invalid `records` list")?;
            ScoreTable::new(list.records)
        }
        DocumentShape::Parallel => {
            let lists: ParallelLists =
                serde_json::from_value(value).context("Invalid `names`/`scores` arrays")?;
            lists.into_table()?
        }
    };

    Ok(table)
}

fn parse_toml(content: &str) -> Result<ScoreTable> {
    let document: toml::Table =
        toml::from_str(content).context("Invalid TOML record document")?;
    let shape = DocumentShape::from_keys(document.keys())?;
    let value = toml::Value::Table(document);

    let table = match shape {
        DocumentShape::Records => {
            let list = value
                .try_into::<RecordList>()
                .context("Invalid `records` list")?;
            ScoreTable::new(list.records)
        }
        DocumentShape::Parallel | DocumentShape::List => {
            let lists = value
                .try_into::<ParallelLists>()
                .context("Invalid `names`/`scores` arrays")?;
            lists.into_table()?
        }
    };

    Ok(table)
}

/// Pair inline name and score lists.
pub fn from_lists(names: &[String], scores: &[i64]) -> Result<ScoreTable, AggregateError> {
    ScoreTable::from_parallel(names, scores)
}

/// Parse record file content in the given format.
pub fn parse_records(content: &str, format: RecordFormat) -> Result<ScoreTable> {
    match format {
        RecordFormat::Json => parse_json(content),
        RecordFormat::Toml => parse_toml(content),
    }
}

/// Load records from a JSON or TOML file.
pub fn load_records(path: &Path) -> Result<ScoreTable> {
    let Some(format) = RecordFormat::from_path(path) else {
        bail!(
            "Unsupported record file extension: {} (expected .json or .toml)",
            path.display()
        );
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file: {}", path.display()))?;

    let table = parse_records(&content, format)
        .with_context(|| format!("Failed to load records from {}", path.display()))?;

    debug!("Loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

/// The illustrative dataset.
pub fn sample_table() -> ScoreTable {
    ScoreTable::new(vec![
        ScoreRecord::new("Alice", 88),
        ScoreRecord::new("Bob", 92),
        ScoreRecord::new("Charlie", 76),
        ScoreRecord::new("Alice", 95),
    ])
}
