//! Data models for the score aggregator.
//!
//! This module contains the core data structures used throughout
//! the application for representing score records, aggregation
//! outcomes, and the errors raised while building them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while pairing or aggregating score records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Name and score lists differ in length: {names} names, {scores} scores")]
    LengthMismatch { names: usize, scores: usize },

    #[error("Score total for '{target}' overflowed")]
    Overflow { target: String },

    #[error("Target name must not be empty")]
    EmptyTarget,
}

/// A single user score entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// User name.
    pub name: String,
    /// Score recorded for the user.
    pub score: i64,
}

impl ScoreRecord {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// An ordered collection of paired name/score records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub records: Vec<ScoreRecord>,
}

impl ScoreTable {
    /// Creates a table from already-paired records.
    pub fn new(records: Vec<ScoreRecord>) -> Self {
        Self { records }
    }

    /// Pairs two parallel lists position by position.
    ///
    /// Fails with [`AggregateError::LengthMismatch`] when the lists differ in length.
    pub fn from_parallel(names: &[String], scores: &[i64]) -> Result<Self, AggregateError> {
        if names.len() != scores.len() {
            return Err(AggregateError::LengthMismatch {
                names: names.len(),
                scores: scores.len(),
            });
        }

        let records = names
            .iter()
            .zip(scores)
            .map(|(name, &score)| ScoreRecord::new(name.clone(), score))
            .collect();

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.records.iter()
    }
}

/// Outcome of aggregating scores for one target name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Aggregation {
    /// At least one record matched the target.
    Found {
        target: String,
        /// Number of matching records (always at least 1).
        count: usize,
        /// Sum of the matching scores.
        total: i64,
        /// Truncated mean of the matching scores.
        average: i64,
    },
    /// No record matched the target.
    NotFound { target: String },
}

impl Aggregation {
    pub fn target(&self) -> &str {
        match self {
            Aggregation::Found { target, .. } | Aggregation::NotFound { target } => target,
        }
    }

    /// Returns the average when the target was found.
    pub fn average(&self) -> Option<i64> {
        match self {
            Aggregation::Found { average, .. } => Some(*average),
            Aggregation::NotFound { .. } => None,
        }
    }

    /// Number of records that matched the target.
    pub fn match_count(&self) -> usize {
        match self {
            Aggregation::Found { count, .. } => *count,
            Aggregation::NotFound { .. } => 0,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Aggregation::Found { .. })
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Found {
                target, average, ..
            } => write!(f, "Average score for {} is: {}", target, average),
            Aggregation::NotFound { target } => {
                write!(f, "An error occurred: no records found for '{}'", target)
            }
        }
    }
}

/// Aggregate statistics for one distinct name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSummary {
    pub name: String,
    pub count: usize,
    pub total: i64,
    pub average: i64,
}

/// Metadata about an aggregation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Version of the tool that produced the report.
    pub tool_version: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Where the records came from (file path, "inline", or "sample").
    pub source: String,
    /// Number of records considered.
    pub record_count: usize,
}

/// The complete aggregation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    pub metadata: ReportMetadata,
    /// Result for the requested target, if one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Aggregation>,
    /// Per-name summaries, highest average first.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub summaries: Vec<NameSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_parallel_pairs_by_position() {
        let table =
            ScoreTable::from_parallel(&names(&["Alice", "Bob"]), &[88, 92]).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0], ScoreRecord::new("Alice", 88));
        assert_eq!(table.records[1], ScoreRecord::new("Bob", 92));
    }

    #[test]
    fn test_from_parallel_rejects_mismatched_lengths() {
        let err = ScoreTable::from_parallel(&names(&["Alice", "Bob", "Charlie"]), &[88, 92])
            .unwrap_err();

        assert_eq!(
            err,
            AggregateError::LengthMismatch {
                names: 3,
                scores: 2
            }
        );
        assert!(err.to_string().contains("3 names, 2 scores"));
    }

    #[test]
    fn test_from_parallel_empty_lists() {
        let table = ScoreTable::from_parallel(&[], &[]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_aggregation_accessors() {
        let found = Aggregation::Found {
            target: "Alice".to_string(),
            count: 2,
            total: 183,
            average: 91,
        };
        assert!(found.is_found());
        assert_eq!(found.average(), Some(91));
        assert_eq!(found.match_count(), 2);
        assert_eq!(found.target(), "Alice");

        let missing = Aggregation::NotFound {
            target: "Dave".to_string(),
        };
        assert!(!missing.is_found());
        assert_eq!(missing.average(), None);
        assert_eq!(missing.match_count(), 0);
    }

    #[test]
    fn test_aggregation_display() {
        let found = Aggregation::Found {
            target: "Bob".to_string(),
            count: 1,
            total: 92,
            average: 92,
        };
        assert_eq!(found.to_string(), "Average score for Bob is: 92");

        let missing = Aggregation::NotFound {
            target: "Dave".to_string(),
        };
        assert_eq!(
            missing.to_string(),
            "An error occurred: no records found for 'Dave'"
        );
    }

    #[test]
    fn test_aggregation_serializes_with_status_tag() {
        let missing = Aggregation::NotFound {
            target: "Dave".to_string(),
        };
        let json = serde_json::to_string(&missing).unwrap();
        assert!(json.contains("\"status\":\"not_found\""));
        assert!(json.contains("\"target\":\"Dave\""));
    }
}
