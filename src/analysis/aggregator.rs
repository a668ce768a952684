//! Score aggregation and per-name statistics.
//!
//! This module computes the truncated mean of the scores recorded for a
//! target name, along with grouping and ranking helpers used by the
//! summary report.

use crate::models::{AggregateError, Aggregation, NameSummary, ScoreTable};
use std::collections::HashMap;
use tracing::{debug, info};

/// Aggregate scores for `target` from two parallel lists.
///
/// The lists are checked for equal length before any element is read.
pub fn aggregate(
    names: &[String],
    scores: &[i64],
    target: &str,
) -> Result<Aggregation, AggregateError> {
    if names.len() != scores.len() {
        return Err(AggregateError::LengthMismatch {
            names: names.len(),
            scores: scores.len(),
        });
    }

    let matches = names
        .iter()
        .zip(scores)
        .filter(|(name, _)| name.as_str() == target)
        .map(|(_, &score)| score);

    finish(target, matches)
}

/// Aggregate scores for `target` from paired records.
pub fn aggregate_table(table: &ScoreTable, target: &str) -> Result<Aggregation, AggregateError> {
    let matches = table
        .iter()
        .filter(|record| record.name == target)
        .map(|record| record.score);

    finish(target, matches)
}

fn finish(
    target: &str,
    matches: impl Iterator<Item = i64>,
) -> Result<Aggregation, AggregateError> {
    let mut total: i64 = 0;
    let mut count: usize = 0;

    for score in matches {
        total = total
            .checked_add(score)
            .ok_or_else(|| AggregateError::Overflow {
                target: target.to_string(),
            })?;
        count += 1;
    }

    info!("Found {} records with name {}", count, target);

    if count == 0 {
        return Ok(Aggregation::NotFound {
            target: target.to_string(),
        });
    }

    // Integer division truncates toward zero.
    let average = total / count as i64;
    debug!("total={} count={} average={}", total, count, average);

    Ok(Aggregation::Found {
        target: target.to_string(),
        count,
        total,
        average,
    })
}

/// Reject blank target names before aggregating.
pub fn validate_target(target: &str) -> Result<&str, AggregateError> {
    if target.trim().is_empty() {
        return Err(AggregateError::EmptyTarget);
    }
    Ok(target)
}

/// Group scores by name, preserving input order within each group.
pub fn group_by_name(table: &ScoreTable) -> HashMap<String, Vec<i64>> {
    let mut grouped: HashMap<String, Vec<i64>> = HashMap::new();

    for record in table.iter() {
        grouped
            .entry(record.name.clone())
            .or_default()
            .push(record.score);
    }

    grouped
}

/// Summarize every distinct name in first-appearance order.
pub fn summarize_by_name(table: &ScoreTable) -> Result<Vec<NameSummary>, AggregateError> {
    let mut grouped = group_by_name(table);
    let mut summaries = Vec::with_capacity(grouped.len());

    for record in table.iter() {
        // First appearance takes the group; later records find it gone.
        let Some(scores) = grouped.remove(&record.name) else {
            continue;
        };

        let total = scores
            .iter()
            .try_fold(0i64, |acc, &score| acc.checked_add(score))
            .ok_or_else(|| AggregateError::Overflow {
                target: record.name.clone(),
            })?;
        let count = scores.len();

        summaries.push(NameSummary {
            name: record.name.clone(),
            count,
            total,
            average: total / count as i64,
        });
    }

    Ok(summaries)
}

/// Get the top N summaries by average (ties broken by name).
pub fn top_names(summaries: &[NameSummary], n: usize) -> Vec<NameSummary> {
    let mut sorted = summaries.to_vec();
    sorted.sort_by(|a, b| b.average.cmp(&a.average).then_with(|| a.name.cmp(&b.name)));
    sorted.truncate(n);
    sorted
}
