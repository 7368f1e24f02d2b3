// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Two-image prediction aggregation
//!
//! Both photos are treated as evidence for the same condition: per label the
//! stronger score wins, the combined vector is normalized to sum to 1.0, and
//! the labels are ranked.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::errors::PredictionError;

/// Number of ranked labels returned to the caller
pub const TOP_K: usize = 5;

/// A label with its normalized score (0.0-1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLabel {
    pub label: String,
    pub score: f32,
}

/// Merge two prediction vectors into the top-ranked labels
///
/// Label order must match the model's output order. Ties keep label order.
/// Scores must be non-negative and finite (softmax output, not logits).
pub fn aggregate(
    first: &[f32],
    second: &[f32],
    labels: &[String],
) -> Result<Vec<RankedLabel>, PredictionError> {
    if first.len() != second.len() || first.len() != labels.len() {
        return Err(PredictionError::LabelMismatch {
            labels: labels.len(),
            first: first.len(),
            second: second.len(),
        });
    }

    if labels.is_empty() {
        return Ok(Vec::new());
    }

    let combined: Vec<f32> = first
        .iter()
        .zip(second)
        .map(|(a, b)| a.max(*b))
        .collect();

    if let Some((index, score)) = combined
        .iter()
        .copied()
        .enumerate()
        .find(|(_, score)| *score < 0.0 || !score.is_finite())
    {
        return Err(PredictionError::InvalidScores { index, score });
    }

    let total: f32 = combined.iter().sum();
    if total == 0.0 || !total.is_finite() {
        return Err(PredictionError::NoConfidentPrediction);
    }

    let mut ranked: Vec<RankedLabel> = labels
        .iter()
        .zip(combined)
        .map(|(label, score)| RankedLabel {
            label: label.clone(),
            score: score / total,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(TOP_K);

    Ok(ranked)
}
