// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Two-image diagnosis: prepare, predict, aggregate

use image::DynamicImage;
use std::time::Instant;
use tracing::debug;

use super::aggregation::{aggregate, RankedLabel};
use super::errors::PredictionError;
use super::registry::ModelEntry;
use crate::vision::preprocess_for_model;

/// Classify two photos of the same plant and return the ranked labels
///
/// CPU-bound; call from a blocking context.
pub fn diagnose(
    entry: &ModelEntry,
    first: &DynamicImage,
    second: &DynamicImage,
) -> Result<Vec<RankedLabel>, PredictionError> {
    let start = Instant::now();
    let input_shape = entry.input_shape()?;

    let first_batch = preprocess_for_model(first, input_shape, entry.normalization())?;
    let second_batch = preprocess_for_model(second, input_shape, entry.normalization())?;

    let first_scores = entry.predict(&first_batch)?;
    let second_scores = entry.predict(&second_batch)?;

    let ranked = aggregate(&first_scores, &second_scores, entry.labels())?;

    debug!(
        "Diagnosed {} in {}ms, top label: {:?}",
        entry.name(),
        start.elapsed().as_millis(),
        ranked.first().map(|r| r.label.as_str())
    );

    Ok(ranked)
}
