// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classifier abstraction over a loaded disease model

use ndarray::Array4;

use super::errors::PredictionError;

/// A loaded image classifier producing one score per label
///
/// Implementations must be shareable across request handlers.
pub trait Classifier: Send + Sync {
    /// Declared input shape, `-1` for dynamic axes
    fn input_shape(&self) -> &[i64];

    /// Declared output length, when the model states it statically
    fn output_len(&self) -> Option<usize>;

    /// Run the model over a single-image batch and return the raw scores
    fn predict(&self, batch: &Array4<f32>) -> Result<Vec<f32>, PredictionError>;
}

/// Reject anything that is not a batch of exactly one image
pub fn ensure_single_image(batch: &Array4<f32>) -> Result<(), PredictionError> {
    let shape = batch.shape();
    if shape[0] != 1 {
        return Err(PredictionError::InvalidBatch {
            shape: shape.to_vec(),
            reason: format!("expected a batch of 1 image, got {}", shape[0]),
        });
    }
    Ok(())
}
