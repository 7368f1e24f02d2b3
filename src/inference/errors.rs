// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for model loading and disease prediction

use thiserror::Error;

/// Per-request prediction failures
#[derive(Debug, Error)]
pub enum PredictionError {
    /// No model entry is registered under the requested plant name
    #[error("no model available for the provided plant '{plant}'")]
    UnknownPlant { plant: String },

    /// The plant is registered but no model is bound to it
    #[error("no model available for the provided plant '{plant}' (model not loaded)")]
    ModelUnavailable { plant: String },

    /// The model's declared input shape does not reduce to two spatial dimensions
    #[error("model dimensions are not supported: {shape:?}")]
    UnsupportedModelDimensions { shape: Vec<i64> },

    /// The combined prediction vector summed to zero
    #[error("no confident prediction could be made for the provided images")]
    NoConfidentPrediction,

    /// A score is negative or non-finite; models must emit probabilities
    #[error("model emitted an invalid score {score} for label index {index}")]
    InvalidScores { index: usize, score: f32 },

    /// Prediction vectors and label list disagree in length
    #[error("prediction length mismatch: {labels} labels, vectors of {first} and {second} scores")]
    LabelMismatch {
        labels: usize,
        first: usize,
        second: usize,
    },

    /// The tensor handed to a classifier is not a single-image batch
    #[error("invalid input batch shape {shape:?}: {reason}")]
    InvalidBatch { shape: Vec<usize>, reason: String },

    /// The underlying runtime failed
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Startup failures while building the model registry
///
/// Every variant names the plant whose entry could not be loaded.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to load model for plant '{plant}': {source}")]
    ModelLoad {
        plant: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("model for plant '{plant}' outputs {outputs} scores but {labels} labels are configured")]
    ConfigurationIntegrity {
        plant: String,
        labels: usize,
        outputs: usize,
    },

    #[error("plant '{0}' is configured more than once")]
    DuplicatePlant(String),

    #[error("invalid labels for plant '{plant}': {reason}")]
    Labels { plant: String, reason: String },
}
