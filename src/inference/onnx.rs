// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX Runtime backed disease classifier
//!
//! One session per plant model. Sessions run on the CPU execution provider;
//! `Session::run` needs `&mut self`, so each session sits behind a mutex.

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::classifier::{ensure_single_image, Classifier};
use super::errors::PredictionError;

/// Image classifier loaded from an `.onnx` export
#[derive(Clone)]
pub struct OnnxClassifier {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Declared input shape
    input_shape: Vec<i64>,
    /// Declared number of output scores, if static
    output_len: Option<usize>,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("input_name", &self.input_name)
            .field("input_shape", &self.input_shape)
            .field("output_len", &self.output_len)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Load a classifier from an ONNX model file
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    /// - Model declares no inputs
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("model file not found: {}", model_path.display());
        }

        info!("Loading classifier from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load model from {}", model_path.display()))?;

        let input = session
            .inputs
            .first()
            .context("model declares no inputs")?;
        let input_name = input.name.clone();
        let input_shape: Vec<i64> = input
            .input_type
            .tensor_shape()
            .map(|shape| shape.iter().copied().collect())
            .unwrap_or_default();

        // Output length is the product of the non-batch axes when all are static
        let output_len = session
            .outputs
            .first()
            .and_then(|output| output.output_type.tensor_shape())
            .and_then(|shape| {
                let dims: Vec<i64> = shape.iter().skip(1).copied().collect();
                if dims.is_empty() || dims.iter().any(|d| *d <= 0) {
                    None
                } else {
                    Some(dims.iter().product::<i64>() as usize)
                }
            });

        debug!(
            "Classifier loaded - input: {} {:?}, outputs: {:?}",
            input_name, input_shape, output_len
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            input_shape,
            output_len,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn input_shape(&self) -> &[i64] {
        &self.input_shape
    }

    fn output_len(&self) -> Option<usize> {
        self.output_len
    }

    fn predict(&self, batch: &Array4<f32>) -> Result<Vec<f32>, PredictionError> {
        ensure_single_image(batch)?;

        let input_value = Value::from_array(batch.to_owned())
            .map_err(|e| PredictionError::Inference(format!("failed to create input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PredictionError::Inference("session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .map_err(|e| PredictionError::Inference(e.to_string()))?;

        let scores = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| PredictionError::Inference(format!("failed to extract output: {e}")))?;

        Ok(scores.iter().copied().collect())
    }
}
