// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scripted classifier for exercising the pipeline without model files

use ndarray::Array4;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::classifier::{ensure_single_image, Classifier};
use super::errors::PredictionError;

/// Classifier that replays scripted score vectors
///
/// Each `predict` call consumes the next scripted vector; the last one is
/// repeated once the script runs out. Batch shapes are recorded.
pub struct MockClassifier {
    input_shape: Vec<i64>,
    output_len: Option<usize>,
    responses: Mutex<VecDeque<Vec<f32>>>,
    seen_shapes: Mutex<Vec<Vec<usize>>>,
}

impl MockClassifier {
    pub fn new(input_shape: Vec<i64>, responses: Vec<Vec<f32>>) -> Self {
        let output_len = responses.first().map(|r| r.len());
        Self {
            input_shape,
            output_len,
            responses: Mutex::new(responses.into()),
            seen_shapes: Mutex::new(Vec::new()),
        }
    }

    /// Override the declared output length (`None` for a dynamic output)
    pub fn with_output_len(mut self, output_len: Option<usize>) -> Self {
        self.output_len = output_len;
        self
    }

    /// Shapes of every batch passed to `predict`, in call order
    pub fn seen_shapes(&self) -> Vec<Vec<usize>> {
        self.seen_shapes
            .lock()
            .map(|shapes| shapes.clone())
            .unwrap_or_default()
    }
}

impl Classifier for MockClassifier {
    fn input_shape(&self) -> &[i64] {
        &self.input_shape
    }

    fn output_len(&self) -> Option<usize> {
        self.output_len
    }

    fn predict(&self, batch: &Array4<f32>) -> Result<Vec<f32>, PredictionError> {
        ensure_single_image(batch)?;

        if let Ok(mut shapes) = self.seen_shapes.lock() {
            shapes.push(batch.shape().to_vec());
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| PredictionError::Inference("mock lock poisoned".to_string()))?;

        match responses.len() {
            0 => Err(PredictionError::Inference("no scripted response".to_string())),
            1 => Ok(responses[0].clone()),
            _ => Ok(responses.pop_front().unwrap_or_default()),
        }
    }
}
