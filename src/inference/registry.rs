// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Plant model registry
//!
//! Binds each configured plant name to its classifier and ordered label list.
//! The registry is built once at startup and is read-only afterwards; any
//! entry that fails to load aborts construction.

use ndarray::Array4;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::classifier::Classifier;
use super::errors::{PredictionError, RegistryError};
use super::onnx::OnnxClassifier;
use crate::vision::Normalization;

/// Configuration for one plant model
#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    /// Plant name (e.g., "tomato")
    pub name: String,
    /// Path to the ONNX model file; `None` registers the plant without a model
    pub model_path: Option<PathBuf>,
    /// Inline label list, in model output order
    pub labels: Option<Vec<String>>,
    /// File with one label per line, in model output order
    pub labels_path: Option<PathBuf>,
    /// Pixel scaling expected by the model
    pub normalization: Normalization,
}

impl ModelConfig {
    /// Resolve the ordered label list from the inline list or the labels file
    pub fn resolve_labels(&self) -> Result<Vec<String>, RegistryError> {
        let labels_error = |reason: String| RegistryError::Labels {
            plant: self.name.clone(),
            reason,
        };

        let labels = match (&self.labels, &self.labels_path) {
            (Some(labels), None) => labels.iter().map(|l| l.trim().to_string()).collect(),
            (None, Some(path)) => read_labels_file(path).map_err(labels_error)?,
            (Some(_), Some(_)) => {
                return Err(labels_error(
                    "both labels and labels_path are set".to_string(),
                ))
            }
            (None, None) => return Err(labels_error("no labels configured".to_string())),
        };

        if labels.is_empty() {
            return Err(labels_error("label list is empty".to_string()));
        }

        Ok(labels)
    }
}

/// Read a labels file: one label per line, blank lines and `#` comments skipped
pub fn read_labels_file(path: &Path) -> Result<Vec<String>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Canonical form of a plant name for registration and lookup
pub fn normalize_plant_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A plant name bound to its model and labels
pub struct ModelEntry {
    name: String,
    classifier: Option<Arc<dyn Classifier>>,
    labels: Vec<String>,
    normalization: Normalization,
}

impl std::fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelEntry")
            .field("name", &self.name)
            .field("available", &self.classifier.is_some())
            .field("labels", &self.labels.len())
            .field("normalization", &self.normalization)
            .finish()
    }
}

impl ModelEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    pub fn is_available(&self) -> bool {
        self.classifier.is_some()
    }

    fn classifier(&self) -> Result<&Arc<dyn Classifier>, PredictionError> {
        self.classifier
            .as_ref()
            .ok_or_else(|| PredictionError::ModelUnavailable {
                plant: self.name.clone(),
            })
    }

    /// Declared input shape of the bound model
    pub fn input_shape(&self) -> Result<&[i64], PredictionError> {
        Ok(self.classifier()?.input_shape())
    }

    /// Run the bound model over a prepared single-image batch
    pub fn predict(&self, batch: &Array4<f32>) -> Result<Vec<f32>, PredictionError> {
        self.classifier()?.predict(batch)
    }
}

/// Information about a registered plant model
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredModel {
    pub name: String,
    pub labels: usize,
    pub available: bool,
}

/// Write-once registry of plant models
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, Arc<ModelEntry>>,
}

impl ModelRegistry {
    /// Registry with no plants
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every configured plant model from ONNX files
    ///
    /// Fails on the first plant whose model or labels cannot be loaded.
    pub fn load(configs: &[ModelConfig]) -> Result<Self, RegistryError> {
        Self::load_with(configs, |path| {
            let classifier = OnnxClassifier::load(path)?;
            Ok(Arc::new(classifier) as Arc<dyn Classifier>)
        })
    }

    /// Load every configured plant using the given model loader
    pub fn load_with<F>(configs: &[ModelConfig], mut loader: F) -> Result<Self, RegistryError>
    where
        F: FnMut(&Path) -> anyhow::Result<Arc<dyn Classifier>>,
    {
        info!("Loading {} plant models", configs.len());

        let mut models = HashMap::new();

        for config in configs {
            let name = normalize_plant_name(&config.name);
            if models.contains_key(&name) {
                return Err(RegistryError::DuplicatePlant(name));
            }

            let labels = config.resolve_labels()?;

            let classifier = match &config.model_path {
                Some(path) => {
                    let classifier = loader(path.as_path()).map_err(|source| {
                        error!("✗ Failed to load model for {}: {}", name, source);
                        RegistryError::ModelLoad {
                            plant: name.clone(),
                            source,
                        }
                    })?;

                    if let Some(outputs) = classifier.output_len() {
                        if outputs != labels.len() {
                            return Err(RegistryError::ConfigurationIntegrity {
                                plant: name,
                                labels: labels.len(),
                                outputs,
                            });
                        }
                    } else {
                        warn!(
                            "Model for {} has a dynamic output length; label count checked per request",
                            name
                        );
                    }

                    info!(
                        "✓ Loaded model for {} ({} labels, input {:?})",
                        name,
                        labels.len(),
                        classifier.input_shape()
                    );
                    Some(classifier)
                }
                None => {
                    warn!("Plant {} has no model_path; registered without a model", name);
                    None
                }
            };

            let entry = ModelEntry {
                name: name.clone(),
                classifier,
                labels,
                normalization: config.normalization,
            };
            models.insert(name, Arc::new(entry));
        }

        Ok(Self { models })
    }

    /// Look up the entry for a plant
    pub fn get(&self, plant: &str) -> Result<Arc<ModelEntry>, PredictionError> {
        self.models
            .get(&normalize_plant_name(plant))
            .cloned()
            .ok_or_else(|| PredictionError::UnknownPlant {
                plant: plant.to_string(),
            })
    }

    /// Registered plant names, sorted
    pub fn plants(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }

    /// Summary of every registered plant, sorted by name
    pub fn list_models(&self) -> Vec<RegisteredModel> {
        let mut models: Vec<RegisteredModel> = self
            .models
            .values()
            .map(|entry| RegisteredModel {
                name: entry.name.clone(),
                labels: entry.labels.len(),
                available: entry.is_available(),
            })
            .collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
