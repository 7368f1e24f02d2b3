// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Plant disease prediction
//!
//! Components:
//! - `registry` - plant name to model and label binding, loaded at startup
//! - `classifier` / `onnx` - the prediction unit over a prepared image batch
//! - `aggregation` - two-image max-then-normalize ranking
//! - `pipeline` - prepare, predict and aggregate for one plant

pub mod aggregation;
pub mod classifier;
pub mod errors;
pub mod mock;
pub mod onnx;
pub mod pipeline;
pub mod registry;

pub use aggregation::{aggregate, RankedLabel, TOP_K};
pub use classifier::Classifier;
pub use errors::{PredictionError, RegistryError};
pub use mock::MockClassifier;
pub use onnx::OnnxClassifier;
pub use pipeline::diagnose;
pub use registry::{normalize_plant_name, ModelConfig, ModelEntry, ModelRegistry, RegisteredModel};
