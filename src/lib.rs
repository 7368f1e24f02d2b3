// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod inference;
pub mod reference;
pub mod storage;
pub mod version;
pub mod vision;

pub use api::{create_app, AppState};
pub use config::ServiceConfig;
pub use inference::{ModelConfig, ModelRegistry, PredictionError};
pub use reference::{InMemoryReferenceStore, ReferenceStore};
pub use storage::ImageCollector;
