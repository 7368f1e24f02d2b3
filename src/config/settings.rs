// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! TOML configuration with environment overrides
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8000
//!
//! [models.tomato]
//! model_path = "./models/tomato/model.onnx"
//! labels = ["early_blight", "healthy"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::inference::ModelConfig;
use crate::vision::Normalization;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollectionSettings {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("./collected_images"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReferenceSettings {
    /// JSON file with plants, diseases and news; unset means an empty store
    pub data_path: Option<PathBuf>,
}

/// One `[models.<plant>]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlantModelSettings {
    pub model_path: Option<PathBuf>,
    pub labels: Option<Vec<String>>,
    pub labels_path: Option<PathBuf>,
    #[serde(default)]
    pub normalization: Normalization,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub collection: CollectionSettings,
    pub reference: ReferenceSettings,
    pub models: BTreeMap<String, PlantModelSettings>,
}

impl ServiceConfig {
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Load from a TOML file; a missing file yields defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(
                "Config file {} not found, using defaults (no models)",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_toml_str(&content, &path.display().to_string())?;
        info!(
            "Loaded config from {} ({} models)",
            path.display(),
            config.models.len()
        );
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("API_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("API_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "API_PORT".to_string(),
                value: port.clone(),
            })?;
        }

        if let Some(enabled) = lookup("COLLECTION_ENABLED") {
            self.collection.enabled = parse_bool(&enabled).ok_or(ConfigError::InvalidEnv {
                key: "COLLECTION_ENABLED".to_string(),
                value: enabled.clone(),
            })?;
        }

        if let Some(path) = lookup("COLLECTION_PATH") {
            self.collection.path = PathBuf::from(path);
        }

        if let Some(path) = lookup("REFERENCE_DATA_PATH") {
            self.reference.data_path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server port must be non-zero".to_string()));
        }

        for (name, model) in &self.models {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("plant name must not be blank".to_string()));
            }

            match (&model.labels, &model.labels_path) {
                (Some(_), Some(_)) => {
                    return Err(ConfigError::Invalid(format!(
                        "plant '{}' sets both labels and labels_path",
                        name
                    )))
                }
                (None, None) => {
                    return Err(ConfigError::Invalid(format!(
                        "plant '{}' needs labels or labels_path",
                        name
                    )))
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigError::Invalid(format!(
                    "cannot bind to {}:{}",
                    self.server.host, self.server.port
                ))
            })
    }

    /// Registry input, one entry per `[models.<plant>]` table in name order
    pub fn model_configs(&self) -> Vec<ModelConfig> {
        self.models
            .iter()
            .map(|(name, model)| ModelConfig {
                name: name.clone(),
                model_path: model.model_path.clone(),
                labels: model.labels.clone(),
                labels_path: model.labels_path.clone(),
                normalization: model.normalization,
            })
            .collect()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
