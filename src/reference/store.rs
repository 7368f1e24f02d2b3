// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Read-only reference data gateway
//!
//! Queries return empty results when nothing matches; deciding whether that
//! is a "not found" is left to the caller.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use super::records::{Disease, News, Plant, ReferenceData};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read reference data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid reference data in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn all_plants(&self) -> Result<Vec<Plant>, StoreError>;

    async fn diseases_for_plant(&self, plant: &str) -> Result<Vec<Disease>, StoreError>;

    async fn disease_detail(&self, disease: &str, plant: &str)
        -> Result<Option<Disease>, StoreError>;

    async fn all_news(&self) -> Result<Vec<News>, StoreError>;
}

/// Reference data held in memory, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceStore {
    data: ReferenceData,
}

impl InMemoryReferenceStore {
    pub fn new(data: ReferenceData) -> Self {
        Self { data }
    }

    /// Load a JSON dataset of the form `{"plants": [], "diseases": [], "news": []}`
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoreError::Io {
                path: display.clone(),
                source,
            })?;

        let data: ReferenceData =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: display.clone(),
                source,
            })?;

        info!(
            "Loaded reference data from {}: {} plants, {} diseases, {} news items",
            path.display(),
            data.plants.len(),
            data.diseases.len(),
            data.news.len()
        );

        Ok(Self::new(data))
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[async_trait]
impl ReferenceStore for InMemoryReferenceStore {
    async fn all_plants(&self) -> Result<Vec<Plant>, StoreError> {
        Ok(self.data.plants.clone())
    }

    async fn diseases_for_plant(&self, plant: &str) -> Result<Vec<Disease>, StoreError> {
        Ok(self
            .data
            .diseases
            .iter()
            .filter(|d| same_name(&d.plant, plant))
            .cloned()
            .collect())
    }

    async fn disease_detail(
        &self,
        disease: &str,
        plant: &str,
    ) -> Result<Option<Disease>, StoreError> {
        Ok(self
            .data
            .diseases
            .iter()
            .find(|d| same_name(&d.name, disease) && same_name(&d.plant, plant))
            .cloned())
    }

    async fn all_news(&self) -> Result<Vec<News>, StoreError> {
        let mut news = self.data.news.clone();
        // Newest first; undated items sort last
        news.sort_by_key(|n| Reverse(n.published_at));
        Ok(news)
    }
}
