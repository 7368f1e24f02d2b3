// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Best-effort collection of uploaded leaf photos for dataset growth
//!
//! Failures never reach the client: `collect_in_background` logs the outcome
//! and drops it.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::vision::{detect_format, format_to_extension};

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("failed to create collection directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// An uploaded image kept as raw bytes
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Saves uploads under `<root>/<plant>/<uuid>.<ext>` when enabled
#[derive(Debug, Clone)]
pub struct ImageCollector {
    enabled: bool,
    root: PathBuf,
}

impl ImageCollector {
    pub fn new(enabled: bool, root: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            root: root.into(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, PathBuf::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write every image to disk, returning the saved paths
    pub async fn collect(
        &self,
        plant: &str,
        images: &[UploadedImage],
    ) -> Result<Vec<PathBuf>, CollectionError> {
        if !self.enabled {
            return Ok(Vec::new());
        }

        let dir = self.root.join(sanitize_plant_dir(plant));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| CollectionError::CreateDir {
                path: dir.display().to_string(),
                source,
            })?;

        let mut saved = Vec::with_capacity(images.len());
        for image in images {
            let extension = detect_format(&image.bytes)
                .map(format_to_extension)
                .unwrap_or("bin");
            let path = dir.join(format!("{}.{}", Uuid::new_v4(), extension));

            tokio::fs::write(&path, &image.bytes)
                .await
                .map_err(|source| CollectionError::Write {
                    path: path.display().to_string(),
                    source,
                })?;
            saved.push(path);
        }

        Ok(saved)
    }

    /// Spawn `collect` on the runtime; the outcome is logged and discarded
    ///
    /// Returns `None` when collection is disabled. Callers may drop the handle.
    pub fn collect_in_background(
        &self,
        plant: String,
        images: Vec<UploadedImage>,
    ) -> Option<JoinHandle<()>> {
        if !self.enabled {
            return None;
        }

        let collector = self.clone();
        Some(tokio::spawn(async move {
            match collector.collect(&plant, &images).await {
                Ok(paths) => debug!("Collected {} images for {}", paths.len(), plant),
                Err(e) => warn!("Image collection for {} failed: {}", plant, e),
            }
        }))
    }
}

/// Directory name for a plant: lowercase alphanumerics, `-` and `_` only
fn sanitize_plant_dir(plant: &str) -> String {
    let cleaned: String = plant
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}
