// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart form parsing for uploads

use axum_extra::extract::Multipart;
use std::collections::HashMap;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::storage::UploadedImage;

/// Form field carrying the plant name
pub const PLANT_FIELD: &str = "plant";

/// Image fields accepted by the upload endpoints
pub const IMAGE_FIELDS: [&str; 3] = ["image", "image1", "image2"];

/// Fields collected from a multipart upload
#[derive(Debug, Default)]
pub struct UploadForm {
    pub plant: Option<String>,
    pub images: HashMap<String, UploadedImage>,
}

impl UploadForm {
    /// Drain a multipart body; unrecognised fields are skipped
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == PLANT_FIELD {
                let text = field.text().await.map_err(|e| ApiError::ValidationError {
                    field: PLANT_FIELD.to_string(),
                    message: e.to_string(),
                })?;
                form.plant = Some(text);
            } else if IMAGE_FIELDS.contains(&name.as_str()) {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| ApiError::ValidationError {
                    field: name.clone(),
                    message: e.to_string(),
                })?;
                form.images.insert(
                    name,
                    UploadedImage {
                        file_name,
                        bytes: bytes.to_vec(),
                    },
                );
            } else {
                debug!("Ignoring unexpected upload field '{}'", name);
            }
        }

        Ok(form)
    }

    /// The plant name, trimmed and non-empty
    pub fn require_plant(&self) -> Result<String, ApiError> {
        match self.plant.as_deref().map(str::trim) {
            Some(plant) if !plant.is_empty() => Ok(plant.to_string()),
            _ => Err(ApiError::ValidationError {
                field: PLANT_FIELD.to_string(),
                message: "plant is required".to_string(),
            }),
        }
    }

    /// Remove and return an image field, failing if it was not sent
    pub fn take_image(&mut self, field: &str) -> Result<UploadedImage, ApiError> {
        self.images
            .remove(field)
            .ok_or_else(|| ApiError::ValidationError {
                field: field.to_string(),
                message: format!("{} is required", field),
            })
    }
}
