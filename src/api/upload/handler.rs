// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload endpoint handlers

use axum::{extract::State, Json};
use axum_extra::extract::{Multipart, WithRejection};
use tracing::{debug, info};

use super::request::UploadForm;
use super::response::{PredictionItem, PrototypeUploadResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::inference::diagnose;
use crate::vision::decode_image_bytes;

/// POST /uploadfile - Decode a single leaf photo and echo its metadata
///
/// # Request (multipart)
/// - `image`: the photo
/// - `plant`: plant name
///
/// # Errors
/// - 400 Bad Request: missing field or undecodable image
pub async fn prototype_upload_handler(
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> Result<Json<PrototypeUploadResponse>, ApiError> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let plant = form.require_plant()?;
    let upload = form.take_image("image")?;

    let (_, info) = decode_image_bytes(&upload.bytes)?;
    debug!(
        "Prototype upload: {}x{} {:?} for {}",
        info.width, info.height, info.format, plant
    );

    Ok(Json(PrototypeUploadResponse {
        filename: upload.file_name,
        plant,
        width: info.width,
        height: info.height,
    }))
}

/// POST /api/v1/uploadfile - Diagnose a plant from two photos of the same leaf
///
/// # Request (multipart)
/// - `image1`, `image2`: the photos
/// - `plant`: plant name, matched case-insensitively against registered models
///
/// # Response
/// Up to five `{name, percentage}` items, highest first.
///
/// # Errors
/// - 400 Bad Request: missing field or undecodable image
/// - 500 Internal Server Error: no model for the plant, unsupported model
///   dimensions, or no confident prediction
pub async fn diagnose_upload_handler(
    State(state): State<AppState>,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> Result<Json<Vec<PredictionItem>>, ApiError> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let plant = form.require_plant()?;

    // Plant lookup precedes any image work
    let entry = state.registry.get(&plant)?;

    let first_upload = form.take_image("image1")?;
    let second_upload = form.take_image("image2")?;
    let (first, _) = decode_image_bytes(&first_upload.bytes)?;
    let (second, _) = decode_image_bytes(&second_upload.bytes)?;

    let _ = state
        .collector
        .collect_in_background(entry.name().to_string(), vec![first_upload, second_upload]);

    let ranked = tokio::task::spawn_blocking(move || diagnose(&entry, &first, &second))
        .await
        .map_err(|e| ApiError::InternalError(format!("Prediction task failed: {}", e)))??;

    info!("✓ Diagnosis for {}: {} labels", plant, ranked.len());

    Ok(Json(ranked.into_iter().map(PredictionItem::from).collect()))
}
