// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use axum_extra::extract::multipart::MultipartRejection;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::inference::PredictionError;
use crate::reference::StoreError;
use crate::vision::ImageError;

/// Message returned whenever a plant has no usable model
pub const NO_MODEL_MESSAGE: &str = "no model available for the provided plant";

/// Message returned when a model's input shape cannot be prepared for
pub const UNSUPPORTED_DIMENSIONS_MESSAGE: &str = "model dimensions are not supported";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    NotFound(String),
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    UnknownPlant { plant: String },
    ModelUnavailable { plant: String },
    UnsupportedModelDimensions { shape: Vec<i64> },
    NoConfidentPrediction,
    PredictionFailed(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let plant_details = |plant: &str| {
            let mut details = HashMap::new();
            details.insert(
                "plant".to_string(),
                serde_json::Value::String(plant.to_string()),
            );
            Some(details)
        };

        let (error_type, message, details) = match self {
            ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::UnknownPlant { plant } => {
                ("unknown_plant", NO_MODEL_MESSAGE.to_string(), plant_details(plant))
            }
            ApiError::ModelUnavailable { plant } => (
                "model_unavailable",
                NO_MODEL_MESSAGE.to_string(),
                plant_details(plant),
            ),
            ApiError::UnsupportedModelDimensions { shape } => {
                let mut details = HashMap::new();
                details.insert(
                    "input_shape".to_string(),
                    serde_json::Value::Array(
                        shape
                            .iter()
                            .map(|d| serde_json::Value::Number((*d).into()))
                            .collect(),
                    ),
                );
                (
                    "unsupported_model_dimensions",
                    UNSUPPORTED_DIMENSIONS_MESSAGE.to_string(),
                    Some(details),
                )
            }
            ApiError::NoConfidentPrediction => (
                "no_confident_prediction",
                "no confident prediction could be made for the provided images".to_string(),
                None,
            ),
            ApiError::PredictionFailed(msg) => ("prediction_failed", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UnknownPlant { .. }
            | ApiError::ModelUnavailable { .. }
            | ApiError::UnsupportedModelDimensions { .. }
            | ApiError::NoConfidentPrediction
            | ApiError::PredictionFailed(_)
            | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::UnknownPlant { plant } => write!(f, "{} ('{}')", NO_MODEL_MESSAGE, plant),
            ApiError::ModelUnavailable { plant } => {
                write!(f, "{} ('{}', model not loaded)", NO_MODEL_MESSAGE, plant)
            }
            ApiError::UnsupportedModelDimensions { shape } => {
                write!(f, "{}: {:?}", UNSUPPORTED_DIMENSIONS_MESSAGE, shape)
            }
            ApiError::NoConfidentPrediction => write!(f, "No confident prediction"),
            ApiError::PredictionFailed(msg) => write!(f, "Prediction failed: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::UnknownPlant { plant } => ApiError::UnknownPlant { plant },
            PredictionError::ModelUnavailable { plant } => ApiError::ModelUnavailable { plant },
            PredictionError::UnsupportedModelDimensions { shape } => {
                ApiError::UnsupportedModelDimensions { shape }
            }
            PredictionError::NoConfidentPrediction => ApiError::NoConfidentPrediction,
            other => ApiError::PredictionFailed(other.to_string()),
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        ApiError::InvalidRequest(format!("Invalid image: {}", err))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::ValidationError {
            field: "form".to_string(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }
        (status, Json(self.to_response())).into_response()
    }
}
