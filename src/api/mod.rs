// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod upload;

pub use errors::{ApiError, ErrorResponse, NO_MODEL_MESSAGE, UNSUPPORTED_DIMENSIONS_MESSAGE};
pub use handlers::{DiseaseDetailRequest, DiseaseListRequest, HealthResponse, PlantNamesResponse};
pub use http_server::{create_app, start_server, AppState, MAX_UPLOAD_BODY};
pub use upload::{PredictionItem, PrototypeUploadResponse, UploadForm};
