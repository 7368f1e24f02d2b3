// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Health and reference-data endpoints

use axum::{extract::State, Form, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::ApiError;
use super::http_server::AppState;
use crate::reference::{Disease, News, Plant};
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
    pub version: String,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantNamesResponse {
    pub plants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseDetailRequest {
    #[serde(alias = "disease_name")]
    pub disease: String,
    #[serde(alias = "plant_name")]
    pub plant: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseListRequest {
    #[serde(alias = "plant_name")]
    pub plant: String,
}

/// GET / - Liveness message
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Plant disease detection service is running".to_string(),
        version: version::VERSION.to_string(),
        models: state.registry.plants(),
    })
}

/// GET /test_db - Names of every plant in the reference store
pub async fn test_db_handler(
    State(state): State<AppState>,
) -> Result<Json<PlantNamesResponse>, ApiError> {
    let plants = state.reference.all_plants().await?;
    if plants.is_empty() {
        return Err(ApiError::NotFound("no plants found".to_string()));
    }

    Ok(Json(PlantNamesResponse {
        plants: plants.into_iter().map(|p| p.name).collect(),
    }))
}

/// POST /api/v1/disease_detail - One disease record for a plant
pub async fn disease_detail_handler(
    State(state): State<AppState>,
    WithRejection(Form(request), _): WithRejection<Form<DiseaseDetailRequest>, ApiError>,
) -> Result<Json<Disease>, ApiError> {
    debug!(
        "Disease detail requested: {} on {}",
        request.disease, request.plant
    );

    state
        .reference
        .disease_detail(&request.disease, &request.plant)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "disease '{}' not found for plant '{}'",
                request.disease, request.plant
            ))
        })
}

/// POST /api/v1/disease_list - Diseases of a plant; empty is not an error
pub async fn disease_list_handler(
    State(state): State<AppState>,
    WithRejection(Form(request), _): WithRejection<Form<DiseaseListRequest>, ApiError>,
) -> Result<Json<Vec<Disease>>, ApiError> {
    let diseases = state.reference.diseases_for_plant(&request.plant).await?;
    Ok(Json(diseases))
}

/// GET /api/v1/plant_list
pub async fn plant_list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Plant>>, ApiError> {
    let plants = state.reference.all_plants().await?;
    if plants.is_empty() {
        return Err(ApiError::NotFound("no plants found".to_string()));
    }
    Ok(Json(plants))
}

/// GET /api/v1/news_list
pub async fn news_list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<News>>, ApiError> {
    let news = state.reference.all_news().await?;
    if news.is_empty() {
        return Err(ApiError::NotFound("no news found".to_string()));
    }
    Ok(Json(news))
}
