// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Two-image diagnosis endpoint tests (POST /api/v1/uploadfile)

use axum::http::StatusCode;
use plantcare_api::{
    api::{create_app, AppState, NO_MODEL_MESSAGE, UNSUPPORTED_DIMENSIONS_MESSAGE},
    inference::ModelRegistry,
    reference::{InMemoryReferenceStore, ReferenceData},
    storage::ImageCollector,
};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

use super::support::{
    json_body, mock_registry, multipart_request, png_bytes, state_with, Part,
};

const URI: &str = "/api/v1/uploadfile";

fn diagnose_parts(plant: &str) -> Vec<Part> {
    vec![
        Part::Text("plant", plant.to_string()),
        Part::File("image1", "leaf1.png", png_bytes(48, 40)),
        Part::File("image2", "leaf2.png", png_bytes(40, 48)),
    ]
}

fn scripted_state() -> AppState {
    state_with(
        mock_registry(vec![1, 32, 32, 3], vec![vec![0.1, 0.9], vec![0.8, 0.2]]),
        ReferenceData::default(),
    )
}

#[tokio::test]
async fn test_ranked_predictions() {
    let app = create_app(scripted_state());

    let response = app
        .oneshot(multipart_request(URI, &diagnose_parts("tomato")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "healthy");
    assert_eq!(items[1]["name"], "early_blight");

    let first = items[0]["percentage"].as_f64().unwrap();
    let second = items[1]["percentage"].as_f64().unwrap();
    assert!((first - 52.94).abs() < 0.01);
    assert!((second - 47.06).abs() < 0.01);
}

#[tokio::test]
async fn test_plant_name_is_case_insensitive() {
    let app = create_app(scripted_state());

    let response = app
        .oneshot(multipart_request(URI, &diagnose_parts("  Tomato ")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_plant() {
    let app = create_app(scripted_state());

    let response = app
        .oneshot(multipart_request(URI, &diagnose_parts("cassava")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["error_type"], "unknown_plant");
    assert_eq!(body["message"], NO_MODEL_MESSAGE);
}

#[tokio::test]
async fn test_unknown_plant_checked_before_images() {
    let app = create_app(scripted_state());

    let parts = vec![Part::Text("plant", "cassava".to_string())];
    let response = app.oneshot(multipart_request(URI, &parts)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error_type"], "unknown_plant");
}

#[tokio::test]
async fn test_plant_without_model() {
    let app = create_app(scripted_state());

    let response = app
        .oneshot(multipart_request(URI, &diagnose_parts("potato")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["error_type"], "model_unavailable");
    assert_eq!(body["message"], NO_MODEL_MESSAGE);
}

#[tokio::test]
async fn test_unsupported_model_dimensions() {
    let state = state_with(
        mock_registry(vec![1, 224, 3], vec![vec![0.5, 0.5]]),
        ReferenceData::default(),
    );
    let app = create_app(state);

    let response = app
        .oneshot(multipart_request(URI, &diagnose_parts("tomato")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["message"], UNSUPPORTED_DIMENSIONS_MESSAGE);
    assert_eq!(body["details"]["input_shape"], serde_json::json!([1, 224, 3]));
}

#[tokio::test]
async fn test_all_zero_scores() {
    let state = state_with(
        mock_registry(vec![1, 32, 32, 3], vec![vec![0.0, 0.0]]),
        ReferenceData::default(),
    );
    let app = create_app(state);

    let response = app
        .oneshot(multipart_request(URI, &diagnose_parts("tomato")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await["error_type"],
        "no_confident_prediction"
    );
}

#[tokio::test]
async fn test_missing_second_image() {
    let app = create_app(scripted_state());

    let parts = vec![
        Part::Text("plant", "tomato".to_string()),
        Part::File("image1", "leaf1.png", png_bytes(8, 8)),
    ];
    let response = app.oneshot(multipart_request(URI, &parts)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["details"]["field"], "image2");
}

#[tokio::test]
async fn test_corrupt_image() {
    let app = create_app(scripted_state());

    let parts = vec![
        Part::Text("plant", "tomato".to_string()),
        Part::File("image1", "leaf1.png", png_bytes(8, 8)),
        Part::File("image2", "leaf2.png", b"definitely not an image".to_vec()),
    ];
    let response = app.oneshot(multipart_request(URI, &parts)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_plant() {
    let app = create_app(scripted_state());

    let parts = vec![
        Part::File("image1", "leaf1.png", png_bytes(8, 8)),
        Part::File("image2", "leaf2.png", png_bytes(8, 8)),
    ];
    let response = app.oneshot(multipart_request(URI, &parts)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["details"]["field"], "plant");
}

#[tokio::test]
async fn test_uploads_are_collected() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(
        mock_registry(vec![1, 32, 32, 3], vec![vec![0.1, 0.9], vec![0.8, 0.2]]),
        Arc::new(InMemoryReferenceStore::default()),
        ImageCollector::new(true, dir.path()),
    );
    let app = create_app(state);

    let response = app
        .oneshot(multipart_request(URI, &diagnose_parts("tomato")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let plant_dir = dir.path().join("tomato");
    let mut saved = 0;
    for _ in 0..50 {
        saved = std::fs::read_dir(&plant_dir)
            .map(|entries| entries.count())
            .unwrap_or(0);
        if saved == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(saved, 2);
}

#[tokio::test]
async fn test_collection_failure_does_not_fail_request() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();

    let state = AppState::new(
        mock_registry(vec![1, 32, 32, 3], vec![vec![0.1, 0.9], vec![0.8, 0.2]]),
        Arc::new(InMemoryReferenceStore::default()),
        ImageCollector::new(true, &blocker),
    );

    let response = create_app(state)
        .oneshot(multipart_request(URI, &diagnose_parts("tomato")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_registry() {
    let state = state_with(ModelRegistry::empty(), ReferenceData::default());

    let response = create_app(state)
        .oneshot(multipart_request(URI, &diagnose_parts("tomato")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_logit_outputs_are_rejected() {
    let state = state_with(
        mock_registry(vec![1, 32, 32, 3], vec![vec![-2.0, -6.0], vec![-3.0, -4.0]]),
        ReferenceData::default(),
    );

    let response = create_app(state)
        .oneshot(multipart_request(URI, &diagnose_parts("tomato")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error_type"], "prediction_failed");
}

#[tokio::test]
async fn test_non_multipart_body_gets_json_error() {
    let request = axum::http::Request::builder()
        .method("POST")
        .uri(URI)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{}"))
        .unwrap();

    let response = create_app(scripted_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error_type"], "invalid_request");
}
