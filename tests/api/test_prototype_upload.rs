// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Single-image upload tests (POST /uploadfile)

use axum::http::StatusCode;
use plantcare_api::api::{create_app, AppState};
use tower::util::ServiceExt;

use super::support::{json_body, multipart_request, png_bytes, Part};

#[tokio::test]
async fn test_echoes_metadata() {
    let app = create_app(AppState::new_for_test());

    let parts = vec![
        Part::Text("plant", "tomato".to_string()),
        Part::File("image", "leaf.png", png_bytes(12, 7)),
    ];
    let response = app
        .oneshot(multipart_request("/uploadfile", &parts))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["filename"], "leaf.png");
    assert_eq!(body["plant"], "tomato");
    assert_eq!(body["width"], 12);
    assert_eq!(body["height"], 7);
}

#[tokio::test]
async fn test_rejects_non_image() {
    let app = create_app(AppState::new_for_test());

    let parts = vec![
        Part::Text("plant", "tomato".to_string()),
        Part::File("image", "notes.txt", b"hello".to_vec()),
    ];
    let response = app
        .oneshot(multipart_request("/uploadfile", &parts))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error_type"], "invalid_request");
}

#[tokio::test]
async fn test_requires_image() {
    let app = create_app(AppState::new_for_test());

    let parts = vec![Part::Text("plant", "tomato".to_string())];
    let response = app
        .oneshot(multipart_request("/uploadfile", &parts))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["details"]["field"], "image");
}
