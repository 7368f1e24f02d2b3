// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    disease_detail_handler, disease_list_handler, health_handler, news_list_handler,
    plant_list_handler, test_db_handler,
};
use super::upload::{diagnose_upload_handler, prototype_upload_handler};
use crate::inference::ModelRegistry;
use crate::reference::{InMemoryReferenceStore, ReferenceStore};
use crate::storage::ImageCollector;
use crate::vision::image_utils::MAX_IMAGE_SIZE;

/// Request body limit: two full-size images plus form overhead
pub const MAX_UPLOAD_BODY: usize = 2 * MAX_IMAGE_SIZE + 1024 * 1024;

/// Shared handler context, built once before the server accepts connections
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub reference: Arc<dyn ReferenceStore>,
    pub collector: ImageCollector,
}

impl AppState {
    pub fn new(
        registry: ModelRegistry,
        reference: Arc<dyn ReferenceStore>,
        collector: ImageCollector,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            reference,
            collector,
        }
    }

    /// State with no models, no reference data and collection disabled
    pub fn new_for_test() -> Self {
        Self::new(
            ModelRegistry::empty(),
            Arc::new(InMemoryReferenceStore::default()),
            ImageCollector::disabled(),
        )
    }
}

/// Build the service router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/", get(health_handler))
        .route("/test_db", get(test_db_handler))
        // Single-image prototype upload
        .route("/uploadfile", post(prototype_upload_handler))
        // Versioned API
        .route("/api/v1/uploadfile", post(diagnose_upload_handler))
        .route("/api/v1/disease_detail", post(disease_detail_handler))
        .route("/api/v1/disease_list", post(disease_list_handler))
        .route("/api/v1/plant_list", get(plant_list_handler))
        .route("/api/v1/news_list", get(news_list_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until the process is stopped
///
/// The registry inside `state` is already loaded; nothing is accepted before this call.
pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
