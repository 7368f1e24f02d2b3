// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use plantcare_api::{
    api::{start_server, AppState},
    cli::{Cli, Commands},
    inference::ModelRegistry,
    reference::{InMemoryReferenceStore, ReferenceStore},
    storage::ImageCollector,
    version,
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    info!("🚀 Starting {}", version::get_version_string());

    let config = cli.load_config()?;

    // Models are loaded before anything is bound; a bad model aborts startup
    let registry = ModelRegistry::load(&config.model_configs())
        .context("failed to load plant models")?;
    for model in registry.list_models() {
        info!(
            "  {} ({} labels, {})",
            model.name,
            model.labels,
            if model.available { "loaded" } else { "no model" }
        );
    }

    if cli.command() == Commands::CheckConfig {
        info!("✓ Configuration OK: {} plants", registry.len());
        return Ok(());
    }

    let reference: Arc<dyn ReferenceStore> = match &config.reference.data_path {
        Some(path) => Arc::new(
            InMemoryReferenceStore::from_json_file(path)
                .await
                .context("failed to load reference data")?,
        ),
        None => {
            info!("No reference data configured, serving an empty store");
            Arc::new(InMemoryReferenceStore::default())
        }
    };

    let collector = ImageCollector::new(config.collection.enabled, &config.collection.path);
    if collector.is_enabled() {
        info!("Collecting uploads under {}", collector.root().display());
    }

    let addr = config.socket_addr()?;
    let state = AppState::new(registry, reference, collector);

    info!("✓ {} plant models ready", state.registry.len());
    start_server(state, addr).await
}
