// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Config file to registry and reference store

use plantcare_api::{
    config::ServiceConfig,
    inference::ModelRegistry,
    reference::{InMemoryReferenceStore, ReferenceStore},
};

#[test]
fn test_unbound_models_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let labels_path = dir.path().join("potato.txt");
    std::fs::write(&labels_path, "early_blight\nhealthy\nlate_blight\n").unwrap();

    let config_path = dir.path().join("plantcare.toml");
    std::fs::write(
        &config_path,
        format!(
            "[models.tomato]\nlabels = [\"healthy\"]\n\n[models.potato]\nlabels_path = {:?}\n",
            labels_path.display().to_string()
        ),
    )
    .unwrap();

    let config = ServiceConfig::from_file(&config_path).unwrap();
    config.validate().unwrap();

    let registry = ModelRegistry::load(&config.model_configs()).unwrap();
    assert_eq!(registry.plants(), vec!["potato".to_string(), "tomato".to_string()]);
    assert_eq!(registry.get("potato").unwrap().labels().len(), 3);
}

#[tokio::test]
async fn test_reference_file_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("reference.json");
    std::fs::write(
        &data_path,
        r#"{"plants": [{"name": "tomato"}], "diseases": [], "news": []}"#,
    )
    .unwrap();

    let mut config = ServiceConfig::default();
    config
        .apply_overrides(|key| {
            (key == "REFERENCE_DATA_PATH").then(|| data_path.display().to_string())
        })
        .unwrap();

    let path = config.reference.data_path.clone().unwrap();
    let store = InMemoryReferenceStore::from_json_file(path).await.unwrap();
    assert_eq!(store.all_plants().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_shipped_config_starts_without_model_files() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));

    let config = ServiceConfig::from_file(&root.join("plantcare.toml")).unwrap();
    config.validate().unwrap();

    let registry = ModelRegistry::load(&config.model_configs()).unwrap();
    assert_eq!(registry.plants(), vec!["potato".to_string(), "tomato".to_string()]);
    assert!(registry.list_models().iter().all(|m| !m.available));

    let data_path = root.join(config.reference.data_path.unwrap());
    let store = InMemoryReferenceStore::from_json_file(data_path).await.unwrap();
    assert!(!store.all_plants().await.unwrap().is_empty());
}
