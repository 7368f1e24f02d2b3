// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Registry construction from configuration

use plantcare_api::inference::{
    Classifier, MockClassifier, ModelConfig, ModelRegistry, PredictionError, RegistryError,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn mock_loader(output_len: usize) -> impl FnMut(&Path) -> anyhow::Result<Arc<dyn Classifier>> {
    move |_: &Path| {
        let mock = MockClassifier::new(vec![1, 16, 16, 3], vec![vec![0.5; output_len]]);
        Ok(Arc::new(mock) as Arc<dyn Classifier>)
    }
}

#[test]
fn test_labels_file_is_read_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let labels_path = dir.path().join("labels.txt");
    std::fs::write(&labels_path, "# tomato classes\nbacterial_spot\n\nhealthy\nleaf_mold\n").unwrap();

    let config = ModelConfig {
        name: "Tomato".to_string(),
        model_path: Some(PathBuf::from("tomato.onnx")),
        labels_path: Some(labels_path),
        ..Default::default()
    };

    let registry = ModelRegistry::load_with(&[config], mock_loader(3)).unwrap();
    let entry = registry.get("tomato").unwrap();
    assert_eq!(entry.labels(), ["bacterial_spot", "healthy", "leaf_mold"]);
    assert!(entry.is_available());
}

#[test]
fn test_missing_labels_file() {
    let config = ModelConfig {
        name: "tomato".to_string(),
        model_path: Some(PathBuf::from("tomato.onnx")),
        labels_path: Some(PathBuf::from("/nonexistent/labels.txt")),
        ..Default::default()
    };

    let err = ModelRegistry::load_with(&[config], mock_loader(3)).unwrap_err();
    assert!(matches!(err, RegistryError::Labels { .. }));
}

#[test]
fn test_label_count_mismatch_is_fatal() {
    let config = ModelConfig {
        name: "tomato".to_string(),
        model_path: Some(PathBuf::from("tomato.onnx")),
        labels: Some(vec!["a".to_string(), "b".to_string()]),
        ..Default::default()
    };

    let err = ModelRegistry::load_with(&[config], mock_loader(4)).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::ConfigurationIntegrity { labels: 2, outputs: 4, .. }
    ));
}

#[test]
fn test_missing_onnx_file_fails_startup() {
    let config = ModelConfig {
        name: "tomato".to_string(),
        model_path: Some(PathBuf::from("/nonexistent/tomato.onnx")),
        labels: Some(vec!["healthy".to_string()]),
        ..Default::default()
    };

    let err = ModelRegistry::load(&[config]).unwrap_err();
    assert!(matches!(err, RegistryError::ModelLoad { ref plant, .. } if plant == "tomato"));
}

#[test]
fn test_unbound_and_unknown_plants() {
    let config = ModelConfig {
        name: "potato".to_string(),
        labels: Some(vec!["healthy".to_string()]),
        ..Default::default()
    };

    let registry = ModelRegistry::load(&[config]).unwrap();
    assert_eq!(registry.plants(), vec!["potato".to_string()]);

    let entry = registry.get("POTATO").unwrap();
    assert!(!entry.is_available());
    assert!(matches!(
        entry.input_shape(),
        Err(PredictionError::ModelUnavailable { .. })
    ));

    assert!(matches!(
        registry.get("cassava"),
        Err(PredictionError::UnknownPlant { .. })
    ));
}

#[test]
fn test_duplicate_after_normalization() {
    let configs = [
        ModelConfig {
            name: "tomato".to_string(),
            labels: Some(vec!["a".to_string()]),
            ..Default::default()
        },
        ModelConfig {
            name: " Tomato".to_string(),
            labels: Some(vec!["a".to_string()]),
            ..Default::default()
        },
    ];

    let err = ModelRegistry::load(&configs).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicatePlant(name) if name == "tomato"));
}
