// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload response types

use serde::{Deserialize, Serialize};

use crate::inference::RankedLabel;

/// One ranked disease label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionItem {
    /// Class label from the plant's label list
    pub name: String,
    /// Normalized score scaled to 0-100
    pub percentage: f32,
}

impl From<RankedLabel> for PredictionItem {
    fn from(ranked: RankedLabel) -> Self {
        Self {
            name: ranked.label,
            percentage: ranked.score * 100.0,
        }
    }
}

/// Echo returned by the single-image upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrototypeUploadResponse {
    pub filename: Option<String>,
    pub plant: String,
    pub width: u32,
    pub height: u32,
}
