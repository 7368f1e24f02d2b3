// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the plant disease detection service

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-dual-image-diagnosis-2025-11-04";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Build date
pub const BUILD_DATE: &str = "2025-11-04";

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("PlantCare API {} ({})", VERSION_NUMBER, BUILD_DATE)
}
