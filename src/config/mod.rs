// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration

pub mod settings;

pub use settings::{
    CollectionSettings, ConfigError, PlantModelSettings, ReferenceSettings, ServerSettings,
    ServiceConfig,
};
