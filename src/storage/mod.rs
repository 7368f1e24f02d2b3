// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod image_collector;

pub use image_collector::{CollectionError, ImageCollector, UploadedImage};
