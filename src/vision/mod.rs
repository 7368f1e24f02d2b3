// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image handling for leaf photo uploads
//!
//! This module provides:
//! - Decoding and format detection for uploaded bytes
//! - Resizing and tensor conversion to a model's declared input shape

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{decode_image_bytes, detect_format, format_to_extension, ImageError, ImageInfo};
pub use preprocessing::{
    image_to_tensor, prepare_image, preprocess_for_model, ChannelLayout, InputSpec, Normalization,
};
