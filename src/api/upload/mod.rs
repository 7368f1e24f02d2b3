// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Leaf photo upload endpoints
//!
//! Provides POST /uploadfile (single image echo) and POST /api/v1/uploadfile
//! (two-image disease diagnosis).

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{diagnose_upload_handler, prototype_upload_handler};
pub use request::UploadForm;
pub use response::{PredictionItem, PrototypeUploadResponse};
