// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Plant, disease and news reference data

pub mod records;
pub mod store;

pub use records::{Disease, News, Plant, ReferenceData};
pub use store::{InMemoryReferenceStore, ReferenceStore, StoreError};
