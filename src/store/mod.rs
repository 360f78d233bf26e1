// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-TutorGPT-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of TutorGPT and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Local persistence.
//!
//! A small key-value store (directory of JSON values, or memory) plus the adapter that maps the
//! subject tree and the selection onto fixed keys.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::IdError;

pub mod kv;
pub mod persistence;

pub use kv::{KeyValueStore, MemoryStorage, StorageDir, WriteDurability};
pub use persistence::{
    decode_subjects, default_subjects, encode_subjects, LocalPersistence, PersistedState,
    StatePort, SELECTED_SUBJECT_KEY, SELECTED_TOPIC_KEY, SUBJECTS_KEY,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("json error for key {key:?}: {source}")]
    Json {
        key: String,
        source: serde_json::Error,
    },
    #[error("invalid storage key {key:?}")]
    InvalidKey { key: String },
    #[error("invalid id for {field}: {value:?}: {source}")]
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
}
