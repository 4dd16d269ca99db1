// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;
use uuid::Uuid;

/// Failure raised by a record store. The analytics engine never recovers
/// from these; they are handed back to the caller as-is.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Record store unavailable: {0}")]
    Unavailable(String),
    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("Could not encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

impl ParseError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        ParseError::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}
