//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Rejection of a malformed "add timer" request
///
/// The collection is never touched when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Timer name must not be empty")]
    EmptyName,

    #[error("Duration '{0}' is not a whole number of seconds")]
    NotANumber(String),

    #[error("Duration must be a positive number of seconds, got {0}")]
    NonPositiveDuration(i64),

    #[error("Unknown category '{0}' (expected Workout, Study or Break)")]
    UnknownCategory(String),
}

/// Failure while reading or writing the persisted collection
///
/// Never surfaced to command callers; the gateway logs and swallows it.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed timer data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
