//! Error types.
//!
//! Gesture paths never fail: they recover locally and report what happened
//! through `bool`/`Option` returns. Errors only arise at the edges where data
//! enters the core from outside (history snapshots and configuration files).

use crate::objects::ObjectId;
use thiserror::Error;

/// Errors raised when bulk-loading objects into the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate object id in snapshot: {0}")]
    DuplicateId(ObjectId),
    #[error("Snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised while loading or validating an [`EditorConfig`](crate::config::EditorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid zoom range: min {min} must be positive and below max {max}")]
    ZoomRange { min: f64, max: f64 },
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
