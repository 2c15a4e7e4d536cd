//! Error taxonomy
//!
//! Only construction can fail fatally. Everything on the per-tick path is
//! logged and absorbed so the loop keeps running.

use thiserror::Error;

/// Errors surfaced by the orchestrator and configuration layer
#[derive(Debug, Error)]
pub enum GameError {
    /// The canvas could not provide a 2D drawing surface
    #[error("could not acquire a 2D drawing surface")]
    SurfaceUnavailable,
    /// Configuration JSON was malformed
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// Reading a configuration file failed
    #[error("failed to read configuration: {0}")]
    ConfigIo(#[source] std::io::Error),
}

/// Errors from the persisted key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
