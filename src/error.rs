//! Error type for the fallible edges of the engine.
//!
//! Only loading (game data, configuration) and the audio backend return
//! errors to the caller. Inside a running session every failure is absorbed
//! and logged: a missing actor skips its effect, a bad sound payload turns
//! playback into a no-op.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PlaykitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse game data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load config file {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("Failed to decode sound '{id}': {reason}")]
    Decode { id: String, reason: String },

    #[error("Audio backend unavailable: {0}")]
    AudioBackend(String),
}
