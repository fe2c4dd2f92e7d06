// src/error.rs

use thiserror::Error;

/// Errors surfaced by the vendor client and platform setup.
///
/// There is no local recovery: the hub's per-tick error handling logs the
/// failure and skips the cycle, so every variant simply propagates.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Clarifai API error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode predict response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
