//! Bridge-specific error types
//!
//! Errors raised while driving the automation backend or its image side
//! channel.

use thiserror::Error;

/// Errors that can occur while invoking the automation driver
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Failed to spawn the driver process (e.g., command not found)
    #[error("Failed to spawn driver process: {0}")]
    SpawnFailed(std::io::Error),

    /// I/O on the driver's stdin/stdout failed
    #[error("Driver I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Driver exited before or while answering
    #[error("Driver process exited unexpectedly: {0}")]
    DriverExited(String),

    /// Request or reply violated the JSON line protocol
    #[error("Driver protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    /// Driver reported a failure of its own
    #[error("{0}")]
    DriverFailed(String),

    /// Driver session handles are gone (process already torn down)
    #[error("Driver session unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the best-effort image side channel. Logged by the caller,
/// never escalated to an HTTP error.
#[derive(Error, Debug)]
pub enum SideChannelError {
    /// The reference is not an inline base64 image
    #[error("Not an inline base64 image")]
    UnsupportedEncoding,

    /// Payload did not decode as base64
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Decoded bytes are not a readable image
    #[error("Image decode failed: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Clipboard could not be opened or written
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),
}
