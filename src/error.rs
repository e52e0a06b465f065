//! Error types and error handling for the bridge
//!
//! This module defines the application-level error type and its conversion
//! to HTTP responses. Every error renders as the OpenAI-style
//! `{"error": {"message": ...}}` envelope that completions clients expect.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can surface from a request handler are represented by
/// this enum. Each variant implements automatic conversion to HTTP
/// responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request carried no valid credential
    #[error("Invalid or missing API key")]
    Unauthorized,

    /// Malformed request body (missing `messages`, unknown model, ...)
    #[error("{0}")]
    InvalidRequest(String),

    /// The automation driver failed to produce a reply
    #[error(transparent)]
    Bridge(#[from] crate::bridge::BridgeError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Bridge(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": { "message": self.to_string() },
        }));

        (status, body).into_response()
    }
}
