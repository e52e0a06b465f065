//! API-key authentication for the HTTP surface
//!
//! The key is generated once at startup and printed for operator
//! retrieval; it is never persisted, so restarting the process rotates
//! it. Requests present it either as `X-API-Key: <key>` or as
//! `Authorization: Bearer <key>`.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::SharedState;

/// Process-lifetime shared secret.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Generate a fresh key.
    pub fn generate() -> Self {
        Self(format!(
            "sk-{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    /// Constant-time comparison against a presented credential.
    pub fn matches(&self, candidate: &str) -> bool {
        bool::from(candidate.as_bytes().ct_eq(self.0.as_bytes()))
    }

    /// The key itself, for the one-time operator print at startup.
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

/// Middleware guarding protected routes.
///
/// Accepts a matching `X-API-Key` header, or `Authorization: Bearer`
/// with a matching token; everything else is rejected with 401 before
/// any handler logic runs. Auth failures are not rate limited.
pub async fn require_api_key(
    State(state): State<SharedState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    if let Some(value) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        if state.api_key.matches(value) {
            return next.run(request).await;
        }
    }

    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if state.api_key.matches(token) {
                return next.run(request).await;
            }
        }
    }

    AppError::Unauthorized.into_response()
}
