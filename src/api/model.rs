//! Automation model selection
//!
//! The driver can address a small fixed set of target models; the active
//! choice is a single runtime-mutable value, shared with request
//! handling under a read-write lock and never persisted.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::state::{SharedState, ALLOWED_MODELS};

#[allow(missing_docs)]
#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub model: String,
}

#[allow(missing_docs)]
#[derive(Debug, Deserialize)]
pub struct ModelUpdateRequest {
    pub model: String,
}

/// GET /model - report the currently selected automation model
pub async fn get_model(State(state): State<SharedState>) -> Json<ModelResponse> {
    Json(ModelResponse {
        model: state.model.read().await.clone(),
    })
}

/// POST /model - switch the automation model for subsequent requests
pub async fn set_model(
    State(state): State<SharedState>,
    Json(request): Json<ModelUpdateRequest>,
) -> Result<Json<ModelResponse>, AppError> {
    if !ALLOWED_MODELS.contains(&request.model.as_str()) {
        return Err(AppError::InvalidRequest(format!(
            "Unknown model '{}'. Allowed models: {}",
            request.model,
            ALLOWED_MODELS.join(", ")
        )));
    }

    *state.model.write().await = request.model.clone();
    info!(model = %request.model, "Automation model updated");

    Ok(Json(ModelResponse {
        model: request.model,
    }))
}
