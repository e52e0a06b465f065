//! Chat completions endpoint
//!
//! Translates an OpenAI-shaped request into one automation-driver call
//! and synthesizes the matching response, streamed or not. Both modes
//! consume the same single driver reply; only the client-facing
//! transport differs.

use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};

use crate::api::content;
use crate::api::streaming;
use crate::api::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::error::AppError;
use crate::state::SharedState;

/// POST /chat/completions
pub async fn chat_completions(
    State(state): State<SharedState>,
    Json(request): Json<ChatCompletionRequest>,
) -> Result<Response, AppError> {
    let messages = request
        .messages
        .as_ref()
        .filter(|messages| !messages.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("Invalid request format".to_string()))?;

    info!(
        message_count = messages.len(),
        stream = request.stream.unwrap_or(false),
        "Chat completion request received"
    );

    // The reply is generated for the last message; earlier turns only
    // contribute harvested images.
    let prompt = content::content_text(&messages[messages.len() - 1].content);

    let created = unix_timestamp();
    let id = format!("chatcmpl-{}", created);
    let streaming_requested = request.stream.unwrap_or(false);

    let model = state.model.read().await.clone();
    let reply = state
        .invoker
        .invoke(&model, &request, &prompt)
        .await
        .map_err(|e| {
            error!(error = %e, "Automation driver call failed");
            e
        })?;

    if streaming_requested {
        streaming::sse_response(id, created, reply, state.stream_chunk_delay)
    } else {
        Ok(Json(ChatCompletionResponse::new(id, created, &prompt, reply)).into_response())
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
