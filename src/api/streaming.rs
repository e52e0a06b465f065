//! Streaming response synthesis (Server-Sent Events)
//!
//! The driver reply arrives as one complete text; the stream below
//! re-chunks it line by line in the OpenAI `chat.completion.chunk`
//! framing, pacing the chunks to read like incremental generation.

use async_stream::stream;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use futures_util::{stream::Stream, StreamExt};
use std::time::Duration;

use crate::api::types::{ChatCompletionChunk, Delta};
use crate::error::AppError;

/// Build the SSE response for one completed driver reply.
///
/// Frames, in order: a role announcement, one chunk per line of the
/// reply (newline re-appended, `chunk_delay` between chunks), a terminal
/// chunk with `finish_reason: "stop"`, and the `[DONE]` sentinel. Every
/// chunk carries the same `id` and `created`.
///
/// # Arguments
/// * `id` - Response id shared by all chunks
/// * `created` - Creation timestamp shared by all chunks
/// * `text` - Complete driver reply
/// * `chunk_delay` - Pause between consecutive content chunks
///
/// # Returns
/// * `Result<Response, AppError>` - SSE HTTP response or error
pub fn sse_response(
    id: String,
    created: u64,
    text: String,
    chunk_delay: Duration,
) -> Result<Response, AppError> {
    let frames =
        chunk_frames(id, created, text, chunk_delay).map(|frame| Ok::<_, std::io::Error>(frame));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(frames))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build SSE response: {}", e)))
}

/// Yield each SSE frame as a fully formatted `data: ...\n\n` string.
fn chunk_frames(
    id: String,
    created: u64,
    text: String,
    chunk_delay: Duration,
) -> impl Stream<Item = String> {
    stream! {
        yield frame(&ChatCompletionChunk::new(
            &id,
            created,
            Delta { role: Some("assistant"), content: None },
            None,
        ));

        for line in text.lines() {
            yield frame(&ChatCompletionChunk::new(
                &id,
                created,
                Delta { role: None, content: Some(format!("{}\n", line)) },
                None,
            ));
            tokio::time::sleep(chunk_delay).await;
        }

        yield frame(&ChatCompletionChunk::new(&id, created, Delta::default(), Some("stop")));
        yield "data: [DONE]\n\n".to_string();
    }
}

fn frame(chunk: &ChatCompletionChunk) -> String {
    format!(
        "data: {}\n\n",
        serde_json::to_string(chunk).unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect_frames(text: &str) -> Vec<String> {
        chunk_frames(
            "chatcmpl-1".to_string(),
            42,
            text.to_string(),
            Duration::from_millis(100),
        )
        .collect()
        .await
    }

    fn parse_data(frame: &str) -> serde_json::Value {
        let payload = frame
            .strip_prefix("data: ")
            .and_then(|f| f.strip_suffix("\n\n"))
            .expect("SSE framing");
        serde_json::from_str(payload).expect("chunk JSON")
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_line_reply_emits_five_frames() {
        let frames = collect_frames("line1\nline2").await;
        assert_eq!(frames.len(), 5);

        let role = parse_data(&frames[0]);
        assert_eq!(role["choices"][0]["delta"]["role"], "assistant");
        assert!(role["choices"][0]["finish_reason"].is_null());

        let first = parse_data(&frames[1]);
        assert_eq!(first["choices"][0]["delta"]["content"], "line1\n");
        let second = parse_data(&frames[2]);
        assert_eq!(second["choices"][0]["delta"]["content"], "line2\n");

        let finish = parse_data(&frames[3]);
        assert_eq!(finish["choices"][0]["delta"], serde_json::json!({}));
        assert_eq!(finish["choices"][0]["finish_reason"], "stop");

        assert_eq!(frames[4], "data: [DONE]\n\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_chunks_share_id_and_created() {
        let frames = collect_frames("a\nb\nc").await;
        for frame in &frames[..frames.len() - 1] {
            let chunk = parse_data(frame);
            assert_eq!(chunk["id"], "chatcmpl-1");
            assert_eq!(chunk["created"], 42);
            assert_eq!(chunk["object"], "chat.completion.chunk");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_reply_still_frames_correctly() {
        let frames = collect_frames("").await;
        // Role, finish, sentinel; no content chunks.
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2], "data: [DONE]\n\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_content_chunks_are_paced() {
        let start = tokio::time::Instant::now();
        let frames = collect_frames("line1\nline2").await;
        assert_eq!(frames.len(), 5);
        // One delay per content line.
        assert!(start.elapsed() >= Duration::from_millis(200));
    }
}
