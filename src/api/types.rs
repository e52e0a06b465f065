//! OpenAI-compatible wire types
//!
//! Request and response shapes for `/chat/completions`. The `content`
//! field of a message is either a plain string or an ordered list of
//! typed parts; both shapes (and anything else a client sends) must
//! deserialize without failing the request.

use serde::{Deserialize, Serialize};

/// Model name reported in every completion response, regardless of which
/// automation target actually produced the text. Clients key response
/// parsing off a familiar name, not the driver's target.
pub const REPORTED_MODEL: &str = "gpt-3.5-turbo";

/// Body of `POST /chat/completions`.
///
/// `messages` stays optional so a missing field surfaces as a 400 with
/// the error envelope instead of a serde rejection. Fields the bridge
/// does not interpret are retained in `extra` so the diagnostic snapshot
/// embedded in the driver prompt reflects the full inbound request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Conversation history, oldest first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<ChatMessage>>,
    /// Whether the client wants an SSE-chunked response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Uninterpreted pass-through fields (model, temperature, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker role (`user`, `assistant`, `system`, ...)
    pub role: String,
    /// Message payload; defaults to empty text when absent
    #[serde(default)]
    pub content: MessageContent,
}

/// The OpenAI `content` field: plain text or an ordered list of parts.
///
/// The trailing catch-all arm keeps deserialization total; content that
/// is neither shape normalizes to empty prompt text rather than failing
/// the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content
    Text(String),
    /// Ordered multi-part content
    Parts(Vec<ContentPart>),
    /// Anything else a client manages to send
    Other(serde_json::Value),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

/// A single element of part-list content, tagged by `"type"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    /// Plain text segment
    #[serde(rename = "text")]
    Text {
        /// The text itself
        text: String,
    },
    /// Inline or referenced image
    #[serde(rename = "image_url")]
    Image {
        /// URL or data URI of the image
        image_url: ImageRef,
        /// Optional caption supplied by the client
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Unrecognized part type; contributes nothing to the prompt
    #[serde(other, rename = "unknown")]
    Unknown,
}

/// Image reference carried by an image part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    /// Either an `https://` URL or a `data:image/...;base64,` URI
    pub url: String,
}

/// Non-streaming completion response.
#[derive(Debug, Serialize)]
pub struct ChatCompletionResponse {
    /// Response id, shared with no other response
    pub id: String,
    /// Always `"chat.completion"`
    pub object: &'static str,
    /// Unix seconds at synthesis time
    pub created: u64,
    /// See [`REPORTED_MODEL`]
    pub model: &'static str,
    /// Exactly one choice
    pub choices: Vec<Choice>,
    /// Character-count usage approximation
    pub usage: Usage,
}

#[allow(missing_docs)]
#[derive(Debug, Serialize)]
pub struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: &'static str,
}

#[allow(missing_docs)]
#[derive(Debug, Serialize)]
pub struct ResponseMessage {
    pub role: &'static str,
    pub content: String,
}

/// Token usage block. The counts are the character lengths of the prompt
/// and completion text, not tokenizer output; the driver exposes no real
/// token accounting.
#[derive(Debug, Serialize)]
pub struct Usage {
    #[allow(missing_docs)]
    pub prompt_tokens: usize,
    #[allow(missing_docs)]
    pub completion_tokens: usize,
    #[allow(missing_docs)]
    pub total_tokens: usize,
}

impl ChatCompletionResponse {
    /// Assemble the single-choice response for one backend reply.
    pub fn new(id: String, created: u64, prompt: &str, completion: String) -> Self {
        let prompt_tokens = prompt.chars().count();
        let completion_tokens = completion.chars().count();
        Self {
            id,
            object: "chat.completion",
            created,
            model: REPORTED_MODEL,
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: "assistant",
                    content: completion,
                },
                finish_reason: "stop",
            }],
            usage: Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
        }
    }
}

/// One frame of a streaming completion response.
#[derive(Debug, Serialize)]
pub struct ChatCompletionChunk {
    /// Shared by every chunk of one response
    pub id: String,
    /// Always `"chat.completion.chunk"`
    pub object: &'static str,
    /// Fixed at stream start, shared by every chunk
    pub created: u64,
    /// See [`REPORTED_MODEL`]
    pub model: &'static str,
    /// Exactly one choice
    pub choices: Vec<ChunkChoice>,
}

#[allow(missing_docs)]
#[derive(Debug, Serialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: Delta,
    pub finish_reason: Option<&'static str>,
}

/// Incremental message state carried by a chunk.
#[derive(Debug, Default, Serialize)]
pub struct Delta {
    /// Present only on the first chunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    /// Present on content chunks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Build one chunk; `id` and `created` must be the stream's shared values.
    pub fn new(id: &str, created: u64, delta: Delta, finish_reason: Option<&'static str>) -> Self {
        Self {
            id: id.to_string(),
            object: "chat.completion.chunk",
            created,
            model: REPORTED_MODEL,
            choices: vec![ChunkChoice {
                index: 0,
                delta,
                finish_reason,
            }],
        }
    }
}
