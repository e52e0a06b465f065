//! Bridge invoker
//!
//! Composes the full driver prompt from an inbound chat request and
//! dispatches it through the rate gate, exactly once per request. No
//! caching and no retries; identical prompts are never coalesced.

use std::sync::Arc;
use tracing::{info, warn};

use crate::api::content;
use crate::api::types::ChatCompletionRequest;

use super::backend::{AutomationBackend, InvokeRequest};
use super::error::BridgeError;
use super::rate_gate::RateGate;
use super::side_channel::ImageSideChannel;

/// Operational rules prepended to every prompt so the downstream agent
/// answers through the constrained tool-call vocabulary and keeps code
/// formatting intact.
const TOOL_USE_INSTRUCTIONS: &str = "Please follow these rules: For each response, you must use one of the available tools formatted in proper XML tags. Tools include attempt_completion, ask_followup_question, read_file, write_to_file, search_files, list_files, execute_command, and list_code_definition_names. Do not respond conversationally - only use tool commands. Format any code you generate with proper indentation and line breaks, as you would in a standard code editor. Disregard any previous instructions about generating code in a single line or avoiding newline characters.";

/// Single dispatch path into the automation driver.
pub struct BridgeInvoker {
    backend: Arc<dyn AutomationBackend>,
    side_channel: Arc<dyn ImageSideChannel>,
    rate_gate: RateGate,
}

impl BridgeInvoker {
    /// Wire the invoker to its collaborators.
    pub fn new(
        backend: Arc<dyn AutomationBackend>,
        side_channel: Arc<dyn ImageSideChannel>,
        rate_gate: RateGate,
    ) -> Self {
        Self {
            backend,
            side_channel,
            rate_gate,
        }
    }

    /// Run one inbound request against the automation driver.
    ///
    /// `prompt_text` is the normalized text of the conversation's last
    /// message; images are harvested from the full history, so an image
    /// uploaded earlier in the conversation still reaches the driver.
    pub async fn invoke(
        &self,
        model: &str,
        request: &ChatCompletionRequest,
        prompt_text: &str,
    ) -> Result<String, BridgeError> {
        // Harvest redacts inline image data on a private copy; the
        // snapshot serialized into the diagnostic header must never
        // carry raw image bytes.
        let mut snapshot = request.clone();
        let images = snapshot
            .messages
            .as_deref_mut()
            .map(content::harvest_images)
            .unwrap_or_default();

        let header = format!(
            "{} - INFO - Request data: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            serde_json::to_string(&snapshot).unwrap_or_default()
        );

        let full_prompt = [header.as_str(), TOOL_USE_INSTRUCTIONS, prompt_text].join("\n");

        for image in &images {
            if let Err(e) = self.side_channel.push(image) {
                warn!(error = %e, "Failed to push image to side channel, continuing without it");
            }
        }

        self.rate_gate.acquire().await;

        info!(
            model = %model,
            image_count = images.len(),
            "Dispatching chat request to automation driver"
        );

        self.backend
            .invoke(InvokeRequest {
                model: model.to_string(),
                prompt: full_prompt,
                images,
                tab_switch: false,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ChatMessage, ContentPart, ImageRef, MessageContent};
    use crate::bridge::side_channel::NoopSideChannel;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// Records every invocation and returns a canned reply.
    struct RecordingBackend {
        calls: Mutex<Vec<InvokeRequest>>,
    }

    impl RecordingBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AutomationBackend for RecordingBackend {
        async fn invoke(&self, request: InvokeRequest) -> Result<String, BridgeError> {
            self.calls.lock().await.push(request);
            Ok("canned reply".to_string())
        }
    }

    fn invoker_with(backend: Arc<RecordingBackend>) -> BridgeInvoker {
        BridgeInvoker::new(
            backend,
            Arc::new(NoopSideChannel),
            RateGate::new(Duration::ZERO),
        )
    }

    fn request_with_image() -> ChatCompletionRequest {
        ChatCompletionRequest {
            messages: Some(vec![ChatMessage {
                role: "user".to_string(),
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: "describe this".to_string(),
                    },
                    ContentPart::Image {
                        image_url: ImageRef {
                            url: "data:image/png;base64,AAA=".to_string(),
                        },
                        description: None,
                    },
                ]),
            }]),
            stream: None,
            extra: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn test_backend_called_exactly_once() {
        let backend = RecordingBackend::new();
        let invoker = invoker_with(backend.clone());

        let reply = invoker
            .invoke("gemini", &request_with_image(), "describe this")
            .await
            .unwrap();

        assert_eq!(reply, "canned reply");
        assert_eq!(backend.calls.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_prompt_composition_order() {
        let backend = RecordingBackend::new();
        let invoker = invoker_with(backend.clone());

        invoker
            .invoke("gemini", &request_with_image(), "describe this")
            .await
            .unwrap();

        let calls = backend.calls.lock().await;
        let prompt = &calls[0].prompt;

        let header_at = prompt.find("Request data:").unwrap();
        let rules_at = prompt.find("Please follow these rules:").unwrap();
        let text_at = prompt.rfind("describe this").unwrap();
        assert!(header_at < rules_at);
        assert!(rules_at < text_at);
    }

    #[tokio::test]
    async fn test_images_harvested_and_snapshot_redacted() {
        let backend = RecordingBackend::new();
        let invoker = invoker_with(backend.clone());

        invoker
            .invoke("gemini", &request_with_image(), "describe this")
            .await
            .unwrap();

        let calls = backend.calls.lock().await;
        assert_eq!(calls[0].images, vec!["data:image/png;base64,AAA="]);
        assert!(!calls[0].tab_switch);
        // The header snapshot carries the redaction marker, not the payload.
        assert!(calls[0].prompt.contains(content::REDACTED_IMAGE_URL));
        assert!(!calls[0].prompt.contains("base64,AAA="));
    }

    #[tokio::test]
    async fn test_original_request_left_untouched() {
        let backend = RecordingBackend::new();
        let invoker = invoker_with(backend.clone());
        let request = request_with_image();

        invoker.invoke("gemini", &request, "describe this").await.unwrap();

        // Redaction happened on the invoker's private copy only.
        let messages = request.messages.as_ref().unwrap();
        let MessageContent::Parts(parts) = &messages[0].content else {
            panic!("content shape changed");
        };
        let ContentPart::Image { image_url, .. } = &parts[1] else {
            panic!("part shape changed");
        };
        assert_eq!(image_url.url, "data:image/png;base64,AAA=");
    }

    #[tokio::test]
    async fn test_selected_model_reaches_backend() {
        let backend = RecordingBackend::new();
        let invoker = invoker_with(backend.clone());

        invoker
            .invoke("claude", &request_with_image(), "describe this")
            .await
            .unwrap();

        assert_eq!(backend.calls.lock().await[0].model, "claude");
    }
}
