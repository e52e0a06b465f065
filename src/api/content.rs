//! Content normalization
//!
//! Flattens the flexible OpenAI `content` field into plain prompt text
//! and harvests inline images out of the full message history. Image
//! payloads never end up in prompt text; they travel to the driver
//! through the side channel instead.

use crate::api::types::{ChatMessage, ContentPart, MessageContent};

/// Caption used when an image part carries no description.
const IMAGE_FALLBACK_DESCRIPTION: &str = "An uploaded image";

/// Marker prefix identifying inline image data.
pub const INLINE_IMAGE_PREFIX: &str = "data:image";

/// Replacement written over harvested image URLs so raw image bytes never
/// reach the request snapshot embedded in the driver prompt.
pub const REDACTED_IMAGE_URL: &str = "[IMAGE DATA REMOVED]";

/// Flatten a `content` field into plain prompt text.
///
/// Plain strings pass through unchanged. Part lists are newline-joined in
/// order: text parts contribute their text, image parts a
/// `[Image: <description>]` placeholder. Any other shape normalizes to
/// the empty string.
pub fn content_text(content: &MessageContent) -> String {
    match content {
        MessageContent::Text(text) => text.clone(),
        MessageContent::Parts(parts) => {
            let mut lines = Vec::new();
            for part in parts {
                match part {
                    ContentPart::Text { text } => lines.push(text.clone()),
                    ContentPart::Image { description, .. } => {
                        let description =
                            description.as_deref().unwrap_or(IMAGE_FALLBACK_DESCRIPTION);
                        lines.push(format!("[Image: {}]", description));
                    }
                    ContentPart::Unknown => {}
                }
            }
            lines.join("\n")
        }
        MessageContent::Other(_) => String::new(),
    }
}

/// Pull inline images out of the full message history, oldest first.
///
/// Every image part whose URL starts with [`INLINE_IMAGE_PREFIX`] is
/// appended to the result in message order then part order, and its URL
/// is redacted in place. Remote (`https://`) image URLs are left alone;
/// the driver cannot fetch them.
pub fn harvest_images(messages: &mut [ChatMessage]) -> Vec<String> {
    let mut images = Vec::new();
    for message in messages {
        let MessageContent::Parts(parts) = &mut message.content else {
            continue;
        };
        for part in parts {
            if let ContentPart::Image { image_url, .. } = part {
                if image_url.url.starts_with(INLINE_IMAGE_PREFIX) {
                    images.push(std::mem::replace(
                        &mut image_url.url,
                        REDACTED_IMAGE_URL.to_string(),
                    ));
                }
            }
        }
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ImageRef;

    fn message(role: &str, content: MessageContent) -> ChatMessage {
        ChatMessage {
            role: role.to_string(),
            content,
        }
    }

    fn image_part(url: &str, description: Option<&str>) -> ContentPart {
        ContentPart::Image {
            image_url: ImageRef {
                url: url.to_string(),
            },
            description: description.map(String::from),
        }
    }

    #[test]
    fn test_plain_text_passes_through() {
        let content = MessageContent::Text("hello".to_string());
        assert_eq!(content_text(&content), "hello");
    }

    #[test]
    fn test_parts_newline_joined_with_placeholder() {
        let content = MessageContent::Parts(vec![
            ContentPart::Text {
                text: "a".to_string(),
            },
            image_part("data:image/png;base64,AAA=", None),
        ]);
        assert_eq!(content_text(&content), "a\n[Image: An uploaded image]");
    }

    #[test]
    fn test_placeholder_uses_description() {
        let content = MessageContent::Parts(vec![image_part(
            "data:image/png;base64,AAA=",
            Some("a red square"),
        )]);
        assert_eq!(content_text(&content), "[Image: a red square]");
    }

    #[test]
    fn test_unknown_part_contributes_nothing() {
        let content = MessageContent::Parts(vec![
            ContentPart::Unknown,
            ContentPart::Text {
                text: "b".to_string(),
            },
        ]);
        assert_eq!(content_text(&content), "b");
    }

    #[test]
    fn test_unrecognized_shape_normalizes_to_empty() {
        let content = MessageContent::Other(serde_json::json!({"text": "dict"}));
        assert_eq!(content_text(&content), "");
    }

    #[test]
    fn test_harvest_preserves_order_across_messages() {
        let mut messages = vec![
            message(
                "user",
                MessageContent::Parts(vec![
                    image_part("data:image/png;base64,FIRST", None),
                    image_part("data:image/png;base64,SECOND", None),
                ]),
            ),
            message("assistant", MessageContent::Text("ok".to_string())),
            message(
                "user",
                MessageContent::Parts(vec![image_part("data:image/jpeg;base64,THIRD", None)]),
            ),
        ];

        let images = harvest_images(&mut messages);
        assert_eq!(
            images,
            vec![
                "data:image/png;base64,FIRST",
                "data:image/png;base64,SECOND",
                "data:image/jpeg;base64,THIRD",
            ]
        );
    }

    #[test]
    fn test_harvest_redacts_in_place() {
        let mut messages = vec![message(
            "user",
            MessageContent::Parts(vec![image_part("data:image/png;base64,AAA=", None)]),
        )];

        let images = harvest_images(&mut messages);
        assert_eq!(images, vec!["data:image/png;base64,AAA="]);

        let MessageContent::Parts(parts) = &messages[0].content else {
            panic!("content shape changed");
        };
        let ContentPart::Image { image_url, .. } = &parts[0] else {
            panic!("part shape changed");
        };
        assert_eq!(image_url.url, REDACTED_IMAGE_URL);
    }

    #[test]
    fn test_harvest_skips_remote_urls() {
        let mut messages = vec![message(
            "user",
            MessageContent::Parts(vec![image_part("https://example.com/cat.png", None)]),
        )];

        assert!(harvest_images(&mut messages).is_empty());

        let MessageContent::Parts(parts) = &messages[0].content else {
            panic!("content shape changed");
        };
        let ContentPart::Image { image_url, .. } = &parts[0] else {
            panic!("part shape changed");
        };
        assert_eq!(image_url.url, "https://example.com/cat.png");
    }

    #[test]
    fn test_harvest_round_trip_with_normalization() {
        let mut messages = vec![message(
            "user",
            MessageContent::Parts(vec![
                ContentPart::Text {
                    text: "a".to_string(),
                },
                image_part("data:image/png;base64,AAA=", None),
            ]),
        )];

        let text = content_text(&messages.last().unwrap().content);
        let images = harvest_images(&mut messages);

        assert_eq!(text, "a\n[Image: An uploaded image]");
        assert_eq!(images, vec!["data:image/png;base64,AAA="]);
    }
}
