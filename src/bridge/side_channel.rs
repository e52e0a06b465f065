//! Image side channel
//!
//! Inline images cannot ride along in the prompt text the driver types
//! into the web UI; the driver picks them up from the OS clipboard
//! instead. Pushes are best-effort: a failure is logged by the caller
//! and the request proceeds without that image.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::SideChannelError;

static DATA_URI_PAYLOAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:image/[a-zA-Z0-9+.-]+;base64,(?P<payload>[A-Za-z0-9+/]+=*)$")
        .expect("data URI pattern is valid")
});

/// Out-of-band transport handing image bytes to the automation driver.
pub trait ImageSideChannel: Send + Sync {
    /// Push one data-URI image toward the driver.
    fn push(&self, data_uri: &str) -> Result<(), SideChannelError>;
}

/// Clipboard-backed side channel.
pub struct ClipboardSideChannel;

impl ImageSideChannel for ClipboardSideChannel {
    fn push(&self, data_uri: &str) -> Result<(), SideChannelError> {
        let bytes = decode_data_uri(data_uri)?;
        let decoded = image::load_from_memory(&bytes)?.to_rgba8();
        let (width, height) = decoded.dimensions();

        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_image(arboard::ImageData {
            width: width as usize,
            height: height as usize,
            bytes: decoded.into_raw().into(),
        })?;
        Ok(())
    }
}

/// Discards images. Used by tests and headless deployments where the
/// driver has its own image path.
pub struct NoopSideChannel;

impl ImageSideChannel for NoopSideChannel {
    fn push(&self, _data_uri: &str) -> Result<(), SideChannelError> {
        Ok(())
    }
}

/// Extract and decode the base64 payload of an inline image URI.
fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>, SideChannelError> {
    let payload = DATA_URI_PAYLOAD
        .captures(data_uri)
        .and_then(|captures| captures.name("payload"))
        .ok_or(SideChannelError::UnsupportedEncoding)?;
    Ok(STANDARD.decode(payload.as_str())?)
}
