//! Shared application state
//!
//! Everything request handlers share: the process API key, the selected
//! automation model, and the dispatch path into the driver.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::auth::ApiKey;
use crate::bridge::BridgeInvoker;

/// Models the automation driver can address.
pub const ALLOWED_MODELS: &[&str] = &["gemini", "claude", "deepseek"];

/// State shared by every request handler.
pub struct AppState {
    /// Process-lifetime API key protecting the HTTP surface
    pub api_key: ApiKey,
    /// Automation model currently addressed by the driver
    pub model: RwLock<String>,
    /// Single dispatch path into the automation driver
    pub invoker: BridgeInvoker,
    /// Delay between consecutive SSE content chunks
    pub stream_chunk_delay: Duration,
}

/// Handle passed to handlers through the router.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Assemble the shared state.
    pub fn new(
        api_key: ApiKey,
        model: String,
        invoker: BridgeInvoker,
        stream_chunk_delay: Duration,
    ) -> Self {
        Self {
            api_key,
            model: RwLock::new(model),
            invoker,
            stream_chunk_delay,
        }
    }
}
