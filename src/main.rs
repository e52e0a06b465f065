//! LLM API Bridge
//!
//! An OpenAI-compatible HTTP server that forwards chat completions to a
//! browser-automation LLM driver and shapes the reply back into OpenAI's
//! response schemas, optionally as an SSE stream.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use llm_bridge::auth::ApiKey;
use llm_bridge::bridge::{BridgeInvoker, ClipboardSideChannel, DriverProcess, RateGate};
use llm_bridge::config::Config;
use llm_bridge::server;
use llm_bridge::state::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    // The key lives only as long as the process; print it once so the
    // operator can hand it to clients.
    let api_key = ApiKey::generate();
    println!("API Key: {}", api_key.reveal());

    let backend = Arc::new(DriverProcess::spawn(&config.bridge.driver_command)?);
    let invoker = BridgeInvoker::new(
        backend,
        Arc::new(ClipboardSideChannel),
        RateGate::new(Duration::from_secs(config.bridge.min_request_interval_secs)),
    );

    let state = Arc::new(AppState::new(
        api_key,
        config.bridge.default_model.clone(),
        invoker,
        Duration::from_millis(config.streaming.chunk_delay_ms),
    ));

    // Bind to address from config
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    server::serve(addr, state, config.server.open_root).await
}
