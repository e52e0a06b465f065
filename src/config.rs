//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Automation bridge configuration
    pub bridge: BridgeConfig,
    /// Streaming response configuration
    pub streaming: StreamingConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Whether `GET /` is reachable without an API key
    pub open_root: bool,
}

/// Automation bridge configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Minimum time between dispatches into the automation driver (in seconds)
    pub min_request_interval_secs: u64,
    /// Automation model selected at startup
    pub default_model: String,
    /// Command used to launch the automation driver process
    pub driver_command: String,
}

/// Streaming response configuration
#[derive(Debug, Clone)]
pub struct StreamingConfig {
    /// Delay between consecutive SSE content chunks (in milliseconds)
    pub chunk_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3001),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                open_root: env::var("BRIDGE_OPEN_ROOT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(false),
            },
            bridge: BridgeConfig {
                min_request_interval_secs: env::var("BRIDGE_MIN_INTERVAL_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(5),
                default_model: env::var("BRIDGE_MODEL").unwrap_or_else(|_| "gemini".to_string()),
                driver_command: env::var("BRIDGE_DRIVER_CMD")
                    .unwrap_or_else(|_| "browser-driver".to_string()),
            },
            streaming: StreamingConfig {
                chunk_delay_ms: env::var("BRIDGE_CHUNK_DELAY_MS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(100),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
