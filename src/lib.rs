//! LLM API Bridge
//!
//! An OpenAI-compatible HTTP server that forwards chat completions to a
//! browser-automation LLM driver. This library exposes the modules for
//! integration tests; the binary lives in `src/main.rs`.

pub mod api;
pub mod auth;
pub mod bridge;
pub mod config;
pub mod error;
pub mod server;
/// Shared application state
///
/// Holds the process API key, the selected automation model, and the
/// dispatch path into the driver.
pub mod state;
