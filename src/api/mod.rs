//! HTTP API
//!
//! Request handlers and wire types for the OpenAI-compatible surface.

pub mod chat;
pub mod content;
pub mod model;
pub mod streaming;
pub mod types;
