//! Chat-model access for the Finpilot assistant.
//!
//! Defines the `ChatModel` trait the orchestrator depends on, an
//! OpenAI-compatible HTTP implementation, and defensive helpers for parsing
//! structured JSON out of model output.

pub mod client;
pub mod error;
pub mod json;

pub use client::{ChatMessage, ChatModel, Completion, CompletionRequest, OpenAiClient};
pub use error::LlmError;
pub use json::extract_json;
