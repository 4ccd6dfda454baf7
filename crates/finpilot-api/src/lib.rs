//! Finpilot API crate - axum HTTP wrapper around the assistant.
//!
//! Exposes the chat endpoint, tool listing, and health checks. All
//! orchestration lives in `finpilot-assistant`; handlers here only validate
//! input, call the assistant, and shape JSON.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
