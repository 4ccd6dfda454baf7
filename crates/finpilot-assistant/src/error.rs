use thiserror::Error;

/// Errors raised inside the orchestrator.
///
/// Only setup-time operations (registration, knowledge file load) surface
/// these to callers. Per-turn failures are absorbed: tool errors become
/// failure outcomes, model errors become the degraded response.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Tool {0} is already registered")]
    DuplicateTool(String),

    #[error("Unknown tool kind: {0}")]
    UnknownTool(String),

    #[error("Knowledge load failed: {0}")]
    Knowledge(String),
}
