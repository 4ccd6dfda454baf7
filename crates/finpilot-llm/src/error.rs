use thiserror::Error;

/// Errors raised by chat-model calls.
///
/// Callers in the orchestrator treat every variant the same way: the stage
/// that made the call falls back (default intent, empty suggestion arrays,
/// or the degraded response) rather than propagating the failure.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Model provider request failed: {0}")]
    Transport(String),

    #[error("Model provider returned status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model output was not valid JSON: {0}")]
    MalformedOutput(String),

    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),
}
