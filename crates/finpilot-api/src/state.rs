//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use finpilot_assistant::{Assistant, ToolRegistry};
use finpilot_core::config::FinpilotConfig;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. Everything
/// is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<FinpilotConfig>,
    /// The conversation orchestrator.
    pub assistant: Arc<Assistant>,
    /// Tool registry, surfaced by `GET /tools`.
    pub registry: Arc<ToolRegistry>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        config: FinpilotConfig,
        assistant: Arc<Assistant>,
        registry: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            assistant,
            registry,
            start_time: Instant::now(),
        }
    }
}
