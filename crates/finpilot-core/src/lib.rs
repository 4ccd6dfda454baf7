//! Finpilot core: shared types, configuration, and errors.
//!
//! This crate defines the data model exchanged between the assistant
//! orchestrator, the tool handlers, and the API layer. It performs no I/O
//! beyond config file access.

pub mod config;
pub mod error;
pub mod tool;
pub mod types;

pub use config::FinpilotConfig;
pub use error::{FinpilotError, Result, ToolError};
pub use tool::ToolHandler;
pub use types::{
    ChatResponse, ChatTurn, Confidence, IntentDescriptor, IntentEntities, KnowledgeEntry,
    RequestContext, Role, ToolOutcome,
};
