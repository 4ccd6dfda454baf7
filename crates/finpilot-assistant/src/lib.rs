//! The Finpilot conversation orchestrator.
//!
//! One turn flows through a fixed pipeline: classify the user's intent,
//! execute the planned tools concurrently, retrieve topical knowledge,
//! synthesize a grounded reply, and assemble the final response with timing.
//! Every stage degrades locally; `Assistant::process_message` never fails.

pub mod error;
pub mod executor;
pub mod intent;
pub mod knowledge;
pub mod orchestrator;
pub mod registry;
pub mod synthesizer;

pub use error::AssistantError;
pub use executor::ToolExecutor;
pub use intent::IntentClassifier;
pub use knowledge::KnowledgeStore;
pub use orchestrator::Assistant;
pub use registry::{ToolDescriptor, ToolRegistry};
pub use synthesizer::ResponseSynthesizer;
