//! Tool registry: named handlers with an active flag.
//!
//! Populated once at startup from the handler set plus config; lookups are
//! read-mostly. Reload is an explicit re-registration, never a background
//! mutation, so a turn in flight always sees a consistent tool set.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::debug;

use finpilot_core::ToolHandler;

use crate::error::AssistantError;

/// The closed set of tool kinds the classifier may plan against.
/// Registration validates against this list; execution merely skips names
/// it cannot resolve.
pub const KNOWN_TOOL_NAMES: [&str; 9] = [
    "stock_price",
    "stock_chart",
    "portfolio_analysis",
    "market_sentiment",
    "technical_indicators",
    "fundamental_data",
    "stock_news",
    "market_comparison",
    "market_overview",
];

/// Serializable view of one registered tool, surfaced by `GET /tools`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
    pub active: bool,
}

struct ToolEntry {
    handler: Arc<dyn ToolHandler>,
    active: bool,
}

/// Registry of tool handlers keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, ToolEntry>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, overwriting any existing registration with the
    /// same name (last wins). Names outside the known set are rejected.
    pub fn register(&self, handler: Arc<dyn ToolHandler>) -> Result<(), AssistantError> {
        let name = handler.name().to_string();
        if !KNOWN_TOOL_NAMES.contains(&name.as_str()) {
            return Err(AssistantError::UnknownTool(name));
        }
        let mut tools = self.tools.write().unwrap_or_else(|e| e.into_inner());
        if tools.contains_key(&name) {
            debug!(%name, "Overwriting existing tool registration");
        }
        tools.insert(
            name,
            ToolEntry {
                handler,
                active: true,
            },
        );
        Ok(())
    }

    /// Like `register`, but a duplicate name is an error instead of an
    /// overwrite.
    pub fn register_strict(&self, handler: Arc<dyn ToolHandler>) -> Result<(), AssistantError> {
        {
            let tools = self.tools.read().unwrap_or_else(|e| e.into_inner());
            if tools.contains_key(handler.name()) {
                return Err(AssistantError::DuplicateTool(handler.name().to_string()));
            }
        }
        self.register(handler)
    }

    /// Look up an active handler by name. Inactive and unregistered names
    /// both return `None`; the executor treats them identically.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        let tools = self.tools.read().unwrap_or_else(|e| e.into_inner());
        tools
            .get(name)
            .filter(|entry| entry.active)
            .map(|entry| entry.handler.clone())
    }

    /// Mark a tool active or inactive. Returns false if the name is not
    /// registered.
    pub fn set_active(&self, name: &str, active: bool) -> bool {
        let mut tools = self.tools.write().unwrap_or_else(|e| e.into_inner());
        match tools.get_mut(name) {
            Some(entry) => {
                entry.active = active;
                true
            }
            None => false,
        }
    }

    /// Descriptors of the active tools, sorted by name.
    pub fn list_active(&self) -> Vec<ToolDescriptor> {
        self.descriptors()
            .into_iter()
            .filter(|d| d.active)
            .collect()
    }

    /// Descriptors of every registered tool, sorted by name.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        let tools = self.tools.read().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<ToolDescriptor> = tools
            .values()
            .map(|entry| ToolDescriptor {
                name: entry.handler.name().to_string(),
                description: entry.handler.description().to_string(),
                parameters: entry.handler.parameter_schema(),
                active: entry.active,
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    pub fn len(&self) -> usize {
        self.tools.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
