use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Who authored a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

// =============================================================================
// Newtype Wrappers
// =============================================================================

/// Response confidence. Range: 0.0 (degraded fallback) to 1.0 (certain).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(pub f64);

impl Confidence {
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }
}

// =============================================================================
// Conversation types
// =============================================================================

/// One persisted conversation turn, supplied read-only by the caller.
///
/// Persistence is the caller's responsibility; the core only consumes a
/// bounded window of prior turns as grounding context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    pub confidence: f64,
    pub tokens: u32,
    pub response_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// Convenience constructor for a plain user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            data: None,
            sources: None,
            confidence: 1.0,
            tokens: 0,
            response_time_ms: 0,
            timestamp: Utc::now(),
        }
    }

    /// Convenience constructor for a plain assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            data: None,
            sources: None,
            confidence: 1.0,
            tokens: 0,
            response_time_ms: 0,
            timestamp: Utc::now(),
        }
    }
}

/// The assistant's reply for one turn. Always well-formed: a degraded turn
/// still produces a complete response with low confidence, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    /// Per-tool result map. Successful tools carry their raw output;
    /// failed tools carry `{"error": "..."}` under the same key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    pub confidence: f64,
    pub tokens: u32,
    pub response_time_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_up_questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_topics: Vec<String>,
}

/// Optional caller-supplied grounding: portfolio, watchlist, and preference
/// summaries. The core treats every field as opaque supplementary context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    pub portfolio: Option<serde_json::Value>,
    pub watchlist: Option<serde_json::Value>,
    pub preferences: Option<serde_json::Value>,
}

impl RequestContext {
    pub fn is_empty(&self) -> bool {
        self.portfolio.is_none() && self.watchlist.is_none() && self.preferences.is_none()
    }
}

// =============================================================================
// Intent types
// =============================================================================

/// Entities extracted from the user message by the intent classifier.
/// All arrays may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentEntities {
    pub symbols: Vec<String>,
    pub companies: Vec<String>,
    pub timeframes: Vec<String>,
    pub metrics: Vec<String>,
}

/// Structured execution plan for one turn: the classified intent, extracted
/// entities, the tools to invoke, and knowledge retrieval keywords.
///
/// Created fresh per turn, never persisted. `Default` is the documented
/// classification-failure fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentDescriptor {
    pub intent: String,
    pub entities: IntentEntities,
    pub tools: Vec<String>,
    pub keywords: Vec<String>,
}

impl Default for IntentDescriptor {
    fn default() -> Self {
        Self {
            intent: "general_query".to_string(),
            entities: IntentEntities::default(),
            tools: Vec::new(),
            keywords: Vec::new(),
        }
    }
}

// =============================================================================
// Tool types
// =============================================================================

/// Outcome of a single tool invocation, keyed uniquely by tool name within
/// one turn. A failing tool never blocks others; its error is captured here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    Success { output: serde_json::Value },
    Failure { error: String },
}

impl ToolOutcome {
    pub fn success(output: serde_json::Value) -> Self {
        Self::Success { output }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn output(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Success { output } => Some(output),
            Self::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// The value placed in `ChatResponse::data`: raw output on success,
    /// `{"error": "..."}` on failure. A failed tool keeps its key.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Success { output } => output.clone(),
            Self::Failure { error } => serde_json::json!({ "error": error }),
        }
    }
}

// =============================================================================
// Knowledge types
// =============================================================================

/// A short topical grounding snippet. Read-only after load; retrieval
/// considers entries in descending priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub title: String,
    pub category: String,
    pub content: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub priority: i32,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
        let rt: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(rt, Role::User);
    }

    #[test]
    fn test_confidence_clamp() {
        assert_eq!(Confidence::new(2.0).0, 1.0);
        assert_eq!(Confidence::new(-1.0).0, 0.0);
        assert_eq!(Confidence::new(0.85).0, 0.85);
    }

    #[test]
    fn test_intent_descriptor_default() {
        let intent = IntentDescriptor::default();
        assert_eq!(intent.intent, "general_query");
        assert!(intent.entities.symbols.is_empty());
        assert!(intent.entities.companies.is_empty());
        assert!(intent.entities.timeframes.is_empty());
        assert!(intent.entities.metrics.is_empty());
        assert!(intent.tools.is_empty());
        assert!(intent.keywords.is_empty());
    }

    #[test]
    fn test_intent_descriptor_partial_json() {
        // Missing fields fall back to defaults rather than failing the parse.
        let intent: IntentDescriptor =
            serde_json::from_str(r#"{"intent": "price_check"}"#).unwrap();
        assert_eq!(intent.intent, "price_check");
        assert!(intent.tools.is_empty());
    }

    #[test]
    fn test_tool_outcome_success() {
        let outcome = ToolOutcome::success(serde_json::json!({"price": 150.0}));
        assert!(outcome.is_success());
        assert_eq!(outcome.output().unwrap()["price"], 150.0);
        assert!(outcome.error_message().is_none());
        assert_eq!(outcome.to_value()["price"], 150.0);
    }

    #[test]
    fn test_tool_outcome_failure_keeps_key_shape() {
        let outcome = ToolOutcome::failure("upstream 502");
        assert!(!outcome.is_success());
        assert!(outcome.output().is_none());
        assert_eq!(outcome.error_message(), Some("upstream 502"));
        assert_eq!(outcome.to_value(), serde_json::json!({"error": "upstream 502"}));
    }

    #[test]
    fn test_chat_response_camel_case_wire_format() {
        let response = ChatResponse {
            message: "hello".to_string(),
            data: None,
            sources: None,
            confidence: 0.85,
            tokens: 120,
            response_time_ms: 432,
            follow_up_questions: vec!["What about MSFT?".to_string()],
            related_topics: vec![],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("responseTimeMs"));
        assert!(json.contains("followUpQuestions"));
        // Empty arrays are omitted from the wire.
        assert!(!json.contains("relatedTopics"));
    }

    #[test]
    fn test_chat_response_round_trip() {
        let mut data = BTreeMap::new();
        data.insert(
            "stock_price".to_string(),
            serde_json::json!({"symbol": "AAPL", "price": 150.0}),
        );
        let response = ChatResponse {
            message: "AAPL is at $150.00".to_string(),
            data: Some(data),
            sources: Some(vec!["stock_price".to_string()]),
            confidence: 0.85,
            tokens: 88,
            response_time_ms: 210,
            follow_up_questions: vec![],
            related_topics: vec!["Price targets".to_string()],
        };
        let json = serde_json::to_string(&response).unwrap();
        let rt: ChatResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(rt.message, response.message);
        assert_eq!(rt.data.as_ref().unwrap()["stock_price"]["price"], 150.0);
        assert_eq!(rt.sources, response.sources);
        assert_eq!(rt.related_topics, response.related_topics);
    }

    #[test]
    fn test_chat_turn_constructors() {
        let user = ChatTurn::user("What's AAPL's price?");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "What's AAPL's price?");
        assert!(user.data.is_none());

        let assistant = ChatTurn::assistant("AAPL is at $150.00");
        assert_eq!(assistant.role, Role::Assistant);
    }

    #[test]
    fn test_request_context_is_empty() {
        assert!(RequestContext::default().is_empty());
        let ctx = RequestContext {
            portfolio: Some(serde_json::json!({"totalValue": 10_000})),
            ..RequestContext::default()
        };
        assert!(!ctx.is_empty());
    }

    #[test]
    fn test_knowledge_entry_priority_default() {
        let entry: KnowledgeEntry = serde_json::from_str(
            r#"{"title": "Dividends", "category": "income", "content": "…", "keywords": ["dividends"]}"#,
        )
        .unwrap();
        assert_eq!(entry.priority, 0);
    }

    #[test]
    fn test_intent_descriptor_round_trip() {
        let intent = IntentDescriptor {
            intent: "price_check".to_string(),
            entities: IntentEntities {
                symbols: vec!["AAPL".to_string()],
                companies: vec!["Apple".to_string()],
                timeframes: vec!["1D".to_string()],
                metrics: vec!["price".to_string()],
            },
            tools: vec!["stock_price".to_string()],
            keywords: vec!["price".to_string()],
        };
        let json = serde_json::to_string(&intent).unwrap();
        let rt: IntentDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(rt, intent);
    }
}
