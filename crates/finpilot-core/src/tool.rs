//! The `ToolHandler` trait: a named, parameterized data-fetching capability.
//!
//! Handlers are registered once at startup and dispatched by name. Each
//! invocation is a read-only fetch against an external collaborator; handlers
//! share no mutable state, so the executor may run them concurrently.

use async_trait::async_trait;

use crate::error::ToolError;

/// A named capability that fetches or computes domain data on behalf of the
/// orchestrator (price, chart, sentiment, and so on).
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Unique tool name used for registry lookup and result keying.
    fn name(&self) -> &str;

    /// Human-readable description surfaced to the model and to `GET /tools`.
    fn description(&self) -> &str;

    /// JSON schema for the accepted parameters. Declarative only; handlers
    /// still validate their inputs at invocation time.
    fn parameter_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    /// Execute the tool with the given parameters.
    async fn invoke(&self, params: serde_json::Value) -> Result<serde_json::Value, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl ToolHandler for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Returns its parameters unchanged"
        }

        async fn invoke(
            &self,
            params: serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            Ok(params)
        }
    }

    #[tokio::test]
    async fn test_handler_invoke() {
        let tool = EchoTool;
        let out = tool
            .invoke(serde_json::json!({"symbol": "AAPL"}))
            .await
            .unwrap();
        assert_eq!(out["symbol"], "AAPL");
    }

    #[test]
    fn test_default_parameter_schema_is_object() {
        let schema = EchoTool.parameter_schema();
        assert_eq!(schema["type"], "object");
    }
}
