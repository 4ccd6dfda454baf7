//! Side-by-side comparison of several symbols.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use finpilot_core::{ToolError, ToolHandler};

use crate::client::MarketDataClient;
use crate::tools::require_symbols;

pub struct MarketComparisonTool {
    client: Arc<MarketDataClient>,
}

impl MarketComparisonTool {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for MarketComparisonTool {
    fn name(&self) -> &str {
        "market_comparison"
    }

    fn description(&self) -> &str {
        "Side-by-side comparison of several stock symbols"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "symbols": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Ticker symbols to compare, e.g. [\"AAPL\", \"MSFT\"]"
                }
            },
            "required": ["symbols"]
        })
    }

    async fn invoke(&self, params: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let symbols = require_symbols(&params)?;
        debug!(symbols = ?symbols, "Fetching comparison");
        self.client
            .get_with_query("comparison", &[("symbols", symbols.join(","))])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tests::test_client;

    #[test]
    fn test_metadata() {
        let tool = MarketComparisonTool::new(test_client());
        assert_eq!(tool.name(), "market_comparison");
        assert_eq!(tool.parameter_schema()["required"][0], "symbols");
    }

    #[tokio::test]
    async fn test_empty_symbols_is_invalid_params() {
        let tool = MarketComparisonTool::new(test_client());
        let err = tool
            .invoke(serde_json::json!({"symbols": []}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
    }
}
