//! News and social sentiment for a single symbol.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use finpilot_core::{ToolError, ToolHandler};

use crate::client::MarketDataClient;
use crate::tools::{require_symbol, symbol_schema};

pub struct MarketSentimentTool {
    client: Arc<MarketDataClient>,
}

impl MarketSentimentTool {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for MarketSentimentTool {
    fn name(&self) -> &str {
        "market_sentiment"
    }

    fn description(&self) -> &str {
        "Aggregated news and social sentiment for a stock symbol"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        symbol_schema()
    }

    async fn invoke(&self, params: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let symbol = require_symbol(&params)?;
        debug!(%symbol, "Fetching sentiment");
        self.client.get(&format!("sentiment/{}", symbol)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tests::test_client;

    #[tokio::test]
    async fn test_missing_symbol_is_invalid_params() {
        let tool = MarketSentimentTool::new(test_client());
        assert_eq!(tool.name(), "market_sentiment");
        let err = tool.invoke(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
    }
}
