//! Recent news headlines for a single symbol.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use finpilot_core::{ToolError, ToolHandler};

use crate::client::MarketDataClient;
use crate::tools::{require_symbol, symbol_schema};

pub struct StockNewsTool {
    client: Arc<MarketDataClient>,
}

impl StockNewsTool {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for StockNewsTool {
    fn name(&self) -> &str {
        "stock_news"
    }

    fn description(&self) -> &str {
        "Recent news headlines for a stock symbol"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        symbol_schema()
    }

    async fn invoke(&self, params: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let symbol = require_symbol(&params)?;
        debug!(%symbol, "Fetching news");
        self.client.get(&format!("news/{}", symbol)).await
    }
}
