//! Current quote for a single symbol.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use finpilot_core::{ToolError, ToolHandler};

use crate::client::MarketDataClient;
use crate::tools::{require_symbol, symbol_schema};

pub struct StockPriceTool {
    client: Arc<MarketDataClient>,
}

impl StockPriceTool {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for StockPriceTool {
    fn name(&self) -> &str {
        "stock_price"
    }

    fn description(&self) -> &str {
        "Current price, change, and volume for a stock symbol"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        symbol_schema()
    }

    async fn invoke(&self, params: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let symbol = require_symbol(&params)?;
        debug!(%symbol, "Fetching quote");
        self.client.get(&format!("quote/{}", symbol)).await
    }
}
