//! Technical indicators for a single symbol.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use finpilot_core::{ToolError, ToolHandler};

use crate::client::MarketDataClient;
use crate::tools::{require_symbol, symbol_schema};

pub struct TechnicalIndicatorsTool {
    client: Arc<MarketDataClient>,
}

impl TechnicalIndicatorsTool {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for TechnicalIndicatorsTool {
    fn name(&self) -> &str {
        "technical_indicators"
    }

    fn description(&self) -> &str {
        "Technical indicators (moving averages, RSI, MACD) for a stock symbol"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        symbol_schema()
    }

    async fn invoke(&self, params: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let symbol = require_symbol(&params)?;
        debug!(%symbol, "Fetching technical indicators");
        self.client.get(&format!("technicals/{}", symbol)).await
    }
}
