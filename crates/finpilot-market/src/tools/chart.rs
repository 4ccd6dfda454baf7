//! Historical price series for a single symbol.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use finpilot_core::{ToolError, ToolHandler};

use crate::client::MarketDataClient;
use crate::tools::require_symbol;

pub struct StockChartTool {
    client: Arc<MarketDataClient>,
}

impl StockChartTool {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for StockChartTool {
    fn name(&self) -> &str {
        "stock_chart"
    }

    fn description(&self) -> &str {
        "Historical price series for a stock symbol, optionally over a timeframe"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "symbol": { "type": "string", "description": "Ticker symbol, e.g. AAPL" },
                "timeframe": { "type": "string", "description": "Range such as 1d, 1mo, 1y" }
            },
            "required": ["symbol"]
        })
    }

    async fn invoke(&self, params: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let symbol = require_symbol(&params)?;
        let timeframe = params
            .get("timeframe")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        debug!(%symbol, ?timeframe, "Fetching chart data");
        match timeframe {
            Some(tf) => {
                self.client
                    .get_with_query(&format!("chart/{}", symbol), &[("timeframe", tf)])
                    .await
            }
            None => self.client.get(&format!("chart/{}", symbol)).await,
        }
    }
}
