//! Fundamental data for a single symbol.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use finpilot_core::{ToolError, ToolHandler};

use crate::client::MarketDataClient;
use crate::tools::{require_symbol, symbol_schema};

pub struct FundamentalDataTool {
    client: Arc<MarketDataClient>,
}

impl FundamentalDataTool {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for FundamentalDataTool {
    fn name(&self) -> &str {
        "fundamental_data"
    }

    fn description(&self) -> &str {
        "Fundamentals (P/E, EPS, market cap, revenue) for a stock symbol"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        symbol_schema()
    }

    async fn invoke(&self, params: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let symbol = require_symbol(&params)?;
        debug!(%symbol, "Fetching fundamentals");
        self.client.get(&format!("fundamentals/{}", symbol)).await
    }
}
