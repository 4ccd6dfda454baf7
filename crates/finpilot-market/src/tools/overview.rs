//! Broad market overview: indices, movers, sector performance.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use finpilot_core::{ToolError, ToolHandler};

use crate::client::MarketDataClient;

pub struct MarketOverviewTool {
    client: Arc<MarketDataClient>,
}

impl MarketOverviewTool {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for MarketOverviewTool {
    fn name(&self) -> &str {
        "market_overview"
    }

    fn description(&self) -> &str {
        "Major indices, top movers, and sector performance"
    }

    // Takes no parameters; the default empty-object schema applies.

    async fn invoke(&self, _params: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        debug!("Fetching market overview");
        self.client.get("overview").await
    }
}
