//! Portfolio analysis for the requesting user.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use finpilot_core::{ToolError, ToolHandler};

use crate::client::MarketDataClient;
use crate::tools::require_user_id;

pub struct PortfolioAnalysisTool {
    client: Arc<MarketDataClient>,
}

impl PortfolioAnalysisTool {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for PortfolioAnalysisTool {
    fn name(&self) -> &str {
        "portfolio_analysis"
    }

    fn description(&self) -> &str {
        "Holdings, allocation, and performance analysis of the user's portfolio"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_id": { "type": "string", "description": "Identity of the requesting user" }
            },
            "required": ["user_id"]
        })
    }

    async fn invoke(&self, params: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let user_id = require_user_id(&params)?;
        debug!(%user_id, "Fetching portfolio analysis");
        self.client
            .get(&format!("portfolio/{}/analysis", user_id))
            .await
    }
}
