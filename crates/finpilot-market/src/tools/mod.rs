//! The nine market-data tool handlers.
//!
//! Handler names are the registry keys the classifier plans against, so they
//! are part of the wire contract and must not change casually.

pub mod chart;
pub mod comparison;
pub mod fundamentals;
pub mod news;
pub mod overview;
pub mod portfolio;
pub mod quote;
pub mod sentiment;
pub mod technicals;

use std::sync::Arc;

use finpilot_core::{ToolError, ToolHandler};

use crate::client::MarketDataClient;

pub use chart::StockChartTool;
pub use comparison::MarketComparisonTool;
pub use fundamentals::FundamentalDataTool;
pub use news::StockNewsTool;
pub use overview::MarketOverviewTool;
pub use portfolio::PortfolioAnalysisTool;
pub use quote::StockPriceTool;
pub use sentiment::MarketSentimentTool;
pub use technicals::TechnicalIndicatorsTool;

/// Build the full default handler set over one shared client.
pub fn default_tools(client: Arc<MarketDataClient>) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(StockPriceTool::new(client.clone())),
        Arc::new(StockChartTool::new(client.clone())),
        Arc::new(PortfolioAnalysisTool::new(client.clone())),
        Arc::new(MarketSentimentTool::new(client.clone())),
        Arc::new(TechnicalIndicatorsTool::new(client.clone())),
        Arc::new(FundamentalDataTool::new(client.clone())),
        Arc::new(StockNewsTool::new(client.clone())),
        Arc::new(MarketComparisonTool::new(client.clone())),
        Arc::new(MarketOverviewTool::new(client)),
    ]
}

/// Extract and normalize the required `symbol` parameter.
///
/// Symbols are uppercased and restricted to ticker characters since they are
/// interpolated into request paths.
pub(crate) fn require_symbol(params: &serde_json::Value) -> Result<String, ToolError> {
    let symbol = params
        .get("symbol")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidParams("missing required parameter: symbol".to_string()))?;
    if !is_valid_symbol(&symbol) {
        return Err(ToolError::InvalidParams(format!(
            "invalid symbol: {}",
            symbol
        )));
    }
    Ok(symbol)
}

/// Extract the required non-empty `symbols` list, normalizing each entry.
pub(crate) fn require_symbols(params: &serde_json::Value) -> Result<Vec<String>, ToolError> {
    let symbols: Vec<String> = params
        .get("symbols")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty() && is_valid_symbol(s))
                .collect()
        })
        .unwrap_or_default();
    if symbols.is_empty() {
        return Err(ToolError::InvalidParams(
            "missing required parameter: symbols".to_string(),
        ));
    }
    Ok(symbols)
}

/// Extract the required non-empty `user_id` parameter.
pub(crate) fn require_user_id(params: &serde_json::Value) -> Result<String, ToolError> {
    params
        .get("user_id")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidParams("missing required parameter: user_id".to_string()))
}

fn is_valid_symbol(symbol: &str) -> bool {
    symbol.len() <= 12
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

/// Parameter schema shared by the single-symbol tools.
pub(crate) fn symbol_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "symbol": { "type": "string", "description": "Ticker symbol, e.g. AAPL" }
        },
        "required": ["symbol"]
    })
}
