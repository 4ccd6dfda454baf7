//! Concurrent tool execution for one turn.
//!
//! The executor derives each tool's parameters from the classified intent,
//! runs the planned tools in parallel under a per-tool timeout, and captures
//! every outcome (success or failure) keyed by tool name. A failing tool
//! never aborts the turn and never blocks its siblings.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use finpilot_core::{IntentDescriptor, ToolError, ToolOutcome};

use crate::registry::ToolRegistry;

pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    tool_timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>, tool_timeout: Duration) -> Self {
        Self {
            registry,
            tool_timeout,
        }
    }

    /// Run the intent's planned tools concurrently.
    ///
    /// Names the registry cannot resolve (unknown or inactive) are skipped
    /// silently; repeated names run once. Timeouts and handler errors are
    /// captured as failure outcomes under the tool's key.
    pub async fn execute(
        &self,
        intent: &IntentDescriptor,
        user_id: &str,
    ) -> BTreeMap<String, ToolOutcome> {
        let mut join_set = JoinSet::new();
        let mut seen = HashSet::new();

        for name in &intent.tools {
            if !seen.insert(name.clone()) {
                continue;
            }
            let Some(handler) = self.registry.get(name) else {
                debug!(tool = %name, "Skipping unresolved tool");
                continue;
            };
            let params = derive_params(name, intent, user_id);
            let name = name.clone();
            let timeout = self.tool_timeout;
            join_set.spawn(async move {
                let outcome = match tokio::time::timeout(timeout, handler.invoke(params)).await {
                    Ok(Ok(output)) => ToolOutcome::success(output),
                    Ok(Err(e)) => ToolOutcome::failure(e.to_string()),
                    Err(_) => {
                        ToolOutcome::failure(ToolError::Timeout(timeout.as_secs()).to_string())
                    }
                };
                (name, outcome)
            });
        }

        let mut outcomes = BTreeMap::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((name, outcome)) => {
                    if let Some(error) = outcome.error_message() {
                        warn!(tool = %name, %error, "Tool invocation failed");
                    }
                    outcomes.insert(name, outcome);
                }
                Err(e) => warn!("Tool task aborted: {}", e),
            }
        }
        outcomes
    }
}

/// Parameter derivation by tool name.
///
/// Single-symbol tools take the first extracted symbol, portfolio analysis
/// takes the caller's identity, comparison takes the full symbol list, the
/// overview takes nothing. Missing entities produce empty parameters; the
/// handler's own validation then yields the failure outcome.
fn derive_params(
    name: &str,
    intent: &IntentDescriptor,
    user_id: &str,
) -> serde_json::Value {
    match name {
        "stock_price" | "stock_chart" | "market_sentiment" | "technical_indicators"
        | "fundamental_data" | "stock_news" => match intent.entities.symbols.first() {
            Some(symbol) => serde_json::json!({ "symbol": symbol }),
            None => serde_json::json!({}),
        },
        "portfolio_analysis" => serde_json::json!({ "user_id": user_id }),
        "market_comparison" => serde_json::json!({ "symbols": intent.entities.symbols }),
        _ => serde_json::json!({}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finpilot_core::{IntentEntities, ToolHandler};

    struct EchoParamsTool {
        name: &'static str,
    }

    #[async_trait]
    impl ToolHandler for EchoParamsTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "echoes parameters"
        }

        async fn invoke(
            &self,
            params: serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            Ok(params)
        }
    }

    struct FailingTool;

    #[async_trait]
    impl ToolHandler for FailingTool {
        fn name(&self) -> &str {
            "stock_news"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        async fn invoke(
            &self,
            _params: serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            Err(ToolError::Upstream("service unavailable".to_string()))
        }
    }

    struct SlowTool;

    #[async_trait]
    impl ToolHandler for SlowTool {
        fn name(&self) -> &str {
            "market_overview"
        }

        fn description(&self) -> &str {
            "never finishes in time"
        }

        async fn invoke(
            &self,
            _params: serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(serde_json::json!({}))
        }
    }

    fn intent(tools: &[&str], symbols: &[&str]) -> IntentDescriptor {
        IntentDescriptor {
            intent: "test".to_string(),
            entities: IntentEntities {
                symbols: symbols.iter().map(|s| s.to_string()).collect(),
                ..IntentEntities::default()
            },
            tools: tools.iter().map(|t| t.to_string()).collect(),
            keywords: Vec::new(),
        }
    }

    fn executor_with(handlers: Vec<Arc<dyn ToolHandler>>) -> ToolExecutor {
        let registry = Arc::new(ToolRegistry::new());
        for handler in handlers {
            registry.register(handler).unwrap();
        }
        ToolExecutor::new(registry, Duration::from_millis(500))
    }

    #[tokio::test]
    async fn test_derives_first_symbol_for_single_symbol_tools() {
        let executor = executor_with(vec![Arc::new(EchoParamsTool { name: "stock_price" })]);
        let outcomes = executor
            .execute(&intent(&["stock_price"], &["AAPL", "MSFT"]), "u-1")
            .await;
        assert_eq!(outcomes["stock_price"].output().unwrap()["symbol"], "AAPL");
    }

    #[tokio::test]
    async fn test_derives_user_id_for_portfolio() {
        let executor = executor_with(vec![Arc::new(EchoParamsTool {
            name: "portfolio_analysis",
        })]);
        let outcomes = executor
            .execute(&intent(&["portfolio_analysis"], &[]), "u-42")
            .await;
        assert_eq!(
            outcomes["portfolio_analysis"].output().unwrap()["user_id"],
            "u-42"
        );
    }

    #[tokio::test]
    async fn test_derives_full_symbol_list_for_comparison() {
        let executor = executor_with(vec![Arc::new(EchoParamsTool {
            name: "market_comparison",
        })]);
        let outcomes = executor
            .execute(&intent(&["market_comparison"], &["AAPL", "MSFT"]), "u-1")
            .await;
        let symbols = &outcomes["market_comparison"].output().unwrap()["symbols"];
        assert_eq!(symbols.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_skipped_silently() {
        let executor = executor_with(vec![Arc::new(EchoParamsTool { name: "stock_price" })]);
        let outcomes = executor
            .execute(
                &intent(&["stock_price", "stock_chart"], &["AAPL"]),
                "u-1",
            )
            .await;
        // stock_chart is not registered: no entry, no error.
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes.contains_key("stock_price"));
    }

    #[tokio::test]
    async fn test_inactive_tool_skipped() {
        let registry = Arc::new(ToolRegistry::new());
        registry
            .register(Arc::new(EchoParamsTool { name: "stock_price" }))
            .unwrap();
        registry.set_active("stock_price", false);
        let executor = ToolExecutor::new(registry, Duration::from_millis(500));

        let outcomes = executor
            .execute(&intent(&["stock_price"], &["AAPL"]), "u-1")
            .await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_others() {
        let executor = executor_with(vec![
            Arc::new(EchoParamsTool { name: "stock_price" }),
            Arc::new(FailingTool),
        ]);
        let outcomes = executor
            .execute(&intent(&["stock_price", "stock_news"], &["AAPL"]), "u-1")
            .await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes["stock_price"].is_success());
        assert!(outcomes["stock_news"]
            .error_message()
            .unwrap()
            .contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_timeout_captured_as_failure_outcome() {
        let executor = executor_with(vec![Arc::new(SlowTool)]);
        let outcomes = executor
            .execute(&intent(&["market_overview"], &[]), "u-1")
            .await;
        assert!(outcomes["market_overview"]
            .error_message()
            .unwrap()
            .contains("timed out"));
    }

    #[tokio::test]
    async fn test_repeated_tool_runs_once() {
        let executor = executor_with(vec![Arc::new(EchoParamsTool { name: "stock_price" })]);
        let outcomes = executor
            .execute(&intent(&["stock_price", "stock_price"], &["AAPL"]), "u-1")
            .await;
        assert_eq!(outcomes.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_plan_yields_empty_outcomes() {
        let executor = executor_with(vec![]);
        let outcomes = executor.execute(&intent(&[], &[]), "u-1").await;
        assert!(outcomes.is_empty());
    }
}
