//! Finpilot application binary - composition root.
//!
//! Ties the crates together into one executable:
//! 1. Load configuration from TOML
//! 2. Build the chat-model client (API key from the configured env var)
//! 3. Register the market-data tool handlers, honoring disabled_tools
//! 4. Load the knowledge index (built-in set or configured file)
//! 5. Start the axum REST API server

use std::path::PathBuf;
use std::sync::Arc;

use finpilot_api::{create_router, AppState};
use finpilot_assistant::{Assistant, KnowledgeStore, ToolRegistry};
use finpilot_core::config::FinpilotConfig;
use finpilot_llm::OpenAiClient;
use finpilot_market::{default_tools, MarketDataClient};

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("FINPILOT_CONFIG") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".finpilot").join("config.toml")
}

fn build_registry(
    config: &FinpilotConfig,
) -> Result<Arc<ToolRegistry>, Box<dyn std::error::Error>> {
    let market_client = Arc::new(MarketDataClient::from_config(&config.market));
    let registry = Arc::new(ToolRegistry::new());
    for tool in default_tools(market_client) {
        registry.register(tool)?;
    }
    for name in &config.assistant.disabled_tools {
        if registry.set_active(name, false) {
            tracing::info!(tool = %name, "Tool disabled by config");
        } else {
            tracing::warn!(tool = %name, "disabled_tools names an unknown tool");
        }
    }
    Ok(registry)
}

fn build_knowledge(config: &FinpilotConfig) -> Arc<KnowledgeStore> {
    match &config.assistant.knowledge_file {
        Some(path) => {
            let store = KnowledgeStore::new();
            match store.load_from_file(&PathBuf::from(path)) {
                Ok(count) => tracing::info!(count, %path, "Knowledge file loaded"),
                Err(e) => {
                    tracing::warn!(%path, error = %e, "Knowledge file unusable, using built-in entries");
                    return Arc::new(KnowledgeStore::with_defaults());
                }
            }
            Arc::new(store)
        }
        None => Arc::new(KnowledgeStore::with_defaults()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config first: its log level seeds the default filter.
    let config_file = config_path();
    let config = FinpilotConfig::load_or_default(&config_file);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Finpilot v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Chat model.
    let model = Arc::new(OpenAiClient::from_config(&config.llm)?);
    tracing::info!(model = %config.llm.model, base_url = %config.llm.base_url, "Chat model ready");

    // Tools and knowledge.
    let registry = build_registry(&config)?;
    tracing::info!(tools = registry.len(), "Tool registry populated");
    let knowledge = build_knowledge(&config);

    // Orchestrator.
    let assistant = Arc::new(Assistant::new(
        model,
        registry.clone(),
        knowledge,
        &config.assistant,
    ));

    // HTTP server.
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let router = create_router(AppState::new(config, assistant, registry));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind API server");
            return Err(e.into());
        }
    };
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, router).await?;

    Ok(())
}
