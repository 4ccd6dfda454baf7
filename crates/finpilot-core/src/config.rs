use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Finpilot application.
///
/// Loaded from `~/.finpilot/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinpilotConfig {
    pub general: GeneralConfig,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub market: MarketConfig,
    pub assistant: AssistantConfig,
}

impl FinpilotConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FinpilotConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings for the API layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3040,
        }
    }
}

/// Language-model provider settings (OpenAI-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the chat-completions API.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Environment variable holding the API key. The key itself is never
    /// written to the config file.
    pub api_key_env: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "FINPILOT_LLM_API_KEY".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Internal market-data API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Base URL of the internal data API the tool handlers fetch from.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Orchestrator behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Most recent turns forwarded to the grounding step. Older turns are
    /// dropped without summarization.
    pub history_window: usize,
    /// Bound on each tool invocation; a timed-out tool becomes an ordinary
    /// per-tool failure outcome.
    pub tool_timeout_secs: u64,
    /// Optional TOML file of knowledge entries replacing the built-in set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_file: Option<String>,
    /// Tool names registered but marked inactive at startup.
    pub disabled_tools: Vec<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            history_window: 10,
            tool_timeout_secs: 8,
            knowledge_file: None,
            disabled_tools: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = FinpilotConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.port, 3040);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key_env, "FINPILOT_LLM_API_KEY");
        assert_eq!(config.llm.request_timeout_secs, 30);
        assert_eq!(config.market.request_timeout_secs, 10);
        assert_eq!(config.assistant.history_window, 10);
        assert_eq!(config.assistant.tool_timeout_secs, 8);
        assert!(config.assistant.knowledge_file.is_none());
        assert!(config.assistant.disabled_tools.is_empty());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[server]
host = "0.0.0.0"
port = 8080

[llm]
base_url = "http://localhost:11434/v1"
model = "llama3"
api_key_env = "LOCAL_KEY"
request_timeout_secs = 60

[market]
base_url = "http://data.internal/api"
request_timeout_secs = 5

[assistant]
history_window = 6
tool_timeout_secs = 4
disabled_tools = ["market_comparison"]
"#;
        let file = create_temp_config(content);
        let config = FinpilotConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.market.base_url, "http://data.internal/api");
        assert_eq!(config.assistant.history_window, 6);
        assert_eq!(config.assistant.disabled_tools, vec!["market_comparison"]);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[llm]
model = "gpt-4o"
"#;
        let file = create_temp_config(content);
        let config = FinpilotConfig::load(file.path()).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        // Remaining fields use defaults
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.assistant.history_window, 10);
        assert_eq!(config.server.port, 3040);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = FinpilotConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.assistant.history_window, 10);
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "this is {{ not valid TOML";
        let file = create_temp_config(content);
        assert!(FinpilotConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let config = FinpilotConfig::default();
        config.save(&path).unwrap();
        assert!(path.exists());

        let reloaded = FinpilotConfig::load(&path).unwrap();
        assert_eq!(reloaded.llm.model, config.llm.model);
        assert_eq!(reloaded.server.port, config.server.port);
        assert_eq!(
            reloaded.assistant.tool_timeout_secs,
            config.assistant.tool_timeout_secs
        );
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = FinpilotConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = FinpilotConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let deserialized: FinpilotConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.llm.model, config.llm.model);
        assert_eq!(deserialized.market.base_url, config.market.base_url);
    }
}
