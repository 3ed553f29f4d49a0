//! Configuration loading and validation
//!
//! Configuration lives in `~/.config/rivalz-agents/config.toml`. Every section
//! is optional and falls back to the defaults below, so a missing file is the
//! same as an empty one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Directory name under `~/.config`
pub const CONFIG_DIR: &str = "rivalz-agents";

/// Longest accepted pause between tool retries
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;

/// Main configuration structure loaded from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub endpoints: EndpointsConfig,
    pub tools: ToolsConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from `path`, or the default location when `None`.
    ///
    /// An explicit path must exist; the default location may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Config::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the config directory path (~/.config/rivalz-agents)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join(CONFIG_DIR))
    }

    pub fn default_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<()> {
        let urls = [
            ("llm.base_url", &self.llm.base_url),
            ("endpoints.tvl_url", &self.endpoints.tvl_url),
            ("endpoints.price_url", &self.endpoints.price_url),
            ("endpoints.search_url", &self.endpoints.search_url),
        ];
        for (key, value) in urls {
            let parsed = url::Url::parse(value)
                .with_context(|| format!("Invalid URL for {}: {}", key, value))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                anyhow::bail!("Unsupported URL scheme for {}: {}", key, parsed.scheme());
            }
        }

        if self.llm.max_turns == 0 {
            anyhow::bail!("llm.max_turns must be at least 1");
        }
        if self.tools.http_timeout_secs == 0 {
            anyhow::bail!("tools.http_timeout_secs must be at least 1");
        }
        for (key, value) in [
            ("tools.retry_initial_delay_ms", self.tools.retry_initial_delay_ms),
            ("tools.retry_max_delay_ms", self.tools.retry_max_delay_ms),
        ] {
            if value > MAX_RETRY_DELAY_MS {
                anyhow::bail!("{} must be at most {} ms, got {}", key, MAX_RETRY_DELAY_MS, value);
            }
        }
        if self.tools.retry_initial_delay_ms > self.tools.retry_max_delay_ms {
            anyhow::bail!("tools.retry_initial_delay_ms must not exceed tools.retry_max_delay_ms");
        }
        if self.tools.max_search_results == 0 {
            anyhow::bail!("tools.max_search_results must be at least 1");
        }
        if self.tools.brand_token.trim().is_empty() {
            anyhow::bail!("tools.brand_token must not be empty");
        }
        Ok(())
    }
}

/// Model runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub max_tokens: Option<u32>,
    /// Retries after the first failed request; client errors other than 429 are not retried
    pub max_retries: u32,
    pub timeout_secs: u64,
    /// Upper bound on model calls per user turn
    pub max_turns: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: None,
            max_retries: 3,
            timeout_secs: 120,
            max_turns: 10,
        }
    }
}

/// Third-party data sources used by the tools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// DefiLlama TVL-by-chain listing
    pub tvl_url: String,
    /// CoinGecko simple price lookup
    pub price_url: String,
    /// Brave Web Search
    pub search_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            tvl_url: "https://api.llama.fi/v2/chains".to_string(),
            price_url: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            search_url: "https://api.search.brave.com/res/v1/web/search".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Attempts made by the TVL fetch before giving up
    pub tvl_retries: u32,
    pub http_timeout_secs: u64,
    pub retry_initial_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    /// Token a search hit must mention to be kept
    pub brand_token: String,
    /// Appended to every search query
    pub search_context: String,
    pub max_search_results: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            tvl_retries: 3,
            http_timeout_secs: 10,
            retry_initial_delay_ms: 500,
            retry_max_delay_ms: 4_000,
            brand_token: "Rivalz".to_string(),
            search_context: "Rivalz AI network".to_string(),
            max_search_results: 5,
        }
    }
}

impl ToolsConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tools whose results are echoed to the terminal as system notices
    pub system_notice_tools: Vec<String>,
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            system_notice_tools: vec![
                "process_onchain_request".to_string(),
                "fetch_network_tvl".to_string(),
            ],
            color: true,
        }
    }
}
