use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Global onpull configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the Pinata REST API
    #[serde(default = "default_pinata_api_url")]
    pub pinata_api_url: String,

    /// Base URL of the IPFS gateway used to read pinned content back
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Files requested per listing page during cleanup
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Table that indexes archived memories
    #[serde(default = "default_memory_table")]
    pub memory_table: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_pinata_api_url() -> String {
    "https://api.pinata.cloud".to_string()
}
fn default_gateway_url() -> String {
    "https://gateway.pinata.cloud".to_string()
}
fn default_page_limit() -> u32 {
    100
}
fn default_memory_table() -> String {
    "test_out_memories".to_string()
}
fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pinata_api_url: default_pinata_api_url(),
            gateway_url: default_gateway_url(),
            page_limit: default_page_limit(),
            memory_table: default_memory_table(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Get the onpull data directory (~/.onpull)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".onpull")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Load config from file, or fall back to defaults if not exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Self::parse(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Parse and validate config text
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        let dir = Self::data_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Apply a `config set` key/value pair
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "pinata_api_url" => self.pinata_api_url = value.to_string(),
            "gateway_url" => self.gateway_url = value.to_string(),
            "page_limit" => self.page_limit = value.parse()?,
            "memory_table" => self.memory_table = value.to_string(),
            "request_timeout_secs" => self.request_timeout_secs = value.parse()?,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.page_limit == 0 {
            anyhow::bail!("page_limit must be a positive integer");
        }
        if self.memory_table.trim().is_empty() {
            anyhow::bail!("memory_table must not be empty");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
