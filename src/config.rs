use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_rules_url")]
    pub rules_url: String,

    /// When true, remote casing/formatting replaces local duplicates on sync.
    #[serde(default)]
    pub overwrite_existing: bool,

    #[serde(default = "default_storage_path")]
    pub storage_path: String,

    #[serde(default)]
    pub updates: UpdateConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub areas: AreaConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpdateConfig {
    #[serde(default = "default_update_interval")]
    pub interval_hours: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_api_enable")]
    pub enable: bool,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AreaConfig {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Defaults
fn default_rules_url() -> String {
    "https://cdn.jsdelivr.net/gh/feedblock/rules@latest/block-rules.json".to_string()
}
fn default_storage_path() -> String {
    "feedblock-rules.json".to_string()
}
fn default_update_interval() -> u64 {
    24
}
fn default_api_enable() -> bool {
    true
}
fn default_api_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_url: default_rules_url(),
            overwrite_existing: false,
            storage_path: default_storage_path(),
            updates: UpdateConfig::default(),
            api: ApiConfig::default(),
            areas: AreaConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            interval_hours: default_update_interval(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable: default_api_enable(),
            port: default_api_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config TOML")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.rules_url).context("Invalid rules_url")?;
        if let Some(url) = &self.areas.url {
            Url::parse(url).context("Invalid areas.url")?;
        }
        Ok(())
    }
}
