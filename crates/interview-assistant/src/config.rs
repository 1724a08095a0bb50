use config::{Config as ConfigLoader, ConfigError, Environment, File};
use interview_llm::ProviderConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::relay::RelaySettings;

/// Environment variable holding the provider credential
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,

    // Secret (from ENV only); may be absent until the first request
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for producing response headers; streamed bodies are not cut
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    pub base_url: String,
    /// Cosmetic pause after each redraw; 0 turns it off
    pub pacing_ms: u64,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl LlmConfig {
    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            pacing: Duration::from_millis(self.pacing_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. `INTERVIEW_<SECTION>__<KEY>` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("INTERVIEW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        cfg.api_key = api_key_from(std::env::var(API_KEY_VAR).ok());

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn provider_config(&self) -> ProviderConfig {
        let provider = ProviderConfig::default()
            .with_base_url(&self.llm.base_url)
            .with_timeouts(self.llm.connect_timeout_secs, self.llm.read_timeout_secs);
        match &self.api_key {
            Some(key) => provider.with_api_key(key),
            None => provider,
        }
    }
}

/// A blank variable counts as unset
fn api_key_from(value: Option<String>) -> Option<String> {
    value.filter(|key| !key.trim().is_empty())
}
