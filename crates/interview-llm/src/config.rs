// Provider configuration for OpenAI-compatible chat completion endpoints

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

fn default_provider_name() -> String {
    "Groq".to_string()
}

fn default_base_url() -> String {
    GROQ_API_BASE.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_read_timeout_secs() -> u64 {
    60
}

/// Connection details for a chat completion provider
/// 
/// The API key is optional on purpose: a process may start without one and
/// only fail once a request is actually made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Longest silence tolerated between two reads of the response body
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            api_key: None,
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// Groq provider with the given key
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeouts(mut self, connect_secs: u64, read_secs: u64) -> Self {
        self.connect_timeout_secs = connect_secs;
        self.read_timeout_secs = read_secs;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

/// Factory for creating chat clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_chat_client(
        config: ProviderConfig,
    ) -> Result<Arc<dyn crate::traits::ChatClient>> {
        let client = crate::openai_compat::ChatCompletionsClient::new(config)?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_defaults() {
        let config = ProviderConfig::groq("test-key");
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.base_url, GROQ_API_BASE);
        assert_eq!(config.provider_name, "Groq");
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ProviderConfig::default().with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ProviderConfig =
            serde_json::from_str(r#"{"base_url":"http://x","read_timeout_secs":5}"#).unwrap();

        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, "http://x");
        assert_eq!(config.read_timeout(), Duration::from_secs(5));
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_factory_without_key() {
        // Missing credentials only fail on first request
        assert!(ClientFactory::create_chat_client(ProviderConfig::default()).is_ok());
    }
}
