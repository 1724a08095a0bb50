// Client for OpenAI-compatible `/chat/completions` endpoints (Groq by default)

use crate::config::ProviderConfig;
use crate::streaming::parse_chat_sse_stream;
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatStream};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;

/// Chat completion client (HTTP direct, no SDK)
pub struct ChatCompletionsClient {
    http_client: reqwest::Client,
    base_url: String,
    provider_name: String,
    api_key: Option<String>,
}

impl ChatCompletionsClient {
    /// Build the client once; the API key is not checked here
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()
            .context("Failed to create HTTP client")?;
        
        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            provider_name: config.provider_name,
            api_key: config.api_key,
        })
    }
    
    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
        stream: bool,
    ) -> Result<Value> {
        let mut request = serde_json::json!({
            "model": model,
            "messages": serde_json::to_value(messages)?,
            "stream": stream,
        });
        
        if let Some(obj) = request.as_object_mut() {
            if let Some(temp) = options.temperature {
                obj.insert("temperature".to_string(), serde_json::json!(temp));
            }
            if let Some(max_tokens) = options.max_tokens {
                obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
            }
        }
        
        Ok(request)
    }
}

#[async_trait]
impl ChatClient for ChatCompletionsClient {
    async fn chat_stream(&self, request: ChatRequest) -> Result<ChatStream> {
        let api_key = self.api_key.as_deref().with_context(|| {
            format!("{} API key is not configured", self.provider_name)
        })?;
        
        let payload = self.build_chat_request(
            &request.model,
            &request.messages,
            &request.options,
            true,
        )?;
        
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Opening chat completion stream"
        );
        
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;
        
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("{} API error ({}): {}", self.provider_name, status, error_text);
        }
        
        Ok(parse_chat_sse_stream(response.bytes_stream()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let client = ChatCompletionsClient::new(ProviderConfig::groq("k")).unwrap();
        let messages = vec![Message::system("rules"), Message::human("question")];
        let options = ChatOptions::new().temperature(0.2);
        
        let payload = client
            .build_chat_request("llama-3.3-70b-versatile", &messages, &options, true)
            .unwrap();
        
        assert_eq!(payload["model"], "llama-3.3-70b-versatile");
        assert_eq!(payload["stream"], true);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["role"], "user");
        assert_eq!(payload["messages"][1]["content"], "question");
        assert!((payload["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert!(payload.get("max_tokens").is_none());
    }
}
