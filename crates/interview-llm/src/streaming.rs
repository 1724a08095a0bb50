use anyhow::Result;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::pin::Pin;

use crate::buffer_utils::{parse_sse_stream, SseLineParser};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Next piece of the generated answer (never empty)
    Message {
        content: String,
    },
    
    Done {
        #[serde(skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },
}

/// One `chat.completion.chunk` payload of an OpenAI-compatible stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamChunk {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delta {
    pub role: Option<String>,
    pub content: Option<String>,
}

impl ChatStreamChunk {
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
    }
    
    pub fn is_done(&self) -> bool {
        self.choices
            .first()
            .and_then(|c| c.finish_reason.as_ref())
            .is_some()
    }
    
    /// Deltas with absent or empty content produce no `Message` event
    pub fn to_stream_events(&self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        
        if let Some(choice) = self.choices.first() {
            if let Some(content) = &choice.delta.content {
                if !content.is_empty() {
                    events.push(StreamEvent::Message {
                        content: content.clone(),
                    });
                }
            }
            
            if let Some(finish_reason) = &choice.finish_reason {
                events.push(StreamEvent::Done {
                    finish_reason: Some(finish_reason.clone()),
                });
            }
        }
        
        events
    }
}

/// Error object some providers send in-band instead of a chunk
#[derive(Debug, Deserialize)]
struct StreamErrorEnvelope {
    error: StreamErrorBody,
}

#[derive(Debug, Deserialize)]
struct StreamErrorBody {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

pub struct ChatChunkParser;

impl SseLineParser for ChatChunkParser {
    fn parse_data_line(&self, data: &str) -> Result<Vec<StreamEvent>> {
        match serde_json::from_str::<ChatStreamChunk>(data) {
            Ok(chunk) => Ok(chunk.to_stream_events()),
            Err(chunk_err) => match serde_json::from_str::<StreamErrorEnvelope>(data) {
                Ok(envelope) => match envelope.error.error_type {
                    Some(kind) => {
                        anyhow::bail!("Provider error ({}): {}", kind, envelope.error.message)
                    }
                    None => anyhow::bail!("Provider error: {}", envelope.error.message),
                },
                Err(_) => anyhow::bail!("Failed to parse chat chunk: {}", chunk_err),
            },
        }
    }
}

/// Decode an OpenAI-compatible chat completion SSE body into stream events
pub fn parse_chat_sse_stream<S, B, E>(
    byte_stream: S,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    parse_sse_stream(byte_stream, ChatChunkParser)
}
