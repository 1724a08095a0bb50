pub mod types;
pub mod traits;
pub mod streaming;
pub mod buffer_utils;
pub mod config;
pub mod openai_compat;

pub use traits::{ChatClient, ChatRequest, ChatOptions, ChatStream};
pub use streaming::{StreamEvent, ChatStreamChunk, parse_chat_sse_stream};
pub use buffer_utils::CircularLineBuffer;
pub use config::{ClientFactory, ProviderConfig, GROQ_API_BASE};
pub use openai_compat::ChatCompletionsClient;
pub use types::Message;
