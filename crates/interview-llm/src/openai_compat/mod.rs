mod client;

pub use client::ChatCompletionsClient;
