//! Streams a scoped answer from the chat provider into an [`AnswerView`].
//!
//! Every fragment is appended to a [`ResponseBuffer`] and the view is redrawn
//! with the whole buffer, so whatever the view shows is always the complete
//! answer so far. The request ends with exactly one `success` or one `error`.

use async_trait::async_trait;
use futures::{future, Stream, StreamExt};
use interview_llm::{ChatClient, ChatOptions, ChatRequest, ChatStream, Message, StreamEvent};
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

use crate::prompt::build_system_prompt;
use crate::question::{Question, ValidationError};
use crate::topic::Topic;

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_PACING: Duration = Duration::from_millis(50);

/// Failure while opening or consuming the answer stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("An error occurred: {description}")]
pub struct RequestError {
    pub description: String,
}

impl RequestError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl From<anyhow::Error> for RequestError {
    fn from(err: anyhow::Error) -> Self {
        // Alternate format keeps the whole context chain on one line
        Self::new(format!("{:#}", err))
    }
}

/// Request-level constants; none of these come from the user
#[derive(Debug, Clone, PartialEq)]
pub struct RelaySettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Pause after each redraw; zero disables it
    pub pacing: Duration,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            pacing: DEFAULT_PACING,
        }
    }
}

impl RelaySettings {
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    fn chat_options(&self) -> ChatOptions {
        let options = ChatOptions::new().temperature(self.temperature);
        match self.max_tokens {
            Some(tokens) => options.max_tokens(tokens),
            None => options,
        }
    }
}

/// Answer text accumulated for the current request only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBuffer {
    text: String,
}

impl ResponseBuffer {
    pub fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Display surface the relay drives
#[async_trait]
pub trait AnswerView: Send {
    /// Show `answer` in full, replacing whatever was shown before
    async fn redraw(&mut self, answer: &str);

    async fn success(&mut self);

    async fn error(&mut self, message: &str);

    async fn warning(&mut self, message: &str);
}

pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, RequestError>> + Send>>;

#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    Completed { answer: String },
    Failed { partial: String, error: RequestError },
    Rejected(ValidationError),
}

impl RelayOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RelayOutcome::Completed { .. })
    }
}

/// Open one streaming completion and yield its non-empty text fragments
///
/// The sequence ends at the provider's completion marker or when the
/// connection closes. The first error ends it as well.
pub async fn stream_answer(
    client: &dyn ChatClient,
    settings: &RelaySettings,
    system_prompt: &str,
    question: &str,
) -> Result<FragmentStream, RequestError> {
    let request = ChatRequest::new(
        settings.model.clone(),
        vec![Message::system(system_prompt), Message::human(question)],
    )
    .with_options(settings.chat_options());

    let events = client.chat_stream(request).await?;
    Ok(into_fragments(events))
}

fn into_fragments(events: ChatStream) -> FragmentStream {
    let mut failed = false;
    let fragments = events
        .take_while(move |event| {
            let keep = !failed && !matches!(event, Ok(StreamEvent::Done { .. }));
            failed = event.is_err();
            future::ready(keep)
        })
        .filter_map(|event| {
            future::ready(match event {
                Ok(StreamEvent::Message { content }) if !content.is_empty() => Some(Ok(content)),
                Ok(_) => None,
                Err(e) => Some(Err(RequestError::from(e))),
            })
        });

    Box::pin(fragments)
}

/// Handle one submission end to end
///
/// A blank question only produces a warning and no outbound request. Text
/// already drawn before a failure stays drawn.
pub async fn relay_answer<V>(
    client: &dyn ChatClient,
    settings: &RelaySettings,
    topic: Topic,
    raw_question: &str,
    view: &mut V,
) -> RelayOutcome
where
    V: AnswerView + ?Sized,
{
    let question = match Question::parse(raw_question) {
        Ok(question) => question,
        Err(e) => {
            tracing::warn!(topic = %topic, "Rejected submission: {}", e);
            view.warning(&e.to_string()).await;
            return RelayOutcome::Rejected(e);
        }
    };

    tracing::info!(topic = %topic, model = %settings.model, "Streaming answer");

    let system_prompt = build_system_prompt(topic);
    let mut buffer = ResponseBuffer::default();
    let mut fragments_seen = 0usize;

    let result = async {
        let mut fragments =
            stream_answer(client, settings, &system_prompt, question.as_str()).await?;

        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            buffer.push(&fragment);
            fragments_seen += 1;
            view.redraw(buffer.as_str()).await;

            if !settings.pacing.is_zero() {
                tokio::time::sleep(settings.pacing).await;
            }
        }
        Ok::<(), RequestError>(())
    }
    .await;

    match result {
        Ok(()) => {
            tracing::info!(
                topic = %topic,
                fragments = fragments_seen,
                chars = buffer.as_str().len(),
                "Answer completed"
            );
            view.success().await;
            RelayOutcome::Completed {
                answer: buffer.into_string(),
            }
        }
        Err(error) => {
            tracing::error!(
                topic = %topic,
                fragments = fragments_seen,
                "Answer failed: {}",
                error.description
            );
            view.error(&error.to_string()).await;
            RelayOutcome::Failed {
                partial: buffer.into_string(),
                error,
            }
        }
    }
}
