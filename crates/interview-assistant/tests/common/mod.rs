#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use interview_assistant::AnswerView;
use interview_llm::{ChatClient, ChatRequest, ChatStream, StreamEvent};
use std::sync::{Arc, Mutex};

/// One scripted item of a fake provider stream
#[derive(Debug, Clone)]
pub enum Step {
    Text(&'static str),
    /// Delta without content (role-only or empty string)
    Empty,
    Fail(&'static str),
    /// Never yields again
    Hang,
}

/// In-process `ChatClient` replaying a fixed script
#[derive(Clone, Default)]
pub struct ScriptedClient {
    steps: Vec<Step>,
    open_error: Option<&'static str>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedClient {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    pub fn texts(texts: &[&'static str]) -> Self {
        Self::new(texts.iter().copied().map(Step::Text).collect())
    }

    pub fn failing_to_open(message: &'static str) -> Self {
        Self {
            open_error: Some(message),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat_stream(&self, request: ChatRequest) -> anyhow::Result<ChatStream> {
        self.requests.lock().unwrap().push(request);

        if let Some(message) = self.open_error {
            anyhow::bail!("{}", message);
        }

        let mut items = Vec::new();
        let mut hang = false;
        let mut failed = false;
        for step in &self.steps {
            match step {
                Step::Text(text) => items.push(Ok(StreamEvent::Message {
                    content: text.to_string(),
                })),
                Step::Empty => items.push(Ok(StreamEvent::Message {
                    content: String::new(),
                })),
                Step::Fail(message) => {
                    items.push(Err(anyhow::anyhow!("{}", message)));
                    failed = true;
                    break;
                }
                Step::Hang => {
                    hang = true;
                    break;
                }
            }
        }
        if !hang && !failed {
            items.push(Ok(StreamEvent::Done {
                finish_reason: Some("stop".to_string()),
            }));
        }

        let scripted = stream::iter(items);
        if hang {
            Ok(Box::pin(scripted.chain(stream::pending())))
        } else {
            Ok(Box::pin(scripted))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Redraw(String),
    Success,
    Error(String),
    Warning(String),
}

/// `AnswerView` that records every call it receives
#[derive(Clone, Default)]
pub struct RecordingView {
    calls: Arc<Mutex<Vec<ViewCall>>>,
}

impl RecordingView {
    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn displayed(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            ViewCall::Redraw(text) => Some(text),
            _ => None,
        })
    }

    pub fn count(&self, wanted: fn(&ViewCall) -> bool) -> usize {
        self.calls().iter().filter(|call| wanted(call)).count()
    }

    fn record(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AnswerView for RecordingView {
    async fn redraw(&mut self, answer: &str) {
        self.record(ViewCall::Redraw(answer.to_string()));
    }

    async fn success(&mut self) {
        self.record(ViewCall::Success);
    }

    async fn error(&mut self, message: &str) {
        self.record(ViewCall::Error(message.to_string()));
    }

    async fn warning(&mut self, message: &str) {
        self.record(ViewCall::Warning(message.to_string()));
    }
}
