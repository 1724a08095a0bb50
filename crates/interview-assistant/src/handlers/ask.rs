use async_trait::async_trait;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use utoipa::ToSchema;

use crate::error::ApiResult;
use crate::question::Question;
use crate::relay::AnswerView;
use crate::state::AppState;
use crate::topic::Topic;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskRequest {
    /// One of the names returned by `/api/topics`
    pub topic: String,
    pub question: String,
}

/// Forwards view updates to the SSE response as named events
///
/// `answer` always carries the full text so far, so the page replaces its
/// display instead of appending.
pub struct SseView {
    tx: mpsc::Sender<Event>,
}

impl SseView {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    async fn send(&mut self, name: &'static str, payload: Value) {
        let event = match Event::default().event(name).json_data(payload) {
            Ok(event) => event,
            Err(e) => {
                tracing::error!("Failed to encode {} event: {}", name, e);
                return;
            }
        };

        // A closed channel means the client left; the spawned task notices
        // through `Sender::closed` and stops the relay
        let _ = self.tx.send(event).await;
    }
}

#[async_trait]
impl AnswerView for SseView {
    async fn redraw(&mut self, answer: &str) {
        self.send("answer", json!({ "content": answer })).await;
    }

    async fn success(&mut self) {
        self.send("done", json!({ "status": "completed" })).await;
    }

    async fn error(&mut self, message: &str) {
        self.send("error", json!({ "error": message })).await;
    }

    async fn warning(&mut self, message: &str) {
        self.send("warning", json!({ "warning": message })).await;
    }
}

/// Ask a topic-scoped question and stream the answer using Server-Sent Events
#[utoipa::path(
    post,
    path = "/api/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Streaming answer", content_type = "text/event-stream"),
        (status = 400, description = "Unknown topic"),
        (status = 409, description = "Another answer is still streaming"),
        (status = 422, description = "Blank question")
    ),
    tag = "ask"
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> ApiResult<(Extension<Topic>, Sse<impl Stream<Item = Result<Event, Infallible>>>)> {
    let topic: Topic = req.topic.parse()?;
    // Checked here as well so a blank question never opens a stream
    let question = Question::parse(&req.question)?;

    // Reserved before spawning so an overlapping submit is refused up front
    let active = state.session.begin()?;

    let (tx, rx) = mpsc::channel(64);
    let disconnected = tx.clone();

    tokio::spawn(async move {
        let mut view = SseView::new(tx);
        let relay = active.run(
            state.llm_client.as_ref(),
            &state.relay,
            topic,
            question.as_str(),
            &mut view,
        );

        tokio::select! {
            _ = relay => {}
            _ = disconnected.closed() => {
                // Dropping the relay releases the session as Failed
                tracing::warn!(topic = %topic, "Client disconnected; abandoning answer stream");
            }
        }
    });

    let sse_stream = ReceiverStream::new(rx).map(Ok::<Event, Infallible>);

    // The topic rides along in response extensions for the request log
    Ok((
        Extension(topic),
        Sse::new(sse_stream).keep_alive(KeepAlive::default()),
    ))
}
