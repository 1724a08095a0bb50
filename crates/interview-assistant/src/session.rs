use interview_llm::ChatClient;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::relay::{relay_answer, AnswerView, RelayOutcome, RelaySettings};
use crate::topic::Topic;

/// Lifecycle of a single submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Streaming,
    Completed,
    Failed,
}

impl RequestState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestState::Completed | RequestState::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("A request is already streaming")]
pub struct SessionBusy;

/// Single-request flow: at most one submission streams at a time
///
/// Clones share the same state. A submit while another one is streaming is
/// a no-op that returns [`SessionBusy`]; nothing is queued.
#[derive(Debug, Clone)]
pub struct AnswerSession {
    state: Arc<Mutex<RequestState>>,
}

impl Default for AnswerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerSession {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RequestState::Idle)),
        }
    }

    pub fn state(&self) -> RequestState {
        *self.lock()
    }

    pub async fn submit<V>(
        &self,
        client: &dyn ChatClient,
        settings: &RelaySettings,
        topic: Topic,
        raw_question: &str,
        view: &mut V,
    ) -> Result<RelayOutcome, SessionBusy>
    where
        V: AnswerView + ?Sized,
    {
        let active = self.begin()?;
        Ok(active.run(client, settings, topic, raw_question, view).await)
    }

    /// Reserve the session for one request without running it yet
    ///
    /// The state is `Streaming` from here on. Dropping the returned
    /// [`ActiveRequest`] before it finishes leaves the session `Failed`.
    pub fn begin(&self) -> Result<ActiveRequest, SessionBusy> {
        let mut state = self.lock();
        if *state == RequestState::Streaming {
            tracing::debug!("Ignoring submit while a request is streaming");
            return Err(SessionBusy);
        }
        let previous = *state;
        *state = RequestState::Streaming;
        Ok(ActiveRequest {
            state: Arc::clone(&self.state),
            previous,
            finished: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, RequestState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<RequestState>) -> MutexGuard<'_, RequestState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reservation returned by [`AnswerSession::begin`]
///
/// Leaves `Streaming` even if it is dropped midway.
#[must_use = "the session stays busy until the request runs or is dropped"]
pub struct ActiveRequest {
    state: Arc<Mutex<RequestState>>,
    previous: RequestState,
    finished: bool,
}

impl ActiveRequest {
    /// Relay one submission and record how it ended
    pub async fn run<V>(
        mut self,
        client: &dyn ChatClient,
        settings: &RelaySettings,
        topic: Topic,
        raw_question: &str,
        view: &mut V,
    ) -> RelayOutcome
    where
        V: AnswerView + ?Sized,
    {
        let outcome = relay_answer(client, settings, topic, raw_question, view).await;

        let next = match &outcome {
            RelayOutcome::Completed { .. } => RequestState::Completed,
            RelayOutcome::Failed { .. } => RequestState::Failed,
            // Nothing was sent, so the previous state stands
            RelayOutcome::Rejected(_) => self.previous,
        };
        self.finish(next);
        outcome
    }

    fn finish(&mut self, next: RequestState) {
        *lock_state(&self.state) = next;
        self.finished = true;
    }
}

impl Drop for ActiveRequest {
    fn drop(&mut self) {
        if !self.finished {
            *lock_state(&self.state) = RequestState::Failed;
        }
    }
}
