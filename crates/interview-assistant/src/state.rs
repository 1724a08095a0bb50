use interview_llm::ChatClient;
use std::sync::Arc;

use crate::config::Config;
use crate::relay::RelaySettings;
use crate::session::AnswerSession;

/// Shared application state passed to all handlers
///
/// The chat client is built once at startup and only read afterwards.
/// `session` is process-wide: one answer streams at a time.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm_client: Arc<dyn ChatClient>,
    pub relay: RelaySettings,
    pub session: AnswerSession,
}

impl AppState {
    pub fn new(config: Config, llm_client: Arc<dyn ChatClient>) -> Self {
        let relay = config.llm.relay_settings();
        Self {
            config: Arc::new(config),
            llm_client,
            relay,
            session: AnswerSession::new(),
        }
    }
}
