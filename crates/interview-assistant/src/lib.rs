pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod prompt;
pub mod question;
pub mod relay;
pub mod routes;
pub mod session;
pub mod state;
pub mod topic;

mod app;

pub use app::{build_router, ApiDoc};
pub use prompt::{build_system_prompt, refusal_message};
pub use question::{Question, ValidationError};
pub use relay::{
    relay_answer, stream_answer, AnswerView, FragmentStream, RelayOutcome, RelaySettings,
    RequestError, ResponseBuffer,
};
pub use session::{ActiveRequest, AnswerSession, RequestState, SessionBusy};
pub use topic::{Topic, UnknownTopic};
