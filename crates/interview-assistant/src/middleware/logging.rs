use axum::{
    extract::Request,
    http::header::CONTENT_TYPE,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::topic::Topic;

/// Logs one line per request once the response head is ready
///
/// For `/api/ask` the duration covers opening the stream, not the answer;
/// the topic comes from the handler through response extensions.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let topic = response.extensions().get::<Topic>().map_or("-", |t| t.name());
    let streaming = is_event_stream(&response);
    let duration_ms = start.elapsed().as_millis();

    macro_rules! request_line {
        ($level:expr) => {
            tracing::event!(
                $level,
                method = %method,
                uri = %uri,
                status = %status,
                topic,
                streaming,
                duration_ms = %duration_ms,
                "Request processed"
            )
        };
    }

    if status.is_server_error() {
        request_line!(tracing::Level::ERROR);
    } else if status.is_client_error() {
        request_line!(tracing::Level::WARN);
    } else {
        request_line!(tracing::Level::INFO);
    }

    response
}

fn is_event_stream(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/event-stream"))
}
