use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::config::CorsConfig;
use crate::handlers::ask;
use crate::middleware::logging;
use crate::routes::{health, index, topics};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(ask::ask, topics::list_topics, health::health_check),
    components(schemas(
        ask::AskRequest,
        topics::TopicsResponse,
        health::HealthResponse,
        crate::topic::Topic
    )),
    tags(
        (name = "ask", description = "Streamed topic-scoped answers"),
        (name = "topics", description = "Topic selector contents"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::health_check))
        .route("/api/topics", get(topics::list_topics))
        .route("/api/ask", post(ask::ask))
        .route("/api/openapi.json", get(openapi_json));

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    api_routes
        .layer(middleware::from_fn(logging::log_request))
        // Bounds the time to response headers only; SSE bodies keep streaming
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        return CorsLayer::new();
    }

    let mut cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors
}
