use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::topic::Topic;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopicsResponse {
    pub topics: Vec<Topic>,
    #[serde(rename = "default")]
    pub default_topic: Topic,
}

/// Topics offered by the selector, in display order
#[utoipa::path(
    get,
    path = "/api/topics",
    responses(
        (status = 200, description = "Available topics", body = TopicsResponse)
    ),
    tag = "topics"
)]
pub async fn list_topics() -> Json<TopicsResponse> {
    Json(TopicsResponse {
        topics: Topic::ALL.to_vec(),
        default_topic: Topic::default(),
    })
}
