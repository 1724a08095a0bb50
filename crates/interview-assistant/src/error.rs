use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::question::ValidationError;
use crate::session::SessionBusy;
use crate::topic::UnknownTopic;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    UnknownTopic(#[from] UnknownTopic),

    #[error(transparent)]
    Busy(#[from] SessionBusy),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            // Shown as a warning in the page, not as an error
            ApiError::Validation(ref e) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "warning": e.to_string() }))
            }
            ApiError::UnknownTopic(ref e) => {
                tracing::warn!("Rejected request: {}", e);
                (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() }))
            }
            ApiError::Busy(ref e) => {
                (StatusCode::CONFLICT, json!({ "warning": e.to_string() }))
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
