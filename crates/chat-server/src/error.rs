//! Maps chat errors onto HTTP statuses and a `{ "error": { code, message } }`
//! body. The same body shape is reused for SSE `error` events.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chat_core::ChatError;
use serde_json::{json, Value};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: msg.into() }
    }

    pub fn session_not_found(id: &str) -> Self {
        ChatError::SessionNotFound { id: id.to_string() }.into()
    }

    /// Stable machine-readable code for the status.
    pub fn code(&self) -> &'static str {
        match self.status {
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::CONFLICT => "conflict",
            s if s.is_client_error() => "bad_request",
            _ => "internal_error",
        }
    }

    /// Inner `{ code, message }` object.
    pub fn detail(&self) -> Value {
        json!({ "code": self.code(), "message": self.message })
    }
}

fn status_for(err: &ChatError) -> StatusCode {
    match err {
        ChatError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        ChatError::DuplicateMessageId { .. } => StatusCode::CONFLICT,
        ChatError::UnsupportedFormat(_) | ChatError::UnknownModel(_) | ChatError::InvalidConfig(_) => {
            StatusCode::BAD_REQUEST
        }
        ChatError::Backend(_)
        | ChatError::Serialization(_)
        | ChatError::Io(_)
        | ChatError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        Self { status: status_for(&err), message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.detail() }))).into_response()
    }
}
