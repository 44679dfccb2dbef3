use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, patch},
    Json, Router,
};
use chat_core::ChatConfig;
use chat_session::{ExportFormat, Message, Role, Session};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/sessions", get(list_sessions).post(create_session))
        .route("/api/v1/sessions/{id}", get(get_session).delete(clear_session))
        .route("/api/v1/sessions/{id}/messages", get(get_history).post(send_message))
        .route("/api/v1/sessions/{id}/context", patch(update_context))
        .route("/api/v1/sessions/{id}/export", get(export_history))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "sessions": state.chat.store().len(),
        "backend": state.chat.backend_name(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub user_id: String,
    #[serde(default)]
    pub config: ChatConfig,
}

async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> (StatusCode, Json<Session>) {
    let session = state.chat.create_chat_session(req.user_id, req.config);
    (StatusCode::CREATED, Json(session))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: Option<String>,
}

async fn list_sessions(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Json<Value> {
    let sessions = state.chat.store().list(q.user_id.as_deref());
    Json(json!({ "sessions": sessions }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    state
        .chat
        .store()
        .get(&id)
        .map(Json)
        .ok_or_else(|| ApiError::session_not_found(&id))
}

async fn clear_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.chat.clear_chat_session(&id);
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    if !state.chat.store().contains(&id) {
        return Err(ApiError::session_not_found(&id));
    }
    let history = match q.limit {
        Some(limit) => state.chat.manage_context_window(&id, limit),
        None => state.chat.get_chat_history(&id),
    };
    Ok(Json(history))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub id: Option<String>,
    pub content: String,
}

/// Stream the reply as SSE: one `fragment` event per fragment, then `done`
/// with the assistant message id, or `error` if the turn failed mid-stream.
/// Refusals (unknown session, taken id) are plain error responses.
async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let message = match req.id {
        Some(message_id) => Message::with_id(message_id, Role::User, req.content),
        None => Message::new(Role::User, req.content),
    };
    let reply_id = message.reply_id();
    let fragments = state.chat.try_send_message(&id, message)?;

    let failed = Arc::new(AtomicBool::new(false));
    let flag = failed.clone();
    let body = fragments.map(move |item| match item {
        Ok(fragment) => Event::default().event("fragment").json_data(fragment),
        Err(e) => {
            flag.store(true, Ordering::Relaxed);
            Event::default().event("error").json_data(ApiError::from(e).detail())
        }
    });
    let done = stream::once(async move {
        (!failed.load(Ordering::Relaxed))
            .then(|| Event::default().event("done").json_data(json!({ "message_id": reply_id })))
    })
    .filter_map(|event| async move { event });

    Ok(Sse::new(body.chain(done)).keep_alive(KeepAlive::default()))
}

async fn update_context(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Value::Object(partial) = body else {
        return Err(ApiError::bad_request("context update must be a JSON object"));
    };
    if !state.chat.update_chat_context(&id, partial) {
        return Err(ApiError::session_not_found(&id));
    }
    let context = state.chat.store().context(&id).unwrap_or_default();
    Ok(Json(Value::Object(context)))
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

async fn export_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format: ExportFormat = q.format.as_deref().unwrap_or("json").parse()?;
    if !state.chat.store().contains(&id) {
        return Err(ApiError::session_not_found(&id));
    }
    let text = state.chat.export_chat_history(&id, format)?;
    Ok(([(header::CONTENT_TYPE, format.content_type())], text))
}
