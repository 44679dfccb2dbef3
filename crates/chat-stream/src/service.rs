//! The chat surface handed to UI-facing callers.

use crate::backend::{backend_for, FragmentStream, ReplyBackend};
use crate::protocol;
use chat_core::config::StreamingConfig;
use chat_core::{ChatConfig, Result};
use chat_session::{ExportFormat, Message, Session, SessionContext, SessionStore};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct ChatService {
    store: Arc<SessionStore>,
    backend: Arc<dyn ReplyBackend>,
    fragment_delay: Duration,
}

impl ChatService {
    pub fn new(store: Arc<SessionStore>, backend: Arc<dyn ReplyBackend>, fragment_delay: Duration) -> Self {
        Self { store, backend, fragment_delay }
    }

    /// Fresh store with the configured backend and pacing.
    pub fn from_config(config: &StreamingConfig) -> Self {
        Self::new(
            Arc::new(SessionStore::new()),
            backend_for(config.backend),
            Duration::from_millis(config.fragment_delay_ms),
        )
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn create_chat_session(&self, user_id: impl Into<String>, config: ChatConfig) -> Session {
        self.store.create(user_id, config)
    }

    pub fn send_message(&self, session_id: &str, message: Message) -> FragmentStream {
        protocol::send_message(
            self.store.clone(),
            self.backend.clone(),
            self.fragment_delay,
            session_id,
            message,
        )
    }

    /// Like [`send_message`](Self::send_message), but refusals come back as
    /// errors before any stream exists, an unknown session included.
    pub fn try_send_message(&self, session_id: &str, message: Message) -> Result<FragmentStream> {
        protocol::start_turn(
            self.store.clone(),
            self.backend.clone(),
            self.fragment_delay,
            session_id,
            message,
        )
    }

    pub fn get_chat_history(&self, session_id: &str) -> Vec<Message> {
        self.store.history(session_id)
    }

    /// Last `limit` messages of the history, for bounded prompt context.
    pub fn manage_context_window(&self, session_id: &str, limit: usize) -> Vec<Message> {
        self.store.recent_history(session_id, limit)
    }

    pub fn update_chat_context(&self, session_id: &str, partial: SessionContext) -> bool {
        self.store.update_context(session_id, partial)
    }

    pub fn clear_chat_session(&self, session_id: &str) -> bool {
        self.store.clear(session_id)
    }

    pub fn export_chat_history(&self, session_id: &str, format: ExportFormat) -> Result<String> {
        self.store.export(session_id, format)
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("sessions", &self.store.len())
            .field("backend", &self.backend.name())
            .field("fragment_delay", &self.fragment_delay)
            .finish()
    }
}

/// Drain a fragment stream into the full reply text.
pub async fn collect_reply(mut fragments: FragmentStream) -> Result<String> {
    let mut reply = String::new();
    while let Some(fragment) = fragments.next().await {
        reply.push_str(&fragment?);
    }
    Ok(reply)
}
