//! In-memory session registry.
//!
//! Every call takes the lock for its own duration only, so calls are atomic
//! with respect to each other. Absent sessions are reported through return
//! values, never as errors.

use crate::export::{self, ExportFormat};
use crate::session::{Message, Session, SessionContext};
use chat_core::{ChatConfig, ChatError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create and register a session with empty history and context.
    pub fn create(&self, user_id: impl Into<String>, config: ChatConfig) -> Session {
        let mut map = self.write();
        let mut session = Session::new(user_id, config.clone());
        // v4 collisions are not expected, but the id must stay unique.
        while map.contains_key(&session.id) {
            session = Session::new(session.user_id.clone(), config.clone());
        }
        map.insert(session.id.clone(), session.clone());
        info!(session_id = %session.id, user_id = %session.user_id, model = %session.config.model, "session created");
        session
    }

    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.read().get(session_id).cloned()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.read().contains_key(session_id)
    }

    /// Sessions ordered by creation time, optionally limited to one user.
    pub fn list(&self, user_id: Option<&str>) -> Vec<Session> {
        let mut sessions: Vec<Session> = self
            .read()
            .values()
            .filter(|s| user_id.map_or(true, |u| s.user_id == u))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        sessions
    }

    /// Messages in insertion order; empty when the session does not exist.
    pub fn history(&self, session_id: &str) -> Vec<Message> {
        self.read()
            .get(session_id)
            .map(|s| s.history.clone())
            .unwrap_or_default()
    }

    /// Trailing `limit` messages; empty when the session does not exist.
    pub fn recent_history(&self, session_id: &str, limit: usize) -> Vec<Message> {
        self.read()
            .get(session_id)
            .map(|s| s.recent(limit).to_vec())
            .unwrap_or_default()
    }

    /// Merge `partial` into the session context. Returns false if the session
    /// does not exist.
    pub fn update_context(&self, session_id: &str, partial: SessionContext) -> bool {
        match self.write().get_mut(session_id) {
            Some(session) => {
                debug!(session_id, keys = partial.len(), "context merged");
                session.merge_context(partial);
                true
            }
            None => false,
        }
    }

    /// Context snapshot; `None` when the session does not exist.
    pub fn context(&self, session_id: &str) -> Option<SessionContext> {
        self.read().get(session_id).map(|s| s.context.clone())
    }

    /// Remove the session. Idempotent; returns whether anything was removed.
    pub fn clear(&self, session_id: &str) -> bool {
        let removed = self.write().remove(session_id).is_some();
        if removed {
            info!(session_id, "session cleared");
        }
        removed
    }

    /// Append a message. `Ok(false)` when the session does not exist.
    pub fn append(&self, session_id: &str, message: Message) -> Result<bool> {
        let mut map = self.write();
        let Some(session) = map.get_mut(session_id) else {
            return Ok(false);
        };
        if session.is_id_taken(&message.id) {
            return Err(duplicate(session_id, &message.id));
        }
        debug!(session_id, message_id = %message.id, role = %message.role, "message appended");
        session.push(message);
        Ok(true)
    }

    /// Open a user turn: append `message` and reserve its reply id, after
    /// checking that neither id is in history or held by another in-flight
    /// turn. Returns the session as it stands after the append, or `Ok(None)`
    /// when the session does not exist.
    ///
    /// Every opened turn must end in [`finish_turn`](Self::finish_turn) or
    /// [`abandon_turn`](Self::abandon_turn).
    pub fn begin_turn(&self, session_id: &str, message: Message) -> Result<Option<Session>> {
        let mut map = self.write();
        let Some(session) = map.get_mut(session_id) else {
            return Ok(None);
        };
        let reply_id = message.reply_id();
        for id in [message.id.as_str(), reply_id.as_str()] {
            if session.is_id_taken(id) {
                return Err(duplicate(session_id, id));
            }
        }
        debug!(session_id, message_id = %message.id, "turn opened");
        session.pending_replies.insert(reply_id);
        session.push(message);
        Ok(Some(session.clone()))
    }

    /// Release the reservation for `reply.id` and append the reply.
    /// `Ok(false)` when the session is gone.
    pub fn finish_turn(&self, session_id: &str, reply: Message) -> Result<bool> {
        let mut map = self.write();
        let Some(session) = map.get_mut(session_id) else {
            return Ok(false);
        };
        if !session.pending_replies.remove(&reply.id) || session.contains_message(&reply.id) {
            return Err(duplicate(session_id, &reply.id));
        }
        debug!(session_id, message_id = %reply.id, "turn finished");
        session.push(reply);
        Ok(true)
    }

    /// Release the reservation for `reply_id` without appending anything.
    pub fn abandon_turn(&self, session_id: &str, reply_id: &str) {
        if let Some(session) = self.write().get_mut(session_id) {
            if session.pending_replies.remove(reply_id) {
                debug!(session_id, message_id = reply_id, "turn abandoned");
            }
        }
    }

    /// Export the history. An absent session exports as an empty history.
    pub fn export(&self, session_id: &str, format: ExportFormat) -> Result<String> {
        let map = self.read();
        let history = map.get(session_id).map(|s| s.history.as_slice()).unwrap_or(&[]);
        export::render(history, format)
    }

    /// Drop sessions not touched since `cutoff`. Returns the evicted ids.
    pub fn evict_older_than(&self, cutoff: DateTime<Utc>) -> Vec<String> {
        let mut map = self.write();
        let expired: Vec<String> = map
            .values()
            .filter(|s| s.updated_at < cutoff)
            .map(|s| s.id.clone())
            .collect();
        for id in &expired {
            map.remove(id);
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "idle sessions evicted");
        }
        expired
    }

    /// Drop sessions idle for longer than `max_idle`.
    pub fn evict_idle(&self, max_idle: Duration) -> Vec<String> {
        self.evict_older_than(Utc::now() - max_idle)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

fn duplicate(session_id: &str, message_id: &str) -> ChatError {
    ChatError::DuplicateMessageId {
        session_id: session_id.to_string(),
        message_id: message_id.to_string(),
    }
}
