use chat_core::ChatConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Open key/value bag attached to a session.
pub type SessionContext = Map<String, Value>;

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Reserved; never produced by the streaming protocol.
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// New message with a generated id.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self::with_id(format!("msg_{}", Uuid::new_v4().simple()), role, content)
    }

    pub fn with_id(id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_id(id, Role::User, content)
    }

    pub fn assistant(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_id(id, Role::Assistant, content)
    }

    /// Id of the assistant message answering this one.
    pub fn reply_id(&self) -> String {
        reply_id_for(&self.id)
    }
}

pub fn reply_id_for(message_id: &str) -> String {
    format!("{message_id}-a")
}

/// One conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub config: ChatConfig,
    pub history: Vec<Message>,
    pub context: SessionContext,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Reply ids of turns still streaming.
    #[serde(skip)]
    pub(crate) pending_replies: HashSet<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, config: ChatConfig) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), user_id, config)
    }

    pub fn with_id(id: impl Into<String>, user_id: impl Into<String>, config: ChatConfig) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            config,
            history: Vec::new(),
            context: SessionContext::new(),
            created_at: now,
            updated_at: now,
            pending_replies: HashSet::new(),
        }
    }

    pub fn contains_message(&self, message_id: &str) -> bool {
        self.history.iter().any(|m| m.id == message_id)
    }

    /// True if `id` is in history or reserved by an in-flight reply.
    pub fn is_id_taken(&self, id: &str) -> bool {
        self.pending_replies.contains(id) || self.contains_message(id)
    }

    /// Append without checks. Callers own the uniqueness of `message.id`.
    pub(crate) fn push(&mut self, message: Message) {
        self.history.push(message);
        self.updated_at = Utc::now();
    }

    /// Keyed overwrite; keys absent from `partial` are kept.
    pub fn merge_context(&mut self, partial: SessionContext) {
        for (key, value) in partial {
            self.context.insert(key, value);
        }
        self.updated_at = Utc::now();
    }

    /// The last `limit` messages, oldest first.
    pub fn recent(&self, limit: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(limit);
        &self.history[start..]
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Session(user={}, id={}, model={}, messages={})",
            self.user_id,
            self.id,
            self.config.model,
            self.history.len()
        )
    }
}
