use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Session not found: {id}")]
    SessionNotFound { id: String },
    #[error("Duplicate message id {message_id} in session {session_id}")]
    DuplicateMessageId { session_id: String, message_id: String },
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("Unknown model: {0}")]
    UnknownModel(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;
