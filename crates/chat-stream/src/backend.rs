//! Reply sources.
//!
//! A backend turns a user turn into a fragment stream. Pacing and history
//! bookkeeping are the protocol's job, not the backend's.

use crate::tokens::{split, Granularity};
use async_trait::async_trait;
use chat_core::config::BackendKind;
use chat_core::{ChatModel, Result};
use chat_session::Message;
use futures::stream::{self, Stream};
use std::pin::Pin;
use std::sync::Arc;

pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Everything a backend may look at to produce a reply.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub session_id: String,
    pub model: ChatModel,
    /// History up to and including `message`.
    pub history: Vec<Message>,
    pub message: Message,
}

#[async_trait]
pub trait ReplyBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn reply(&self, request: &ReplyRequest) -> Result<FragmentStream>;
}

fn fragments(text: &str, granularity: Granularity) -> FragmentStream {
    Box::pin(stream::iter(split(text, granularity).into_iter().map(Ok)))
}

/// Replies `Echo: <content>`, one character at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoBackend;

impl EchoBackend {
    pub fn reply_text(content: &str) -> String {
        format!("Echo: {content}")
    }
}

#[async_trait]
impl ReplyBackend for EchoBackend {
    fn name(&self) -> &str {
        "echo"
    }

    async fn reply(&self, request: &ReplyRequest) -> Result<FragmentStream> {
        Ok(fragments(&Self::reply_text(&request.message.content), Granularity::Char))
    }
}

/// Replies `Response to: <content>`, one word at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordBackend;

impl WordBackend {
    pub fn reply_text(content: &str) -> String {
        format!("Response to: {content}")
    }
}

#[async_trait]
impl ReplyBackend for WordBackend {
    fn name(&self) -> &str {
        "words"
    }

    async fn reply(&self, request: &ReplyRequest) -> Result<FragmentStream> {
        Ok(fragments(&Self::reply_text(&request.message.content), Granularity::Word))
    }
}

pub fn backend_for(kind: BackendKind) -> Arc<dyn ReplyBackend> {
    match kind {
        BackendKind::Echo => Arc::new(EchoBackend),
        BackendKind::Words => Arc::new(WordBackend),
    }
}
