//! One user turn, streamed.
//!
//! The user message is appended before the stream is returned. The assistant
//! message is appended only when the stream is polled to exhaustion; a stream
//! dropped early, or one that ends on a backend error, leaves no reply in
//! history. While a turn is open its reply id is reserved in the store, so no
//! other message can claim it.

use crate::backend::{FragmentStream, ReplyBackend, ReplyRequest};
use crate::tokens::paced;
use chat_core::{ChatError, Result};
use chat_session::{Message, SessionStore};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

enum Phase {
    Pending(ReplyRequest),
    Streaming(FragmentStream),
    Done,
}

struct Turn {
    store: Arc<SessionStore>,
    backend: Arc<dyn ReplyBackend>,
    delay: Duration,
    session_id: String,
    reply_id: String,
    reply: String,
    fragments: usize,
    phase: Phase,
    completed: bool,
}

impl Turn {
    /// Record the assistant message. An error here is the last item the
    /// caller sees.
    fn complete(&mut self) -> Result<()> {
        self.completed = true;
        let message = Message::assistant(self.reply_id.clone(), std::mem::take(&mut self.reply));
        match self.store.finish_turn(&self.session_id, message) {
            Ok(true) => {
                info!(
                    session_id = %self.session_id,
                    message_id = %self.reply_id,
                    fragments = self.fragments,
                    "reply completed"
                );
                Ok(())
            }
            Ok(false) => {
                debug!(session_id = %self.session_id, "session cleared before reply completed");
                Err(ChatError::SessionNotFound {
                    id: self.session_id.clone(),
                })
            }
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "reply not recorded");
                Err(e)
            }
        }
    }
}

impl Drop for Turn {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        self.store.abandon_turn(&self.session_id, &self.reply_id);
        if self.fragments > 0 {
            debug!(
                session_id = %self.session_id,
                message_id = %self.reply_id,
                fragments = self.fragments,
                "reply stream ended without completion"
            );
        }
    }
}

/// Open a turn on `session_id` and return its reply stream.
///
/// Fails before touching history when the session does not exist
/// (`SessionNotFound`) or when the message id, or its derived reply id, is
/// already in history or reserved by an in-flight turn (`DuplicateMessageId`).
pub fn start_turn(
    store: Arc<SessionStore>,
    backend: Arc<dyn ReplyBackend>,
    delay: Duration,
    session_id: &str,
    message: Message,
) -> Result<FragmentStream> {
    let reply_id = message.reply_id();
    let session = store
        .begin_turn(session_id, message.clone())?
        .ok_or_else(|| ChatError::SessionNotFound {
            id: session_id.to_string(),
        })?;

    let request = ReplyRequest {
        session_id: session.id.clone(),
        model: session.config.model,
        history: session.history,
        message,
    };
    debug!(session_id, backend = backend.name(), model = %request.model, "reply started");

    let turn = Turn {
        store,
        backend,
        delay,
        session_id: session.id,
        reply_id,
        reply: String::new(),
        fragments: 0,
        phase: Phase::Pending(request),
        completed: false,
    };

    Ok(stream::unfold(turn, |mut turn| async move {
        loop {
            match std::mem::replace(&mut turn.phase, Phase::Done) {
                Phase::Pending(request) => {
                    let started = turn.backend.reply(&request).await;
                    match started {
                        Ok(fragments) => {
                            turn.phase = Phase::Streaming(paced(fragments, turn.delay).boxed());
                        }
                        Err(e) => {
                            warn!(session_id = %turn.session_id, error = %e, "backend failed to start reply");
                            return Some((Err(e), turn));
                        }
                    }
                }
                Phase::Streaming(mut fragments) => match fragments.next().await {
                    Some(Ok(fragment)) => {
                        turn.reply.push_str(&fragment);
                        turn.fragments += 1;
                        turn.phase = Phase::Streaming(fragments);
                        return Some((Ok(fragment), turn));
                    }
                    Some(Err(e)) => {
                        warn!(session_id = %turn.session_id, error = %e, "backend failed mid-reply");
                        return Some((Err(e), turn));
                    }
                    None => {
                        return match turn.complete() {
                            Ok(()) => None,
                            Err(e) => Some((Err(e), turn)),
                        };
                    }
                },
                Phase::Done => return None,
            }
        }
    })
    .boxed())
}

/// Submit `message` to `session_id` and stream the reply.
///
/// An unknown session yields an empty stream and touches nothing. Any other
/// refusal from [`start_turn`] is yielded as a single error item.
pub fn send_message(
    store: Arc<SessionStore>,
    backend: Arc<dyn ReplyBackend>,
    delay: Duration,
    session_id: &str,
    message: Message,
) -> FragmentStream {
    match start_turn(store, backend, delay, session_id, message) {
        Ok(fragments) => fragments,
        Err(ChatError::SessionNotFound { .. }) => {
            debug!(session_id, "send to unknown session ignored");
            stream::empty().boxed()
        }
        Err(e) => stream::once(async move { Err::<String, _>(e) }).boxed(),
    }
}
