//! Streaming message protocol: a user turn goes into history, the reply comes
//! back as a paced sequence of fragments, and the completed reply is appended
//! once the sequence is exhausted.

pub mod backend;
pub mod protocol;
pub mod service;
pub mod tokens;

pub use backend::{EchoBackend, FragmentStream, ReplyBackend, ReplyRequest, WordBackend};
pub use service::ChatService;
pub use tokens::Granularity;
