//! Chat sessions: message history, mergeable context, the in-memory store and
//! history export.

pub mod export;
pub mod session;
pub mod store;

pub use export::ExportFormat;
pub use session::*;
pub use store::SessionStore;
