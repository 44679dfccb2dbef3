//! Shared types for the command-center chat core: errors, model selection
//! and application configuration.

pub mod config;
pub mod error;
pub mod model;

pub use config::AppConfig;
pub use error::{ChatError, Result};
pub use model::{ChatConfig, ChatModel};

#[cfg(test)]
mod tests;
