//! History export: lossless JSON and one-way markdown.

use crate::session::Message;
use chat_core::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl FromStr for ExportFormat {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(ChatError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
        }
    }
}

pub fn render(history: &[Message], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(history),
        ExportFormat::Markdown => Ok(to_markdown(history)),
    }
}

/// Pretty-printed JSON array, two-space indent.
pub fn to_json(history: &[Message]) -> Result<String> {
    Ok(serde_json::to_string_pretty(history)?)
}

/// `**<role>:** <content>` per message, newline separated.
pub fn to_markdown(history: &[Message]) -> String {
    history
        .iter()
        .map(|m| format!("**{}:** {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a JSON export back into messages.
pub fn from_json(text: &str) -> Result<Vec<Message>> {
    Ok(serde_json::from_str(text)?)
}
