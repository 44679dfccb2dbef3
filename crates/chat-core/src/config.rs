use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub streaming: StreamingConfig,
    pub sessions: SessionsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which reply source feeds the fragment stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// `Echo: <content>`, one fragment per character.
    #[default]
    Echo,
    /// `Response to: <content>`, one fragment per word.
    Words,
}

impl FromStr for BackendKind {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "echo" => Ok(BackendKind::Echo),
            "words" => Ok(BackendKind::Words),
            other => Err(ChatError::InvalidConfig(format!("unknown backend '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Pause before each fragment is released.
    pub fragment_delay_ms: u64,
    pub backend: BackendKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Sessions idle longer than this are evicted. `None` keeps them forever.
    pub idle_ttl_secs: Option<u64>,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`.
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            fragment_delay_ms: 20,
            backend: BackendKind::Echo,
        }
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: None,
            sweep_interval_secs: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl AppConfig {
    /// Default location: `<config dir>/command-center/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("command-center").join("config.json"))
    }

    /// Read a JSON config file. Missing keys fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Resolve the effective configuration: explicit file, else the default
    /// path if it exists, else built-in defaults; then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => {
                    tracing::debug!(path = %p.display(), "loading config from default path");
                    Self::from_file(&p)?
                }
                None => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CHAT_*` overrides from the given lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("CHAT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CHAT_PORT") {
            self.server.port = parse_number("CHAT_PORT", &port)?;
        }
        if let Some(delay) = lookup("CHAT_FRAGMENT_DELAY_MS") {
            self.streaming.fragment_delay_ms = parse_number("CHAT_FRAGMENT_DELAY_MS", &delay)?;
        }
        if let Some(backend) = lookup("CHAT_BACKEND") {
            self.streaming.backend = backend.parse()?;
        }
        if let Some(ttl) = lookup("CHAT_IDLE_TTL_SECS") {
            self.sessions.idle_ttl_secs = Some(parse_number("CHAT_IDLE_TTL_SECS", &ttl)?);
        }
        if let Some(level) = lookup("CHAT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CHAT_LOG_FORMAT") {
            self.logging.format = format;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.streaming.fragment_delay_ms == 0 {
            return Err(ChatError::InvalidConfig(
                "streaming.fragment_delay_ms must be greater than zero".into(),
            ));
        }
        if self.sessions.sweep_interval_secs == 0 {
            return Err(ChatError::InvalidConfig(
                "sessions.sweep_interval_secs must be greater than zero".into(),
            ));
        }
        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(ChatError::InvalidConfig(format!("unknown log format '{other}'"))),
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ChatError::InvalidConfig(format!("{key}: '{value}' is not a valid number")))
}
