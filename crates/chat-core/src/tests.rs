use crate::config::*;
use crate::*;
use std::collections::HashMap;

// ========== Model ==========

#[test]
fn test_model_serde_names() {
    let json = serde_json::to_string(&ChatConfig::new(ChatModel::Gpt4Turbo)).unwrap();
    assert_eq!(json, r#"{"model":"gpt-4-turbo"}"#);
    let parsed: ChatConfig = serde_json::from_str(r#"{"model":"gpt-4"}"#).unwrap();
    assert_eq!(parsed.model, ChatModel::Gpt4);
}

#[test]
fn test_model_from_str() {
    assert_eq!("gpt-4".parse::<ChatModel>().unwrap(), ChatModel::Gpt4);
    assert_eq!(" gpt-4-turbo ".parse::<ChatModel>().unwrap(), ChatModel::Gpt4Turbo);
    assert!(matches!("claude".parse::<ChatModel>(), Err(ChatError::UnknownModel(_))));
}

#[test]
fn test_model_display() {
    assert_eq!(ChatModel::Gpt4Turbo.to_string(), "gpt-4-turbo");
}

// ========== Errors ==========

#[test]
fn test_error_messages() {
    let err = ChatError::SessionNotFound { id: "s1".into() };
    assert_eq!(err.to_string(), "Session not found: s1");
    let err = ChatError::DuplicateMessageId { session_id: "s1".into(), message_id: "m1".into() };
    assert!(err.to_string().contains("m1"));
}

#[test]
fn test_error_from_serde() {
    let bad = serde_json::from_str::<ChatConfig>("{").unwrap_err();
    let err: ChatError = bad.into();
    assert!(matches!(err, ChatError::Serialization(_)));
}

// ========== Config ==========

#[test]
fn test_config_defaults() {
    let c = AppConfig::default();
    assert_eq!(c.server.port, 8080);
    assert_eq!(c.streaming.fragment_delay_ms, 20);
    assert_eq!(c.streaming.backend, BackendKind::Echo);
    assert!(c.sessions.idle_ttl_secs.is_none());
    assert!(c.validate().is_ok());
}

#[test]
fn test_config_partial_json() {
    let c: AppConfig = serde_json::from_str(r#"{"server":{"port":9000},"streaming":{"backend":"words"}}"#).unwrap();
    assert_eq!(c.server.port, 9000);
    assert_eq!(c.server.host, "0.0.0.0");
    assert_eq!(c.streaming.backend, BackendKind::Words);
    assert_eq!(c.streaming.fragment_delay_ms, 20);
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"sessions":{"idle_ttl_secs":300}}"#).unwrap();
    let c = AppConfig::from_file(&path).unwrap();
    assert_eq!(c.sessions.idle_ttl_secs, Some(300));
    assert_eq!(c.sessions.sweep_interval_secs, 60);
}

#[test]
fn test_config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::from_file(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ChatError::Io(_)));
}

#[test]
fn test_config_env_overrides() {
    let env: HashMap<&str, &str> = [
        ("CHAT_PORT", "3000"),
        ("CHAT_BACKEND", "Words"),
        ("CHAT_FRAGMENT_DELAY_MS", "5"),
        ("CHAT_IDLE_TTL_SECS", "120"),
        ("CHAT_LOG_FORMAT", "json"),
    ]
    .into_iter()
    .collect();
    let mut c = AppConfig::default();
    c.apply_overrides(|k| env.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(c.server.port, 3000);
    assert_eq!(c.streaming.backend, BackendKind::Words);
    assert_eq!(c.streaming.fragment_delay_ms, 5);
    assert_eq!(c.sessions.idle_ttl_secs, Some(120));
    assert_eq!(c.logging.format, "json");
}

#[test]
fn test_config_env_bad_number() {
    let mut c = AppConfig::default();
    let err = c
        .apply_overrides(|k| (k == "CHAT_PORT").then(|| "eighty".to_string()))
        .unwrap_err();
    assert!(matches!(err, ChatError::InvalidConfig(_)));
}

#[test]
fn test_config_rejects_zero_delay() {
    let mut c = AppConfig::default();
    c.streaming.fragment_delay_ms = 0;
    assert!(c.validate().is_err());
}

#[test]
fn test_config_rejects_unknown_log_format() {
    let mut c = AppConfig::default();
    c.logging.format = "xml".into();
    assert!(c.validate().is_err());
}
