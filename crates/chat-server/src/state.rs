//! Application state shared across all handlers.

use chat_core::AppConfig;
use chat_stream::ChatService;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone, Debug)]
pub struct AppState {
    pub chat: ChatService,
    pub config: Arc<AppConfig>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            chat: ChatService::from_config(&config.streaming),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    pub fn with_service(chat: ChatService, config: AppConfig) -> Self {
        Self { chat, config: Arc::new(config), start_time: Instant::now() }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
