//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use bonechat_chat::SessionRegistry;
use bonechat_core::config::BonechatConfig;

/// Shared application state, cheap to clone into each handler.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<BonechatConfig>,
    /// Live chat sessions.
    pub sessions: Arc<SessionRegistry>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: BonechatConfig, sessions: SessionRegistry) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            start_time: Instant::now(),
        }
    }
}
