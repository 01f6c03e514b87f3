//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the chat service
//! and the broadcaster that WebSocket connections subscribe to.

use crate::config::Config;
use relay_core::{ChannelBroadcaster, ChatService, ReplyGenerator};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
    pub broadcaster: ChannelBroadcaster,
}

impl AppState {
    /// Wires a fresh broadcaster and chat service for `config`.
    ///
    /// `replies` is ignored when AI replies are switched off in the config.
    pub fn new(config: &Config, replies: Option<Arc<dyn ReplyGenerator>>) -> Self {
        let broadcaster = ChannelBroadcaster::new();
        let replies = replies.filter(|_| config.ai_replies);
        let chat = ChatService::new(
            Arc::new(broadcaster.clone()),
            config.broadcast_guard,
            replies,
        );
        Self { chat, broadcaster }
    }
}
