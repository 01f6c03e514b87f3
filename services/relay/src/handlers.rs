//! Axum Handlers for the REST API
//!
//! The request/response ingress: list the recent history, or post a message
//! that is stored, broadcast and answered like a socket `sendMessage`.

use axum::{extract::State, response::Json};
use relay_core::Message;
use std::sync::Arc;

use crate::state::AppState;

/// List the most recent messages, oldest first.
#[utoipa::path(
    get,
    path = "/chat/messages",
    responses(
        (status = 200, description = "Recent messages, oldest first", body = [Message])
    )
)]
pub async fn list_messages(State(state): State<Arc<AppState>>) -> Json<Vec<Message>> {
    Json(state.chat.list_messages().await)
}

/// Post a chat message.
///
/// The message is stored as sent and echoed back. It is broadcast to socket
/// clients only if it passes the broadcast guard.
#[utoipa::path(
    post,
    path = "/chat/message",
    request_body = Message,
    responses(
        (status = 200, description = "The accepted message", body = Message)
    )
)]
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(message): Json<Message>,
) -> Json<Message> {
    Json(state.chat.post_message(message).await)
}
