//! Defines the WebSocket event protocol between chat clients and the server.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use relay_core::Message;
use serde::{Deserialize, Serialize};

/// Events sent from a client to the server.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Post a message to the room.
    SendMessage(Message),
    /// Ask for the recent history; answered privately with `messagesHistory`.
    GetMessages,
}

/// Events sent from the server to clients.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A message broadcast to every connection.
    NewMessage(Message),
    /// The recent history, sent only to the connection that asked.
    MessagesHistory(Vec<Message>),
}
