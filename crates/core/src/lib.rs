//! Core of the chat relay: the message model, the bounded history buffer,
//! broadcast fan-out and AI reply generation, tied together by
//! [`chat::ChatService`].

pub mod broadcast;
pub mod buffer;
pub mod chat;
pub mod message;
pub mod reply;

pub use broadcast::{BroadcastSink, ChannelBroadcaster};
pub use buffer::{HISTORY_LIMIT, MessageBuffer};
pub use chat::ChatService;
pub use message::{BroadcastGuard, Message};
pub use reply::ReplyGenerator;
