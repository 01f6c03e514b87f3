//! Fan-out of accepted messages to every connected listener.

use crate::message::Message;
use tokio::sync::broadcast;
use tracing::trace;

/// Size of the fan-out channel. Slow listeners past this point lag and skip.
pub const BROADCAST_BUFFER_SIZE: usize = 256;

/// Delivers a message to all current listeners. Best-effort: no
/// acknowledgement, no retry, and no listeners is not an error.
pub trait BroadcastSink: Send + Sync {
    fn emit(&self, message: &Message);
}

/// A [`BroadcastSink`] backed by a tokio broadcast channel. Each connection
/// holds its own receiver from [`ChannelBroadcaster::subscribe`].
#[derive(Clone)]
pub struct ChannelBroadcaster {
    tx: broadcast::Sender<Message>,
}

impl ChannelBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_BUFFER_SIZE);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastSink for ChannelBroadcaster {
    fn emit(&self, message: &Message) {
        if self.tx.send(message.clone()).is_err() {
            trace!("No listeners connected; dropping broadcast");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_reaches_every_subscriber() {
        let broadcaster = ChannelBroadcaster::new();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();
        assert_eq!(broadcaster.listener_count(), 2);

        let message = Message::new("1", "a", "hi");
        broadcaster.emit(&message);

        assert_eq!(first.recv().await.unwrap(), message);
        assert_eq!(second.recv().await.unwrap(), message);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let broadcaster = ChannelBroadcaster::new();
        broadcaster.emit(&Message::new("1", "a", "hi"));
        assert_eq!(broadcaster.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_messages() {
        let broadcaster = ChannelBroadcaster::new();
        broadcaster.emit(&Message::new("1", "a", "early"));
        let mut late = broadcaster.subscribe();
        broadcaster.emit(&Message::new("2", "a", "late"));

        assert_eq!(late.recv().await.unwrap().text(), "late");
    }
}
