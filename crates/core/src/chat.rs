//! Chat Service
//!
//! Both ingress paths funnel through [`ChatService`]: the message is written
//! to the shared [`MessageBuffer`], passed through the [`BroadcastGuard`] and
//! fanned out, and, if it was broadcast, handed to the [`ReplyGenerator`] on a
//! background task whose reply takes the same append-and-emit path.

use crate::{
    broadcast::BroadcastSink,
    buffer::MessageBuffer,
    message::{BroadcastGuard, Message},
    reply::{ReplyGenerator, ai_message, is_ai_message},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{Instrument, debug, error, info};

/// Shared chat state. Cloning is cheap and every clone sees the same buffer.
#[derive(Clone)]
pub struct ChatService {
    inner: Arc<Inner>,
}

struct Inner {
    buffer: Mutex<MessageBuffer>,
    sink: Arc<dyn BroadcastSink>,
    replies: Option<Arc<dyn ReplyGenerator>>,
    guard: BroadcastGuard,
}

impl ChatService {
    /// Creates a service with an empty history.
    ///
    /// # Arguments
    ///
    /// * `sink` - Where accepted messages are fanned out.
    /// * `guard` - The check a message must pass before it is fanned out.
    /// * `replies` - Generator for AI follow-ups; `None` disables them.
    pub fn new(
        sink: Arc<dyn BroadcastSink>,
        guard: BroadcastGuard,
        replies: Option<Arc<dyn ReplyGenerator>>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                buffer: Mutex::new(MessageBuffer::new()),
                sink,
                replies,
                guard,
            }),
        }
    }

    pub fn guard(&self) -> BroadcastGuard {
        self.inner.guard
    }

    /// The current history, oldest first.
    pub async fn list_messages(&self) -> Vec<Message> {
        self.inner.buffer.lock().await.list()
    }

    /// The request/response write path.
    ///
    /// The message is stored without validation and returned unchanged. Only
    /// the broadcast guard keeps an incomplete message from reaching listeners.
    pub async fn post_message(&self, message: Message) -> Message {
        info!(
            username = message.username(),
            "Message from {}: {}",
            message.username(),
            message.text()
        );
        if self.store_and_emit(message.clone()).await {
            self.spawn_reply(&message);
        }
        message
    }

    /// The socket write path. Incomplete messages are dropped without being
    /// stored. Returns whether the message was accepted.
    pub async fn send_message(&self, message: Message) -> bool {
        if !message.is_complete() {
            debug!(?message, "Dropping incomplete message");
            return false;
        }

        info!(
            username = message.username(),
            "Message from {}: {}",
            message.username(),
            message.text()
        );
        if self.store_and_emit(message.clone()).await {
            self.spawn_reply(&message);
        }
        true
    }

    /// Fans `message` out if it passes the guard. Returns whether it was sent.
    pub fn emit(&self, message: &Message) -> bool {
        if !self.inner.guard.permits(message) {
            debug!(id = message.id(), "Message failed broadcast guard; not emitting");
            return false;
        }
        self.inner.sink.emit(message);
        true
    }

    /// Generates a reply to `message`, stores it and broadcasts it.
    pub async fn respond_to(&self, message: &Message) -> Result<Message> {
        let generator = self
            .inner
            .replies
            .as_ref()
            .context("No reply generator configured")?;

        let text = generator
            .generate(message.text())
            .await
            .with_context(|| format!("Failed to generate reply to message '{}'", message.id()))?;

        let reply = ai_message(text);
        self.store_and_emit(reply.clone()).await;
        Ok(reply)
    }

    /// Runs [`Self::respond_to`] on a background task.
    ///
    /// Returns `None` when no generator is configured, when the message has no
    /// text, or when the message is itself an AI reply. Failures are logged by
    /// the task and never reported back.
    pub fn spawn_reply(&self, message: &Message) -> Option<JoinHandle<()>> {
        self.inner.replies.as_ref()?;
        if message.text().is_empty() || is_ai_message(message) {
            return None;
        }

        let service = self.clone();
        let message = message.clone();
        let span = tracing::info_span!("ai_reply", message_id = message.id());
        Some(tokio::spawn(
            async move {
                match service.respond_to(&message).await {
                    Ok(reply) => info!(reply_id = reply.id(), "AI reply broadcast"),
                    Err(e) => error!(error = ?e, "AI reply failed"),
                }
            }
            .instrument(span),
        ))
    }

    /// Appends and emits under the buffer lock, so broadcast order matches
    /// history order. Returns whether the message was emitted.
    async fn store_and_emit(&self, message: Message) -> bool {
        let mut buffer = self.inner.buffer.lock().await;
        let emitted = self.emit(&message);
        buffer.append(message);
        emitted
    }
}
