//! Bounded FIFO store of the most recent chat messages.

use crate::message::Message;
use std::collections::VecDeque;

/// Number of messages retained.
pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Default, Clone)]
pub struct MessageBuffer {
    messages: VecDeque<Message>,
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends at the tail and evicts from the head while over [`HISTORY_LIMIT`].
    pub fn append(&mut self, message: Message) {
        self.messages.push_back(message);
        while self.messages.len() > HISTORY_LIMIT {
            self.messages.pop_front();
        }
    }

    /// A snapshot of the contents, oldest first.
    pub fn list(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
