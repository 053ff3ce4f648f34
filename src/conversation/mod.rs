//! Per-session conversation history.

use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Length that triggers trimming.
pub const MAX_MESSAGES: usize = 20;
/// Number of most recent messages kept after trimming.
pub const TRIM_TO: usize = 16;

/// Ordered, length-capped list of messages owned by one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Keep only the most recent [`TRIM_TO`] messages once the list exceeds
    /// [`MAX_MESSAGES`]. Returns the number of messages dropped.
    pub fn enforce_cap(&mut self) -> usize {
        if self.messages.len() <= MAX_MESSAGES {
            return 0;
        }
        let dropped = self.messages.len() - TRIM_TO;
        self.messages.drain(..dropped);
        dropped
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}
