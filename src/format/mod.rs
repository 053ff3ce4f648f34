//! Display formatting for conversations.

use serde::Serialize;

use crate::types::{Message, Role};
use crate::util::text::ellipsize;

/// Max characters of a message shown on the chat page.
pub const DISPLAY_CHARS: usize = 500;

/// A message ready for the chat template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMessage {
    pub role: Role,
    pub content: String,
    pub is_user: bool,
}

impl From<&Message> for DisplayMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: ellipsize(&message.content, DISPLAY_CHARS),
            is_user: message.is_user(),
        }
    }
}

/// Map each message to its display form, preserving order.
pub fn format_conversation(conversation: &[Message]) -> Vec<DisplayMessage> {
    conversation.iter().map(DisplayMessage::from).collect()
}
