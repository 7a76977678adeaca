use serde::{Deserialize, Serialize};

use crate::session::{ChatMessage, MessageRole};

/// Append-only chat transcript.
///
/// Starts with one assistant greeting and only grows by whole turns (a user
/// message followed by the assistant reply), so roles always alternate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(greeting)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Appends a completed turn.
    pub(crate) fn push_turn(&mut self, user: ChatMessage, reply: ChatMessage) {
        debug_assert_eq!(user.role, MessageRole::User);
        debug_assert_eq!(reply.role, MessageRole::Assistant);
        self.messages.push(user);
        self.messages.push(reply);
    }

    /// True when no two consecutive messages share a role.
    pub fn is_alternating(&self) -> bool {
        self.messages
            .windows(2)
            .all(|pair| pair[0].role != pair[1].role)
    }
}
