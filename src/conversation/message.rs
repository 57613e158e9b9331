//! Transcript messages

use super::Topic;
use serde::{Deserialize, Serialize};

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// Shortcut offered to the user for the next turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatOption {
    pub text: String,
    pub topic: Topic,
}

impl ChatOption {
    pub fn new(text: impl Into<String>, topic: Topic) -> Self {
        Self {
            text: text.into(),
            topic,
        }
    }
}

/// One turn in the visible transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// Follow-up options; empty once superseded by a later turn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChatOption>,
}

impl Message {
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: Sender::User,
            options: Vec::new(),
        }
    }

    pub fn bot(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: Sender::Bot,
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<ChatOption>) -> Self {
        self.options = options;
        self
    }

    /// Copy of this message with its options stripped
    #[must_use]
    pub fn without_options(&self) -> Self {
        Self {
            options: Vec::new(),
            ..self.clone()
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    #[cfg(test)]
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}
