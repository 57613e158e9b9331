//! API request and response types

use crate::conversation::{ChatOption, Topic};
use crate::runtime::SessionSnapshot;
use serde::{Deserialize, Serialize};

/// Request to submit a user turn
#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub text: String,
    /// Option topic the turn was submitted for; free text is an open question
    #[serde(default = "default_topic")]
    pub topic: Topic,
    /// Submitted from the welcome view
    #[serde(default)]
    pub first_turn: bool,
}

fn default_topic() -> Topic {
    Topic::Custom
}

/// Response for turn submission
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub queued: bool,
}

/// Response for session creation
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub session: SessionSnapshot,
}

/// Response with a single session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionSnapshot,
}

/// Welcome menu
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub greeting: String,
    pub options: Vec<ChatOption>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
