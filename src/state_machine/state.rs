//! Session state types

use crate::conversation::{Message, ResponseStyle, Topic};
use serde::Serialize;
use std::time::Duration;

/// Per-session behavior knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Inactivity watchdog duration; `None` disables the watchdog
    pub inactivity_timeout: Option<Duration>,
    /// Upper bound on a single generation call
    pub reply_timeout: Duration,
    pub style: ResponseStyle,
    /// Output cap passed to the provider; `None` leaves the provider default
    pub max_output_tokens: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: Some(Duration::from_secs(300)),
            reply_timeout: Duration::from_secs(60),
            style: ResponseStyle::default(),
            max_output_tokens: None,
        }
    }
}

/// Immutable context for a session
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub config: SessionConfig,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, config: SessionConfig) -> Self {
        Self {
            session_id: session_id.into(),
            config,
        }
    }

    pub fn watchdog_enabled(&self) -> bool {
        self.config.inactivity_timeout.is_some()
    }
}

/// Whether a reply is being produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    Idle,
    /// One resolver call in flight for the user message `turn_id`
    AwaitingReply { turn_id: String, topic: Topic },
}

/// Complete orchestrator state for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct SessionState {
    /// Append-only, chronological
    pub transcript: Vec<Message>,
    pub topic: Topic,
    /// False until the first accepted turn; cleared again by the watchdog
    pub chat_active: bool,
    pub phase: TurnPhase,
    /// A canned intro was already shown in this conversation
    pub intro_delivered: bool,
    /// Bumped on every accepted turn and on reset; timers carry the epoch they were armed for
    pub watchdog_epoch: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.phase, TurnPhase::AwaitingReply { .. })
    }

    /// Id of the user message waiting for its reply
    pub fn pending_turn(&self) -> Option<&str> {
        match &self.phase {
            TurnPhase::AwaitingReply { turn_id, .. } => Some(turn_id),
            TurnPhase::Idle => None,
        }
    }
}
