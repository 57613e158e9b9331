//! Conversation topics

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subject tag governing which guidance track and prompt variant applies to a turn.
///
/// The identity of a topic is its stable id (`basic_check`, `alerts`, ...).
/// Human-facing labels live in the catalog, see [`super::topic_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Initial state. Never selectable by the user.
    #[default]
    Greeting,
    BasicCheck,
    Reminders,
    Alerts,
    Tips,
    /// Free-form question typed by the user
    Custom,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Greeting,
        Topic::BasicCheck,
        Topic::Reminders,
        Topic::Alerts,
        Topic::Tips,
        Topic::Custom,
    ];

    /// Stable identifier used on the wire and in logs
    pub fn id(self) -> &'static str {
        match self {
            Topic::Greeting => "greeting",
            Topic::BasicCheck => "basic_check",
            Topic::Reminders => "reminders",
            Topic::Alerts => "alerts",
            Topic::Tips => "tips",
            Topic::Custom => "custom",
        }
    }

    /// Localized display label
    pub fn label(self) -> &'static str {
        super::topic_label(self)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| format!("unknown topic: {s}"))
    }
}
