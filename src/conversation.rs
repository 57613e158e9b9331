//! Conversation data model
//!
//! Topics, transcript messages, follow-up options and the static catalog of
//! texts the assistant ships with.

mod catalog;
mod message;
mod style;
mod topic;

pub use catalog::{
    canned_response, greeting_message, initial_options, topic_label, APOLOGY_TEXT,
    INACTIVITY_NOTICE,
};
pub use message::{ChatOption, Message, Sender};
pub use style::ResponseStyle;
pub use topic::Topic;
