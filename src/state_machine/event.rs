//! Events that can occur in a session

use crate::conversation::Topic;

/// Events that trigger state transitions.
///
/// Message ids are minted by the caller so the transition stays pure.
#[derive(Debug, Clone)]
pub enum Event {
    /// User clicked an option or submitted the input form
    SubmitTurn {
        text: String,
        topic: Topic,
        /// Submitted from the welcome view: reseed the transcript with the greeting
        first_turn: bool,
        message_id: String,
    },

    /// Resolver finished the reply for `turn_id`
    ReplyReady {
        turn_id: String,
        text: String,
        message_id: String,
    },

    /// Watchdog armed for `epoch` expired
    InactivityTimeout { epoch: u64, message_id: String },

    /// Drop all conversation state (reload)
    Reset,
}
