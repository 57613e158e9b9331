//! Effects produced by state transitions

use crate::conversation::Message;
use crate::resolver::ResolveRequest;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the resolver in the background and report back with `ReplyReady`
    ResolveReply(ResolveRequest),

    /// Cancel any live inactivity timer and start a new one for `epoch`
    ArmWatchdog { epoch: u64 },

    /// Cancel the inactivity timer
    DisarmWatchdog,

    /// Cancel the in-flight resolver call, if any
    AbortReply,

    /// Publish the new state to observers
    PublishState,

    /// Notify connected clients of an appended message
    NotifyMessage { message: Message },

    /// Notify connected clients that the pending reply has been delivered
    NotifyReplyDone,
}

impl Effect {
    pub fn notify_message(message: Message) -> Self {
        Effect::NotifyMessage { message }
    }
}
