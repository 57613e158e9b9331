//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! new state and effects, with no I/O.

use super::{Effect, Event, SessionContext, SessionState, TurnPhase};
use crate::conversation::{
    greeting_message, initial_options, Message, Topic, INACTIVITY_NOTICE,
};
use crate::resolver::ResolveRequest;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    fn unchanged(state: &SessionState) -> Self {
        Self::new(state.clone())
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Message text is empty")]
    EmptyInput,
    #[error("Autobot is still answering the previous message")]
    AwaitingResponse,
}

pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::SubmitTurn {
            text,
            topic,
            first_turn,
            message_id,
        } => submit_turn(state, context, &text, topic, first_turn, message_id),

        Event::ReplyReady {
            turn_id,
            text,
            message_id,
        } => Ok(reply_ready(state, &turn_id, text, message_id)),

        Event::InactivityTimeout { epoch, message_id } => {
            Ok(inactivity_timeout(state, epoch, message_id))
        }

        Event::Reset => {
            let new_state = SessionState {
                watchdog_epoch: state.watchdog_epoch + 1,
                ..SessionState::new()
            };
            Ok(TransitionResult::new(new_state).with_effects([
                Effect::AbortReply,
                Effect::DisarmWatchdog,
                Effect::PublishState,
            ]))
        }
    }
}

fn submit_turn(
    state: &SessionState,
    context: &SessionContext,
    text: &str,
    topic: Topic,
    first_turn: bool,
    message_id: String,
) -> Result<TransitionResult, TransitionError> {
    if text.trim().is_empty() {
        return Err(TransitionError::EmptyInput);
    }
    if state.is_awaiting_reply() {
        return Err(TransitionError::AwaitingResponse);
    }

    let mut new_state = state.clone();
    let mut effects = Vec::with_capacity(4);

    new_state.chat_active = true;
    if context.watchdog_enabled() {
        new_state.watchdog_epoch += 1;
        effects.push(Effect::ArmWatchdog {
            epoch: new_state.watchdog_epoch,
        });
    }

    // The welcome view always starts from the greeting, whatever came before
    if first_turn {
        new_state.transcript = vec![greeting_message()];
        new_state.intro_delivered = false;
    }

    let history: Vec<Message> = new_state
        .transcript
        .iter()
        .map(Message::without_options)
        .collect();
    let user_message = Message::user(message_id.clone(), text);

    new_state.transcript.clone_from(&history);
    new_state.transcript.push(user_message.clone());
    new_state.topic = topic;
    new_state.phase = TurnPhase::AwaitingReply {
        turn_id: message_id.clone(),
        topic,
    };

    let deliver_intro = !new_state.intro_delivered;
    new_state.intro_delivered = true;

    effects.push(Effect::notify_message(user_message.clone()));
    effects.push(Effect::PublishState);
    effects.push(Effect::ResolveReply(ResolveRequest {
        turn_id: message_id,
        history,
        user_message,
        topic,
        deliver_intro,
    }));

    Ok(TransitionResult::new(new_state).with_effects(effects))
}

fn reply_ready(
    state: &SessionState,
    turn_id: &str,
    text: String,
    message_id: String,
) -> TransitionResult {
    let TurnPhase::AwaitingReply {
        turn_id: pending,
        topic,
    } = &state.phase
    else {
        tracing::debug!(turn_id, "Ignoring reply with no turn pending");
        return TransitionResult::unchanged(state);
    };
    if pending != turn_id {
        tracing::debug!(turn_id, pending = %pending, "Ignoring stale reply");
        return TransitionResult::unchanged(state);
    }

    let mut reply = Message::bot(message_id, text);
    if *topic == Topic::Custom {
        reply = reply.with_options(initial_options());
    }

    let mut new_state = state.clone();
    new_state.transcript.push(reply.clone());
    new_state.phase = TurnPhase::Idle;

    TransitionResult::new(new_state).with_effects([
        Effect::notify_message(reply),
        Effect::PublishState,
        Effect::NotifyReplyDone,
    ])
}

fn inactivity_timeout(state: &SessionState, epoch: u64, message_id: String) -> TransitionResult {
    if epoch != state.watchdog_epoch || !state.chat_active {
        return TransitionResult::unchanged(state);
    }

    // The user is waiting on us; give the pending reply a full period
    if state.is_awaiting_reply() {
        let mut new_state = state.clone();
        new_state.watchdog_epoch += 1;
        let epoch = new_state.watchdog_epoch;
        return TransitionResult::new(new_state).with_effects([Effect::ArmWatchdog { epoch }]);
    }

    let notice = Message::bot(message_id, INACTIVITY_NOTICE);
    let mut new_state = state.clone();
    new_state.transcript = state
        .transcript
        .iter()
        .map(Message::without_options)
        .collect();
    new_state.transcript.push(notice.clone());
    new_state.chat_active = false;

    TransitionResult::new(new_state)
        .with_effects([Effect::notify_message(notice), Effect::PublishState])
}
