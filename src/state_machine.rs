//! Conversation orchestrator
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! events in, new state plus effects out. The runtime performs the effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use state::{SessionConfig, SessionContext, SessionState, TurnPhase};
pub use transition::{transition, TransitionError, TransitionResult};
