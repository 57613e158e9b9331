//! Runtime for executing conversation sessions
//!
//! Each session runs its own event loop; the manager creates sessions and
//! routes events and subscriptions to them. A session's loop ends once the
//! manager evicts it and the last handle is dropped.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::conversation::{Message, Topic};
use crate::reference_data::ReferenceData;
use crate::resolver::ResponseResolver;
use crate::state_machine::{Event, SessionConfig, SessionContext, SessionState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch, RwLock};

/// Runtime wired to the configured generation provider
pub type ProductionRuntime = SessionRuntime<dyn LlmClient>;

/// Read-only view of a session for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub transcript: Vec<Message>,
    pub topic: Topic,
    pub chat_active: bool,
    /// Input affordances should be disabled while true
    pub awaiting_response: bool,
    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn from_state(session_id: &str, state: &SessionState) -> Self {
        Self {
            session_id: session_id.to_string(),
            transcript: state.transcript.clone(),
            topic: state.topic,
            chat_active: state.chat_active,
            awaiting_response: state.is_awaiting_reply(),
            updated_at: Utc::now(),
        }
    }
}

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum SseEvent {
    Init { snapshot: SessionSnapshot },
    Message { message: Message },
    StateChange { snapshot: SessionSnapshot },
    ReplyDone,
    Error { message: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Session {0} is no longer running")]
    Closed(String),
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub session_id: String,
    pub event_tx: mpsc::Sender<Event>,
    pub broadcast_tx: broadcast::Sender<SseEvent>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Latest published state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// No subscribers, no reply in flight, and no state change for `idle`
    fn is_idle(&self, idle: Duration, now: DateTime<Utc>) -> bool {
        if self.broadcast_tx.receiver_count() > 0 {
            return false;
        }
        let snapshot = self.snapshot_rx.borrow();
        let quiet = now
            .signed_duration_since(snapshot.updated_at)
            .to_std()
            .unwrap_or_default();
        !snapshot.awaiting_response && quiet >= idle
    }
}

/// Manager for all session runtimes
pub struct SessionManager {
    llm: Arc<dyn LlmClient>,
    reference: Arc<ReferenceData>,
    config: SessionConfig,
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionManager {
    pub fn new(llm: Arc<dyn LlmClient>, reference: Arc<ReferenceData>, config: SessionConfig) -> Self {
        Self {
            llm,
            reference,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a fresh session with its own runtime task
    pub async fn create_session(&self) -> SessionHandle {
        let session_id = uuid::Uuid::new_v4().to_string();
        let context = SessionContext::new(&session_id, self.config);
        let resolver = ResponseResolver::new(
            self.llm.clone(),
            self.reference.clone(),
            self.config.style,
            self.config.reply_timeout,
        )
        .with_max_output_tokens(self.config.max_output_tokens);

        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        let (snapshot_tx, snapshot_rx) =
            watch::channel(SessionSnapshot::from_state(&session_id, &SessionState::new()));

        let runtime: ProductionRuntime = SessionRuntime::new(
            context,
            resolver,
            event_rx,
            &event_tx,
            broadcast_tx.clone(),
            snapshot_tx,
        );
        tokio::spawn(runtime.run());

        let handle = SessionHandle {
            session_id: session_id.clone(),
            event_tx,
            broadcast_tx,
            snapshot_rx,
        };
        let active = {
            let mut sessions = self.sessions.write().await;
            sessions.insert(session_id.clone(), handle.clone());
            sessions.len()
        };

        tracing::info!(session_id = %session_id, active, "Created session");
        handle
    }

    pub async fn get(&self, session_id: &str) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Send an event to a session's runtime
    pub async fn send_event(&self, session_id: &str, event: Event) -> Result<(), SessionError> {
        let handle = self.get(session_id).await?;
        handle
            .event_tx
            .send(event)
            .await
            .map_err(|_| SessionError::Closed(session_id.to_string()))
    }

    /// Queue a user turn, minting the id of the new user message
    pub async fn submit_turn(
        &self,
        session_id: &str,
        text: String,
        topic: Topic,
        first_turn: bool,
    ) -> Result<String, SessionError> {
        let message_id = uuid::Uuid::new_v4().to_string();
        self.send_event(
            session_id,
            Event::SubmitTurn {
                text,
                topic,
                first_turn,
                message_id: message_id.clone(),
            },
        )
        .await?;
        Ok(message_id)
    }

    /// Subscribe to a session's events, with the snapshot to start from
    pub async fn subscribe(
        &self,
        session_id: &str,
    ) -> Result<(SessionSnapshot, broadcast::Receiver<SseEvent>), SessionError> {
        let handle = self.get(session_id).await?;
        // Subscribe before reading the snapshot so no change falls in between
        let rx = handle.broadcast_tx.subscribe();
        Ok((handle.snapshot(), rx))
    }

    /// Drop idle sessions from the map, returning how many were removed
    pub async fn evict_idle(&self, idle: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|session_id, handle| {
            let evict = handle.is_idle(idle, now);
            if evict {
                tracing::info!(session_id = %session_id, "Evicting idle session");
            }
            !evict
        });
        before - sessions.len()
    }

    /// Sweep idle sessions periodically until the manager is dropped
    pub fn spawn_eviction(self: &Arc<Self>, idle: Duration) {
        let manager = Arc::downgrade(self);
        let period = (idle / 4).max(Duration::from_secs(1));

        tokio::spawn(async move {
            tracing::info!(idle_secs = idle.as_secs(), "Session eviction enabled");
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                let evicted = manager.evict_idle(idle).await;
                if evicted > 0 {
                    let active = manager.sessions.read().await.len();
                    tracing::info!(evicted, active, "Evicted idle sessions");
                }
            }
        });
    }
}
