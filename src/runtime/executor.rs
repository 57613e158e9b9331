//! Session runtime executor

use super::traits::LlmClient;
use super::{SessionSnapshot, SseEvent};

use crate::resolver::{ResolveRequest, ResponseResolver};
use crate::state_machine::{transition, Effect, Event, SessionContext, SessionState, TransitionError};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Event loop for one session: applies transitions and performs their effects
pub struct SessionRuntime<L: LlmClient + ?Sized + 'static> {
    context: SessionContext,
    state: SessionState,
    resolver: Arc<ResponseResolver<L>>,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so the loop ends once every handle to the session is dropped
    event_tx: mpsc::WeakSender<Event>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    /// Token to cancel the in-flight reply
    reply_cancel_token: Option<CancellationToken>,
    /// Token to cancel the live inactivity timer
    watchdog_cancel_token: Option<CancellationToken>,
}

impl<L: LlmClient + ?Sized + 'static> SessionRuntime<L> {
    pub fn new(
        context: SessionContext,
        resolver: ResponseResolver<L>,
        event_rx: mpsc::Receiver<Event>,
        event_tx: &mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<SseEvent>,
        snapshot_tx: watch::Sender<SessionSnapshot>,
    ) -> Self {
        Self {
            context,
            state: SessionState::new(),
            resolver: Arc::new(resolver),
            event_rx,
            event_tx: event_tx.downgrade(),
            broadcast_tx,
            snapshot_tx,
            reply_cancel_token: None,
            watchdog_cancel_token: None,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting session runtime");

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
        }

        cancel(&mut self.reply_cancel_token);
        cancel(&mut self.watchdog_cancel_token);
        tracing::info!(session_id = %self.context.session_id, "Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(TransitionError::EmptyInput) => {
                tracing::debug!(session_id = %self.context.session_id, "Ignoring blank input");
                return;
            }
            Err(e @ TransitionError::AwaitingResponse) => {
                tracing::warn!(session_id = %self.context.session_id, "Turn rejected: {e}");
                let _ = self.broadcast_tx.send(SseEvent::Error {
                    message: e.to_string(),
                });
                return;
            }
        };

        self.state = result.new_state;
        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ResolveReply(request) => self.spawn_reply(request),

            Effect::ArmWatchdog { epoch } => {
                // Reset then arm: never two live timers
                cancel(&mut self.watchdog_cancel_token);
                if let Some(duration) = self.context.config.inactivity_timeout {
                    let token = CancellationToken::new();
                    self.watchdog_cancel_token = Some(token.clone());
                    let event_tx = self.event_tx.clone();

                    tokio::spawn(async move {
                        tokio::select! {
                            biased;

                            () = token.cancelled() => {}

                            () = tokio::time::sleep(duration) => {
                                tracing::info!(epoch, "Inactivity timeout");
                                if let Some(event_tx) = event_tx.upgrade() {
                                    let _ = event_tx
                                        .send(Event::InactivityTimeout {
                                            epoch,
                                            message_id: uuid::Uuid::new_v4().to_string(),
                                        })
                                        .await;
                                }
                            }
                        }
                    });
                }
            }

            Effect::DisarmWatchdog => cancel(&mut self.watchdog_cancel_token),

            Effect::AbortReply => cancel(&mut self.reply_cancel_token),

            Effect::PublishState => {
                let snapshot = SessionSnapshot::from_state(&self.context.session_id, &self.state);
                self.snapshot_tx.send_replace(snapshot.clone());
                let _ = self.broadcast_tx.send(SseEvent::StateChange { snapshot });
            }

            Effect::NotifyMessage { message } => {
                let _ = self.broadcast_tx.send(SseEvent::Message { message });
            }

            Effect::NotifyReplyDone => {
                self.reply_cancel_token = None;
                let _ = self.broadcast_tx.send(SseEvent::ReplyDone);
            }
        }
    }

    /// Resolve the reply as a background task so the loop keeps serving events
    fn spawn_reply(&mut self, request: ResolveRequest) {
        cancel(&mut self.reply_cancel_token);
        let token = CancellationToken::new();
        self.reply_cancel_token = Some(token.clone());

        let resolver = Arc::clone(&self.resolver);
        let event_tx = self.event_tx.clone();
        let turn_id = request.turn_id.clone();

        tokio::spawn(async move {
            tracing::info!(turn_id = %turn_id, topic = %request.topic, "Resolving reply (background)");

            // Race resolution against cancellation
            tokio::select! {
                biased;

                () = token.cancelled() => {
                    tracing::info!(turn_id = %turn_id, "Reply cancelled");
                }

                text = resolver.resolve(&request) => {
                    let Some(event_tx) = event_tx.upgrade() else {
                        tracing::debug!(turn_id = %turn_id, "Session gone, dropping reply");
                        return;
                    };
                    let _ = event_tx
                        .send(Event::ReplyReady {
                            turn_id,
                            text,
                            message_id: uuid::Uuid::new_v4().to_string(),
                        })
                        .await;
                }
            }
        });
    }
}

fn cancel(token: &mut Option<CancellationToken>) {
    if let Some(token) = token.take() {
        token.cancel();
    }
}
