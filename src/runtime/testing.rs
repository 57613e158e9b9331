//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use super::{SessionRuntime, SessionSnapshot, SseEvent};
use crate::conversation::Topic;
use crate::llm::{LlmError, LlmRequest, LlmResponse};
use crate::reference_data::ReferenceData;
use crate::resolver::ResponseResolver;
use crate::state_machine::{Event, SessionConfig, SessionContext, SessionState};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch, Notify};

// ============================================================================
// Mock LLM Client
// ============================================================================

/// Mock LLM client that returns queued responses
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    /// Record of all requests made
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmClient {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<LlmResponse, LlmError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_response()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Delayed Mock LLM Client (for cancellation testing)
// ============================================================================

/// Mock LLM client with configurable delay (for testing cancellation)
pub struct DelayedMockLlmClient {
    inner: MockLlmClient,
    delay: Duration,
    /// Notified when request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockLlmClient {
    pub fn new(model_id: impl Into<String>, delay: Duration) -> Self {
        Self {
            inner: MockLlmClient::new(model_id),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_response(&self, response: LlmResponse) {
        self.inner.queue_response(response);
    }

    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl LlmClient for DelayedMockLlmClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.next_response()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

// ============================================================================
// Test Runtime Builder
// ============================================================================

/// Helper for building test runtimes with minimal boilerplate
pub struct TestRuntime<L: LlmClient + 'static> {
    pub event_tx: mpsc::Sender<Event>,
    pub broadcast_rx: broadcast::Receiver<SseEvent>,
    pub snapshot_rx: watch::Receiver<SessionSnapshot>,
    pub llm: Arc<L>,
    _runtime_handle: tokio::task::JoinHandle<()>,
}

impl TestRuntime<MockLlmClient> {
    /// Create a simple test runtime with instant mocks
    pub fn new() -> TestRuntimeBuilder<MockLlmClient> {
        TestRuntimeBuilder::new()
    }
}

pub struct TestRuntimeBuilder<L> {
    session_id: String,
    config: SessionConfig,
    llm: Option<L>,
}

impl TestRuntimeBuilder<MockLlmClient> {
    pub fn new() -> Self {
        Self {
            session_id: "test-session".to_string(),
            config: SessionConfig::default(),
            llm: None,
        }
    }
}

impl Default for TestRuntimeBuilder<MockLlmClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LlmClient + 'static> TestRuntimeBuilder<L> {
    /// Swap in another LLM client, possibly of a different type
    pub fn llm<M: LlmClient + 'static>(self, llm: M) -> TestRuntimeBuilder<M> {
        TestRuntimeBuilder {
            session_id: self.session_id,
            config: self.config,
            llm: Some(llm),
        }
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn inactivity_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.inactivity_timeout = timeout;
        self
    }

    pub fn build(self) -> TestRuntime<L>
    where
        L: Default,
    {
        let llm = Arc::new(self.llm.unwrap_or_default());
        let context = SessionContext::new(&self.session_id, self.config);
        let resolver = ResponseResolver::new(
            llm.clone(),
            Arc::new(ReferenceData::bundled().unwrap()),
            self.config.style,
            self.config.reply_timeout,
        )
        .with_max_output_tokens(self.config.max_output_tokens);

        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, broadcast_rx) = broadcast::channel(128);
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::from_state(
            &self.session_id,
            &SessionState::new(),
        ));

        let runtime = SessionRuntime::new(
            context,
            resolver,
            event_rx,
            &event_tx,
            broadcast_tx,
            snapshot_tx,
        );
        let handle = tokio::spawn(runtime.run());

        TestRuntime {
            event_tx,
            broadcast_rx,
            snapshot_rx,
            llm,
            _runtime_handle: handle,
        }
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new("test-model")
    }
}

impl Default for DelayedMockLlmClient {
    fn default() -> Self {
        Self::new("test-model", Duration::from_millis(100))
    }
}

impl<L: LlmClient + 'static> TestRuntime<L> {
    /// Submit a user turn, returning the minted message id
    pub async fn submit(&self, text: &str, topic: Topic, first_turn: bool) -> String {
        let message_id = uuid::Uuid::new_v4().to_string();
        self.event_tx
            .send(Event::SubmitTurn {
                text: text.to_string(),
                topic,
                first_turn,
                message_id: message_id.clone(),
            })
            .await
            .expect("Failed to send turn");
        message_id
    }

    pub async fn send_reset(&self) {
        self.event_tx
            .send(Event::Reset)
            .await
            .expect("Failed to send reset");
    }

    /// Wait for `ReplyDone` event with timeout
    pub async fn wait_for_reply_done(&mut self, timeout: Duration) -> bool {
        self.wait_for_event(|e| matches!(e, SseEvent::ReplyDone), timeout)
            .await
            .is_some()
    }

    /// Wait for the first broadcast event matching `pred`
    pub async fn wait_for_event(
        &mut self,
        pred: impl Fn(&SseEvent) -> bool,
        timeout: Duration,
    ) -> Option<SseEvent> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.broadcast_rx.recv()).await {
                Ok(Ok(event)) if pred(&event) => return Some(event),
                _ => continue,
            }
        }
        None
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{
        canned_response, greeting_message, initial_options, Sender, APOLOGY_TEXT, INACTIVITY_NOTICE,
    };
    use crate::llm::ModelTier;

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_mock_llm_client() {
        let mock = MockLlmClient::new("test-model");
        mock.queue_response(LlmResponse::text("Hola"));

        let request = LlmRequest {
            tier: ModelTier::Standard,
            system: String::new(),
            messages: vec![],
            max_tokens: Some(100),
        };

        let response = mock.complete(&request).await.unwrap();
        assert_eq!(response.text, "Hola");
        assert!(response.end_turn);

        // Second call should fail (no more responses)
        let result = mock.complete(&request).await;
        assert!(result.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    /// Canned topics answer the first turn without calling the generator
    #[tokio::test]
    async fn test_canned_first_turn() {
        for topic in [Topic::BasicCheck, Topic::Reminders, Topic::Alerts, Topic::Tips] {
            let mut rt = TestRuntime::new().build();
            rt.submit(topic.label(), topic, true).await;
            assert!(rt.wait_for_reply_done(WAIT).await, "{topic}");

            let snap = rt.snapshot();
            assert_eq!(snap.transcript.len(), 3);
            assert_eq!(snap.transcript[2].sender, Sender::Bot);
            assert_eq!(Some(snap.transcript[2].text.as_str()), canned_response(topic));
            assert!(rt.llm.recorded_requests().is_empty(), "{topic}");
        }
    }

    /// Open questions are always generated and re-offer the menu
    #[tokio::test]
    async fn test_custom_first_turn_generated_with_menu() {
        let llm = MockLlmClient::new("test-model");
        llm.queue_response(LlmResponse::text("Revisa el nivel de refrigerante."));

        let mut rt = TestRuntime::new().llm(llm).build();
        rt.submit("¿por qué se sobrecalienta mi auto?", Topic::Custom, true)
            .await;
        assert!(rt.wait_for_reply_done(WAIT).await);

        let snap = rt.snapshot();
        assert!(snap.chat_active);
        assert!(!snap.awaiting_response);
        assert_eq!(snap.topic, Topic::Custom);
        let reply = snap.transcript.last().unwrap();
        assert_eq!(reply.text, "Revisa el nivel de refrigerante.");
        assert_eq!(reply.options, initial_options());
        assert_eq!(rt.llm.recorded_requests().len(), 1);
    }

    /// Failures surface as the apology and keep the transcript shape
    #[tokio::test]
    async fn test_generation_failure_yields_apology() {
        let llm = MockLlmClient::new("test-model");
        llm.queue_error(LlmError::network("connection refused"));

        let mut rt = TestRuntime::new().llm(llm).build();
        let user_id = rt
            .submit("¿por qué se sobrecalienta mi auto?", Topic::Custom, true)
            .await;
        assert!(rt.wait_for_reply_done(WAIT).await);

        let transcript = rt.snapshot().transcript;
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0], greeting_message().without_options());
        assert_eq!(transcript[1].id, user_id);
        assert_eq!(transcript[1].text, "¿por qué se sobrecalienta mi auto?");
        assert_eq!(transcript[2].sender, Sender::Bot);
        assert_eq!(transcript[2].text, APOLOGY_TEXT);

        // The session stays usable
        rt.llm.queue_response(LlmResponse::text("Ahora sí."));
        rt.submit("¿y ahora?", Topic::Custom, false).await;
        assert!(rt.wait_for_reply_done(WAIT).await);
        assert_eq!(rt.snapshot().transcript.last().unwrap().text, "Ahora sí.");
    }

    /// Blank input changes nothing and calls nothing
    #[tokio::test]
    async fn test_blank_input_ignored() {
        let rt = TestRuntime::new().build();
        rt.submit("   ", Topic::Custom, true).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snap = rt.snapshot();
        assert!(snap.transcript.is_empty());
        assert!(!snap.chat_active);
        assert!(rt.llm.recorded_requests().is_empty());
    }

    /// A second submission while awaiting is rejected
    #[tokio::test]
    async fn test_single_flight() {
        let llm = DelayedMockLlmClient::new("test-model", Duration::from_millis(300));
        llm.queue_response(LlmResponse::text("primera"));
        llm.queue_response(LlmResponse::text("segunda"));

        let mut rt = TestRuntime::new().llm(llm).build();
        rt.submit("primera pregunta", Topic::Custom, true).await;
        rt.submit("segunda pregunta", Topic::Custom, false).await;

        let error = rt
            .wait_for_event(|e| matches!(e, SseEvent::Error { .. }), WAIT)
            .await;
        assert!(error.is_some());
        assert!(rt.wait_for_reply_done(WAIT).await);

        let snap = rt.snapshot();
        assert_eq!(snap.transcript.len(), 3);
        assert_eq!(snap.transcript[2].text, "primera");
        assert_eq!(rt.llm.recorded_requests().len(), 1);
    }

    /// Follow-ups on ALERTS go to the advanced tier, everything else standard
    #[tokio::test]
    async fn test_tier_selection() {
        let llm = MockLlmClient::new("test-model");
        llm.queue_response(LlmResponse::text("Detén el vehículo."));
        llm.queue_response(LlmResponse::text("Cada 5.000 km."));

        let mut rt = TestRuntime::new().llm(llm).build();
        rt.submit("Señales de Alerta", Topic::Alerts, true).await;
        assert!(rt.wait_for_reply_done(WAIT).await);
        rt.submit("sale humo blanco", Topic::Alerts, false).await;
        assert!(rt.wait_for_reply_done(WAIT).await);
        rt.submit("¿cada cuánto cambio el aceite?", Topic::Reminders, false)
            .await;
        assert!(rt.wait_for_reply_done(WAIT).await);

        let tiers: Vec<ModelTier> = rt
            .llm
            .recorded_requests()
            .iter()
            .map(|r| r.tier)
            .collect();
        assert_eq!(tiers, vec![ModelTier::Advanced, ModelTier::Standard]);
    }

    /// The watchdog appends one notice and deactivates the chat
    #[tokio::test]
    async fn test_inactivity_deactivates_chat() {
        let mut rt = TestRuntime::new()
            .inactivity_timeout(Some(Duration::from_millis(100)))
            .build();
        rt.submit("Tips de Cuidado", Topic::Tips, true).await;
        assert!(rt.wait_for_reply_done(WAIT).await);

        let notice = rt
            .wait_for_event(
                |e| matches!(e, SseEvent::Message { message } if message.text == INACTIVITY_NOTICE),
                WAIT,
            )
            .await;
        assert!(notice.is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;
        let snap = rt.snapshot();
        assert!(!snap.chat_active);
        assert_eq!(snap.transcript.len(), 4);
        assert_eq!(
            snap.transcript
                .iter()
                .filter(|m| m.text == INACTIVITY_NOTICE)
                .count(),
            1
        );
    }

    /// A reply slower than the watchdog lands before the notice, never after it
    #[tokio::test]
    async fn test_slow_reply_outlives_watchdog() {
        let llm = DelayedMockLlmClient::new("test-model", Duration::from_millis(350));
        llm.queue_response(LlmResponse::text("respuesta lenta"));

        let mut rt = TestRuntime::new()
            .llm(llm)
            .inactivity_timeout(Some(Duration::from_millis(100)))
            .build();
        rt.submit("hola", Topic::Custom, true).await;
        assert!(rt.wait_for_reply_done(WAIT).await);

        let notice = rt
            .wait_for_event(
                |e| matches!(e, SseEvent::Message { message } if message.text == INACTIVITY_NOTICE),
                WAIT,
            )
            .await;
        assert!(notice.is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;
        let snap = rt.snapshot();
        assert!(!snap.chat_active);
        let texts: Vec<&str> = snap.transcript.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(&texts[texts.len() - 2..], ["respuesta lenta", INACTIVITY_NOTICE]);
    }

    /// Each accepted turn pushes the deadline back
    #[tokio::test]
    async fn test_activity_rearms_watchdog() {
        let llm = MockLlmClient::new("test-model");
        llm.queue_response(LlmResponse::text("respuesta"));

        let mut rt = TestRuntime::new()
            .llm(llm)
            .inactivity_timeout(Some(Duration::from_millis(400)))
            .build();
        rt.submit("Tips de Cuidado", Topic::Tips, true).await;
        assert!(rt.wait_for_reply_done(WAIT).await);

        tokio::time::sleep(Duration::from_millis(250)).await;
        rt.submit("¿y las llantas?", Topic::Tips, false).await;
        assert!(rt.wait_for_reply_done(WAIT).await);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(rt.snapshot().chat_active);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!rt.snapshot().chat_active);
    }

    #[tokio::test]
    async fn test_watchdog_disabled() {
        let mut rt = TestRuntime::new().inactivity_timeout(None).build();
        rt.submit("Tips de Cuidado", Topic::Tips, true).await;
        assert!(rt.wait_for_reply_done(WAIT).await);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rt.snapshot().chat_active);
    }

    /// Reset drops the conversation and the pending reply never lands
    #[tokio::test]
    async fn test_reset_cancels_pending_reply() {
        let llm = DelayedMockLlmClient::new("test-model", Duration::from_millis(300));
        llm.queue_response(LlmResponse::text("tarde"));
        let started = llm.request_started.clone();

        let rt = TestRuntime::new().llm(llm).build();
        rt.submit("hola", Topic::Custom, true).await;
        tokio::time::timeout(WAIT, started.notified()).await.unwrap();
        rt.send_reset().await;

        tokio::time::sleep(Duration::from_millis(500)).await;
        let snap = rt.snapshot();
        assert!(snap.transcript.is_empty());
        assert!(!snap.awaiting_response);
        assert!(!snap.chat_active);
    }

    /// Slow generation follows the apology path
    #[tokio::test]
    async fn test_reply_timeout_yields_apology() {
        let llm = DelayedMockLlmClient::new("test-model", Duration::from_secs(5));
        llm.queue_response(LlmResponse::text("demasiado tarde"));

        let mut rt = TestRuntime::new()
            .llm(llm)
            .config(SessionConfig {
                reply_timeout: Duration::from_millis(100),
                ..SessionConfig::default()
            })
            .build();
        rt.submit("hola", Topic::Custom, true).await;
        assert!(rt.wait_for_reply_done(WAIT).await);
        assert_eq!(rt.snapshot().transcript.last().unwrap().text, APOLOGY_TEXT);
    }
}
