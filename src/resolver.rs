//! Response resolution: canned intro or delegated generation
//!
//! Given the prior history, the new user message and the active topic, the
//! resolver returns the bot's reply text. It never fails: any generation
//! failure or timeout becomes the fixed apology.

use crate::conversation::{canned_response, Message, ResponseStyle, Topic, APOLOGY_TEXT};
use crate::llm::{LlmMessage, LlmRequest, ModelTier};
use crate::reference_data::ReferenceData;
use crate::runtime::LlmClient;
use crate::system_prompt::build_system_instruction;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Everything needed to produce the reply for one accepted turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    /// Id of the user message this reply answers
    pub turn_id: String,
    /// Transcript before the new user message, options stripped
    pub history: Vec<Message>,
    pub user_message: Message,
    pub topic: Topic,
    /// Whether the conversation has not shown a canned intro yet
    pub deliver_intro: bool,
}

pub struct ResponseResolver<L: LlmClient + ?Sized> {
    llm: Arc<L>,
    reference: Arc<ReferenceData>,
    style: ResponseStyle,
    reply_timeout: Duration,
    max_output_tokens: Option<u32>,
}

impl<L: LlmClient + ?Sized> ResponseResolver<L> {
    pub fn new(
        llm: Arc<L>,
        reference: Arc<ReferenceData>,
        style: ResponseStyle,
        reply_timeout: Duration,
    ) -> Self {
        Self {
            llm,
            reference,
            style,
            reply_timeout,
            max_output_tokens: None,
        }
    }

    /// Cap the length of generated replies
    #[must_use]
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Produce the reply text for a turn. Suspends only on the generation call.
    pub async fn resolve(&self, request: &ResolveRequest) -> String {
        if request.deliver_intro {
            if let Some(intro) = canned_response(request.topic) {
                tracing::debug!(topic = %request.topic, "Replying with canned intro");
                return self.style.apply(intro).into_owned();
            }
        }

        let llm_request = self.build_request(request);
        match timeout(self.reply_timeout, self.llm.complete(&llm_request)).await {
            Ok(Ok(response)) => response.text,
            Ok(Err(e)) => {
                tracing::warn!(
                    topic = %request.topic,
                    tier = %llm_request.tier,
                    error = %e.message,
                    "Generation failed, replying with apology"
                );
                APOLOGY_TEXT.to_string()
            }
            Err(_) => {
                tracing::warn!(
                    topic = %request.topic,
                    timeout_secs = self.reply_timeout.as_secs(),
                    "Generation timed out, replying with apology"
                );
                APOLOGY_TEXT.to_string()
            }
        }
    }

    /// Translate a turn into the generation request
    pub fn build_request(&self, request: &ResolveRequest) -> LlmRequest {
        let mut messages: Vec<LlmMessage> = request
            .history
            .iter()
            .map(|msg| {
                if msg.is_user() {
                    LlmMessage::user(msg.text.clone())
                } else {
                    LlmMessage::assistant(msg.text.clone())
                }
            })
            .collect();
        messages.push(LlmMessage::user(request.user_message.text.clone()));

        LlmRequest {
            tier: ModelTier::for_topic(request.topic),
            system: build_system_instruction(request.topic, self.style, Some(&self.reference)),
            messages,
            max_tokens: self.max_output_tokens,
        }
    }
}
