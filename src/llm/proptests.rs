//! Property-based tests for the Gemini translation layer
//!
//! These tests verify that translation between our internal types and the
//! Gemini wire format preserves key invariants:
//! - Message order and roles survive translation
//! - Empty-text messages are dropped, never sent as empty parts
//! - Responses without text are rejected

use super::gemini::{GeminiCandidate, GeminiContent, GeminiPart, GeminiResponse, GeminiService};
use super::types::{LlmMessage, LlmRequest, MessageRole};
use super::ModelTier;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_role() -> impl Strategy<Value = MessageRole> {
    prop_oneof![Just(MessageRole::User), Just(MessageRole::Assistant)]
}

/// Message with possibly empty text
fn arb_message() -> impl Strategy<Value = LlmMessage> {
    (arb_role(), "[a-zA-Z0-9 ¿?¡!áéíóúñ.,]{0,60}")
        .prop_map(|(role, text)| LlmMessage { role, text })
}

fn arb_tier() -> impl Strategy<Value = ModelTier> {
    prop_oneof![Just(ModelTier::Standard), Just(ModelTier::Advanced)]
}

fn arb_request() -> impl Strategy<Value = LlmRequest> {
    (
        arb_tier(),
        "[a-zA-Z ]{0,40}",
        proptest::collection::vec(arb_message(), 0..12),
    )
        .prop_map(|(tier, system, messages)| LlmRequest {
            tier,
            system,
            messages,
            max_tokens: None,
        })
}

fn gemini_role(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    }
}

// ============================================================================
// Request translation
// ============================================================================

proptest! {
    /// Non-empty messages keep their order, text and role
    #[test]
    fn prop_translate_preserves_non_empty_messages(request in arb_request()) {
        let wire = GeminiService::translate_request(&request);
        let expected: Vec<&LlmMessage> = request.messages.iter().filter(|m| !m.text.is_empty()).collect();

        prop_assert_eq!(wire.contents.len(), expected.len());
        for (content, msg) in wire.contents.iter().zip(expected) {
            prop_assert_eq!(content.role.as_deref(), Some(gemini_role(msg.role)));
            prop_assert_eq!(content.parts.len(), 1);
            prop_assert_eq!(&content.parts[0].text, &msg.text);
        }
    }

    /// System instruction is present exactly when the system text is not blank
    #[test]
    fn prop_translate_system_instruction(request in arb_request()) {
        let wire = GeminiService::translate_request(&request);
        prop_assert_eq!(wire.system_instruction.is_some(), !request.system.trim().is_empty());
        if let Some(system) = wire.system_instruction {
            prop_assert!(system.role.is_none());
            prop_assert_eq!(&system.parts[0].text, &request.system);
        }
    }
}

// ============================================================================
// Response normalization
// ============================================================================

fn response_with_parts(parts: Vec<String>, finish_reason: Option<String>) -> GeminiResponse {
    GeminiResponse {
        candidates: vec![GeminiCandidate {
            content: Some(GeminiContent {
                role: Some("model".to_string()),
                parts: parts.into_iter().map(|text| GeminiPart { text }).collect(),
            }),
            finish_reason,
        }],
        usage_metadata: None,
        prompt_feedback: None,
    }
}

proptest! {
    /// Whitespace-only replies are errors regardless of finish reason
    #[test]
    fn prop_normalize_rejects_blank(
        parts in proptest::collection::vec("[ \n\t]{0,5}", 0..4),
        finish_reason in proptest::option::of("[A-Z_]{3,10}"),
    ) {
        let result = GeminiService::normalize_response(response_with_parts(parts, finish_reason));
        prop_assert!(result.is_err());
    }

    /// Text parts are concatenated in order
    #[test]
    fn prop_normalize_concatenates_parts(
        parts in proptest::collection::vec("[a-zA-Z0-9 ]{1,20}", 1..5),
    ) {
        let expected: String = parts.concat();
        prop_assume!(!expected.trim().is_empty());
        let result = GeminiService::normalize_response(response_with_parts(parts, Some("STOP".to_string())));
        prop_assert!(result.is_ok());
        let response = result.unwrap();
        prop_assert_eq!(response.text, expected);
        prop_assert!(response.end_turn);
    }
}
