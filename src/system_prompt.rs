//! System instruction construction
//!
//! Builds the topic-specific instruction sent with every generated reply:
//! persona and language, formatting rules, subject boundary, guidance for
//! the active topic and, for open questions, the feedback protocol plus the
//! reference dataset.

use crate::conversation::{ResponseStyle, Topic};
use crate::reference_data::ReferenceData;
use std::fmt::Write;

/// Persona, language and tone
const BASE_PROMPT: &str = r#"You are "Autobot", a friendly, professional, and educational chatbot specializing in preventive vehicle maintenance. Your name is Autobot. You MUST respond in Spanish. Use markdown for formatting. Keep responses concise and focused."#;

const FORMAT_RULES: &str = r"**STRICT FORMATTING RULE:** You MUST NOT use backticks (` `) to highlight topic names or phrases. Use **bold** (** **) instead to keep a friendly tone. Lists may use `* ` or numbered items.";

const SCOPE_RULES: &str = r"Your only subject is preventive maintenance of vehicle engines. If the user asks about anything else, do not answer it: politely steer them back to engine care and suggest a related question you can help with.";

const EMOJI_RULE: &str = "You may use a few relevant emojis to keep the tone warm.";
const PLAIN_RULE: &str = "Do not use emojis.";

/// Appended only for open-ended questions
const FEEDBACK_PROTOCOL: &str = r"<feedback_protocol>
After answering the user's open question, you **MUST** end your reply by asking whether the information was useful, with a simple yes/no question such as: **¿Te ha sido útil esta información? (sí/no)**

When the conversation shows the user already replied to that question:
- If the answer was affirmative (sí, gracias, me sirvió...), reply only with a short, warm farewell that closes the conversation. Do not add new content.
- If the answer was negative, briefly offer 2-3 alternative next steps (rephrase the question, pick one of the main topics: **Revisión Básica del Motor**, **Mantenimiento del Motor**, **Señales de Alerta**, **Tips de Cuidado**, or visit a professional mechanic) and then close the conversation politely.
</feedback_protocol>";

/// What has already been delivered for each topic and how to continue
fn topic_guidance(topic: Topic) -> &'static str {
    match topic {
        Topic::Greeting => {
            "This is the initial state. You have already greeted the user. Wait for their selection."
        }
        Topic::BasicCheck => {
            "**You have already started the oil-check guide.** Answer the user's message about the oil level and continue the guide (e.g. if it is low, suggest topping it up; if it is fine, move on to the coolant, then brake fluid, and so on)."
        }
        Topic::Alerts => {
            "**You have already provided the list of warning signs.** Answer the user's message with a probable cause and an IMMEDIATE recommended action. Always keep a tone of urgency and safety (\"visita un mecánico profesional\")."
        }
        Topic::Reminders => {
            "**You have already given the oil-change and general maintenance schedule.** Answer any follow-up question on that schedule or on general maintenance programs."
        }
        Topic::Tips => {
            "**You have already given the initial care tips.** Answer any follow-up question on those tips or on general engine care."
        }
        Topic::Custom => "Answer the user's open-ended question directly and helpfully.",
    }
}

/// Build the complete system instruction for a generated reply.
///
/// The reference dataset is only included for open questions, ahead of the
/// rest of the instruction.
pub fn build_system_instruction(
    topic: Topic,
    style: ResponseStyle,
    reference: Option<&ReferenceData>,
) -> String {
    let mut prompt = String::new();

    if topic == Topic::Custom {
        if let Some(data) = reference {
            prompt.push_str("<reference_data>\n");
            prompt.push_str("Use this engine-maintenance reference data to ground your answer:\n");
            prompt.push_str(data.as_prompt_text());
            prompt.push_str("\n</reference_data>\n\n");
        }
    }

    prompt.push_str(BASE_PROMPT);
    prompt.push(' ');
    prompt.push_str(match style {
        ResponseStyle::Emoji => EMOJI_RULE,
        ResponseStyle::Plain => PLAIN_RULE,
    });

    let _ = write!(
        prompt,
        "\n\nCurrent conversation topic: \"{}\"\n\nYour task is to respond to the user's message based on the current topic.\n\nInstructions per topic (they apply to the continuation of the dialogue, after the first answer):\n",
        topic.label()
    );
    for t in Topic::ALL {
        let _ = writeln!(prompt, "- **{}**: {}", t.label(), topic_guidance(t));
    }

    prompt.push('\n');
    prompt.push_str(FORMAT_RULES);
    prompt.push_str("\n\n");
    prompt.push_str(SCOPE_RULES);

    if topic == Topic::Custom {
        prompt.push_str("\n\n");
        prompt.push_str(FEEDBACK_PROTOCOL);
    }

    prompt
}
