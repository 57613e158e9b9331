//! Capability tiers and the models behind them

use crate::conversation::Topic;
use std::fmt;

/// Capability tier requested from the generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTier {
    /// Fast model for routine follow-ups
    Standard,
    /// More careful model for safety-relevant answers
    Advanced,
}

impl ModelTier {
    /// Alerts get the higher-capability tier; everything else is standard.
    pub fn for_topic(topic: Topic) -> Self {
        match topic {
            Topic::Alerts => ModelTier::Advanced,
            Topic::Greeting
            | Topic::BasicCheck
            | Topic::Reminders
            | Topic::Tips
            | Topic::Custom => ModelTier::Standard,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ModelTier::Standard => "standard",
            ModelTier::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tier definition with its default model
#[derive(Debug, Clone)]
pub struct TierDef {
    pub tier: ModelTier,
    /// Gemini model name used unless overridden by configuration
    pub default_model: &'static str,
    pub description: &'static str,
}

pub fn all_tiers() -> &'static [TierDef] {
    &[
        TierDef {
            tier: ModelTier::Standard,
            default_model: "gemini-2.5-flash",
            description: "Gemini 2.5 Flash (fast, routine follow-ups)",
        },
        TierDef {
            tier: ModelTier::Advanced,
            default_model: "gemini-2.5-pro",
            description: "Gemini 2.5 Pro (careful reasoning for warning signs)",
        },
    ]
}
