//! Process configuration
//!
//! Read once from the environment at startup. Every failure here is fatal:
//! the server refuses to start rather than fail later on the first turn.

use crate::conversation::ResponseStyle;
use crate::llm::LlmConfig;
use crate::reference_data::{ReferenceData, ReferenceDataError};
use crate::state_machine::SessionConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_INACTIVITY_SECS: u64 = 300;
const DEFAULT_REPLY_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SESSION_IDLE_SECS: u64 = 1800;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API_KEY environment variable not set")]
    MissingApiKey,
    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("invalid value for AUTOBOT_RESPONSE_STYLE: {0}")]
    InvalidStyle(String),
    #[error(
        "AUTOBOT_REPLY_TIMEOUT_SECS ({reply_secs}) must be below AUTOBOT_INACTIVITY_SECS ({inactivity_secs})"
    )]
    ReplyTimeoutExceedsInactivity { reply_secs: u64, inactivity_secs: u64 },
    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub port: u16,
    pub session: SessionConfig,
    /// Unwatched sessions quiet for this long are evicted; `None` keeps them
    pub session_idle: Option<Duration>,
    pub reference_data: ReferenceData,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let llm = LlmConfig {
            api_key,
            gateway: lookup("LLM_GATEWAY").filter(|g| !g.trim().is_empty()),
            standard_model: lookup("AUTOBOT_STANDARD_MODEL"),
            advanced_model: lookup("AUTOBOT_ADVANCED_MODEL"),
        };

        let port = parse_number(&lookup, "AUTOBOT_PORT", DEFAULT_PORT)?;
        let inactivity_secs =
            parse_number(&lookup, "AUTOBOT_INACTIVITY_SECS", DEFAULT_INACTIVITY_SECS)?;
        let reply_timeout_secs =
            parse_number(&lookup, "AUTOBOT_REPLY_TIMEOUT_SECS", DEFAULT_REPLY_TIMEOUT_SECS)?;
        if inactivity_secs > 0 && reply_timeout_secs >= inactivity_secs {
            return Err(ConfigError::ReplyTimeoutExceedsInactivity {
                reply_secs: reply_timeout_secs,
                inactivity_secs,
            });
        }
        let session_idle_secs =
            parse_number(&lookup, "AUTOBOT_SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS)?;
        let max_output_tokens: u32 = parse_number(&lookup, "AUTOBOT_MAX_OUTPUT_TOKENS", 0)?;

        let style = match lookup("AUTOBOT_RESPONSE_STYLE") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidStyle(raw))?,
            None => ResponseStyle::default(),
        };

        let reference_data = match lookup("AUTOBOT_REFERENCE_DATA") {
            Some(path) => ReferenceData::load(&PathBuf::from(path))?,
            None => ReferenceData::bundled()?,
        };

        Ok(Self {
            llm,
            port,
            session: SessionConfig {
                inactivity_timeout: (inactivity_secs > 0)
                    .then(|| Duration::from_secs(inactivity_secs)),
                reply_timeout: Duration::from_secs(reply_timeout_secs),
                style,
                max_output_tokens: (max_output_tokens > 0).then_some(max_output_tokens),
            },
            session_idle: (session_idle_secs > 0).then(|| Duration::from_secs(session_idle_secs)),
            reference_data,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        None => Ok(default),
    }
}
