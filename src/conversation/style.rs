//! Response style: emoji-rich or plain

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStyle {
    #[default]
    Emoji,
    Plain,
}

impl ResponseStyle {
    /// Adapt a static text to this style.
    ///
    /// `Plain` removes pictographs together with the space that separated
    /// them from the surrounding words, so `**🚗 Respeta**` becomes
    /// `**Respeta**` rather than `** Respeta**`.
    pub fn apply(self, text: &str) -> Cow<'_, str> {
        match self {
            ResponseStyle::Emoji => Cow::Borrowed(text),
            ResponseStyle::Plain => strip_pictographs(text),
        }
    }
}

impl FromStr for ResponseStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emoji" => Ok(ResponseStyle::Emoji),
            "plain" => Ok(ResponseStyle::Plain),
            other => Err(format!("unknown response style: {other}")),
        }
    }
}

fn is_pictograph(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F000..=0x1FAFF // emoticons, symbols, pictographs, flags
            | 0x2300..=0x23FF // technical (watch, hourglass)
            | 0x2600..=0x27BF // misc symbols, dingbats
            | 0x2B00..=0x2BFF // arrows, stars
            | 0xFE0F // variation selector-16
            | 0x200D // zero-width joiner
    )
}

fn strip_pictographs(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_pictograph) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut dropped = false;
    for c in text.chars() {
        if is_pictograph(c) {
            dropped = true;
            continue;
        }
        if dropped && c == ' ' && out.chars().next_back().map_or(true, |p| p.is_whitespace() || p == '*') {
            dropped = false;
            continue;
        }
        dropped = false;
        out.push(c);
    }

    let trimmed: Vec<&str> = out.lines().map(str::trim_end).collect();
    Cow::Owned(trimmed.join("\n"))
}
