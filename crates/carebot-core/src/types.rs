//! Shared domain types: turns, chat messages, languages, and audio clips.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Turn
// =============================================================================

/// One exchange: what the user said and what the assistant replied.
///
/// `user_text` is empty only for the synthetic opening turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user_text: String,
    pub bot_text: String,
}

impl Turn {
    pub fn new(user_text: impl Into<String>, bot_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            bot_text: bot_text.into(),
        }
    }

    /// The assistant-initiated turn that opens every session.
    pub fn opening(greeting: impl Into<String>) -> Self {
        Self::new(String::new(), greeting)
    }

    /// Whether this turn was initiated by the assistant rather than the user.
    pub fn is_opening(&self) -> bool {
        self.user_text.is_empty()
    }
}

// =============================================================================
// Chat messages
// =============================================================================

/// Author of a chat-completion message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message in a chat-completion transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// =============================================================================
// Language
// =============================================================================

/// Spoken output language, serialized as its locale tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "pa")]
    Punjabi,
}

impl Language {
    /// Locale tag understood by the speech services.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Punjabi => "pa",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Audio
// =============================================================================

/// A playable audio artifact produced by speech synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// MIME type of `data`, e.g. `audio/mpeg`.
    pub mime_type: String,
    /// Encoded audio bytes.
    pub data: Vec<u8>,
    /// Language the text was spoken in.
    pub language: Language,
}

impl AudioClip {
    pub fn mp3(data: Vec<u8>, language: Language) -> Self {
        Self {
            mime_type: "audio/mpeg".to_string(),
            data,
            language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_turn_has_empty_user_text() {
        let turn = Turn::opening("Hello!");
        assert!(turn.is_opening());
        assert_eq!(turn.bot_text, "Hello!");
        assert!(!Turn::new("hi", "there").is_opening());
    }

    #[test]
    fn test_chat_message_serializes_lowercase_roles() {
        let json = serde_json::to_value(ChatMessage::assistant("ok")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "ok");

        let json = serde_json::to_value(ChatMessage::system("rules")).unwrap();
        assert_eq!(json["role"], "system");
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Hindi.to_string(), "hi");
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn test_language_serializes_as_code() {
        let json = serde_json::to_string(&Language::Hindi).unwrap();
        assert_eq!(json, "\"hi\"");
        let parsed: Language = serde_json::from_str("\"pa\"").unwrap();
        assert_eq!(parsed, Language::Punjabi);
    }

    #[test]
    fn test_mp3_clip() {
        let clip = AudioClip::mp3(vec![0xFF, 0xFB], Language::English);
        assert_eq!(clip.mime_type, "audio/mpeg");
        assert_eq!(clip.data, vec![0xFF, 0xFB]);
    }
}
