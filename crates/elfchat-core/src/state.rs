//! UI-agnostic session state types
//!
//! Shared by every `ChatSurface` implementation (terminal, console, test
//! doubles) and independent of any UI framework.

use serde::{Deserialize, Serialize};

use crate::mood::Mood;

/// A chat message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Only assistant messages carry a mood.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            mood: None,
        }
    }

    pub fn assistant(content: impl Into<String>, mood: Mood) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            mood: Some(mood),
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnStatus {
    #[default]
    Idle,
    Busy,
}

/// Everything the controller tracks between events.
///
/// Input affordances are derived from `turn` alone: enabled exactly while
/// `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    pub turn: TurnStatus,
}

impl SessionState {
    pub fn is_busy(&self) -> bool {
        self.turn == TurnStatus::Busy
    }

    pub fn input_enabled(&self) -> bool {
        !self.is_busy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_follows_turn_status() {
        let mut state = SessionState::default();
        assert!(state.input_enabled());
        state.turn = TurnStatus::Busy;
        assert!(!state.input_enabled());
    }

    #[test]
    fn test_user_messages_have_no_mood() {
        let msg = ChatMessage::user("<b>hi</b>");
        assert_eq!(msg.mood, None);
        assert_eq!(msg.content, "<b>hi</b>");
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"role":"user","content":"<b>hi</b>"}"#
        );
    }

    #[test]
    fn test_assistant_message_serializes_mood_tag() {
        let msg = ChatMessage::assistant("Hm.", Mood::Thoughtful);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["mood"], "thoughtful");
        assert_eq!(value["role"], "assistant");
    }
}
