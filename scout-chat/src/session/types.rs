//! Session and turn entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a stored conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One message in a session's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Identifier the model API assigned to this reply (assistant turns only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    /// Response this turn was generated in reply to (assistant turns only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
}

impl ChatTurn {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            response_id: None,
            previous_response_id: None,
        }
    }

    /// Create an assistant turn from a model reply.
    pub fn assistant(
        content: impl Into<String>,
        response_id: impl Into<String>,
        previous_response_id: Option<String>,
    ) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            response_id: Some(response_id.into()),
            previous_response_id,
        }
    }
}

/// A chat session: an append-only turn history plus metadata.
///
/// The turn sequence always starts with the user/assistant pair created at
/// session start and grows by exactly one such pair per processed message.
/// Turns are never deleted or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: Option<String>,
    pub messages: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Conversation thread on the model API's side, when it reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl Session {
    /// Create a session from its initial user/assistant turn pair.
    ///
    /// Identifiers are freshly generated and never reused, so a deleted
    /// session's id can never come back to life through a later start.
    pub fn new(user_id: Option<String>, user_turn: ChatTurn, assistant_turn: ChatTurn) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4().to_string(),
            user_id,
            messages: vec![user_turn, assistant_turn],
            created_at: now,
            last_updated: now,
            conversation_id: None,
        }
    }

    /// Append a user/assistant turn pair and refresh `last_updated`.
    pub fn append_exchange(&mut self, user_turn: ChatTurn, assistant_turn: ChatTurn) {
        self.messages.push(user_turn);
        self.messages.push(assistant_turn);
        self.last_updated = Utc::now();
    }

    /// The most recent `window` turns, oldest first.
    pub fn recent_turns(&self, window: usize) -> &[ChatTurn] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }

    /// Response id of the most recent assistant turn that carries one.
    ///
    /// Assistant turns without an id are skipped, so an earlier identified
    /// reply still provides linkage when the latest one lacks an id.
    pub fn last_response_id(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .filter(|turn| turn.role == TurnRole::Assistant)
            .find_map(|turn| turn.response_id.as_deref().filter(|id| !id.is_empty()))
    }
}
