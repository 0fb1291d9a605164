//! Session creation and message turn processing.

use super::types::{ChatTurn, Session};
use crate::client::{ModelClient, PromptTurn, TokenUsage};
use crate::error::ChatError;
use std::sync::Arc;

/// Fixed persona instruction prepended to every model request.
pub const SYSTEM_INSTRUCTION: &str = "You are an intelligent search engine assistant. Your role is to:

1. Help users find products and information based on their queries
2. Provide detailed explanations about search results
3. Compare products and make recommendations
4. Answer follow-up questions about items found
5. Be conversational and helpful

When a user starts a search, acknowledge their query and explain what kind of results you'll help them find. For follow-up questions, provide detailed, helpful responses about the products or search topic.

Keep responses concise but informative, and always maintain a friendly, helpful tone.";

/// Result of starting a new chat session.
#[derive(Debug)]
pub struct StartedSession {
    pub session: Session,
    pub response_id: String,
    pub usage: Option<TokenUsage>,
}

/// Result of one processed message exchange.
#[derive(Debug)]
pub struct Exchange {
    pub user_turn: ChatTurn,
    pub assistant_turn: ChatTurn,
    pub usage: Option<TokenUsage>,
}

/// Orchestrates session creation and turn processing against the model API.
///
/// The manager never touches the store: `start` returns a constructed
/// session for the caller to insert, and `send_message` mutates a session
/// the caller already holds. Nothing is appended until the model call has
/// succeeded, so a failed call leaves the session exactly as it was.
pub struct ChatManager {
    client: Arc<dyn ModelClient>,
    history_window: usize,
}

impl ChatManager {
    /// Create a manager with the given client and context window size.
    pub fn new(client: Arc<dyn ModelClient>, history_window: usize) -> Self {
        Self {
            client,
            history_window,
        }
    }

    /// Start a new chat session from an initial search query.
    ///
    /// Produces a session whose history is exactly the initial user turn and
    /// the assistant's reply. On model failure no session exists at all.
    pub async fn start(
        &self,
        query: &str,
        user_id: Option<String>,
    ) -> Result<StartedSession, ChatError> {
        if query.trim().is_empty() {
            return Err(ChatError::InvalidRequest(
                "query must not be empty".to_string(),
            ));
        }

        tracing::info!(query = %query, user_id = ?user_id, "Processing chat start");

        let prompt = vec![
            PromptTurn::new("system", SYSTEM_INSTRUCTION),
            PromptTurn::new("user", format!("I want to search for: {}", query)),
        ];

        // New conversation: no previous-response linkage
        let reply = self.client.create_response(&prompt, None).await?;

        let user_turn = ChatTurn::user(query);
        let assistant_turn = ChatTurn::assistant(reply.content, reply.response_id.clone(), None);

        let mut session = Session::new(user_id, user_turn, assistant_turn);
        session.conversation_id = reply.conversation_id;

        tracing::info!(
            session_id = %session.session_id,
            response_id = %reply.response_id,
            "Chat session created"
        );

        Ok(StartedSession {
            session,
            response_id: reply.response_id,
            usage: reply.usage,
        })
    }

    /// Process one message in an existing session.
    ///
    /// The model sees the system instruction, a sliding window of the most
    /// recent turns, and the new message last. History beyond the window is
    /// silently dropped; continuity past it rides on the previous-response
    /// linkage token. Exactly one user/assistant pair is appended, and only
    /// after the model call succeeds.
    pub async fn send_message(
        &self,
        session: &mut Session,
        message: &str,
        user_id: Option<&str>,
    ) -> Result<Exchange, ChatError> {
        tracing::info!(
            session_id = %session.session_id,
            user_id = ?user_id,
            "Processing chat message"
        );

        let recent = session.recent_turns(self.history_window);
        let mut prompt = Vec::with_capacity(recent.len() + 2);
        prompt.push(PromptTurn::new("system", SYSTEM_INSTRUCTION));
        for turn in recent {
            prompt.push(PromptTurn::new(turn.role.as_str(), turn.content.clone()));
        }
        prompt.push(PromptTurn::new("user", message));

        let previous_response_id = session.last_response_id().map(str::to_owned);

        tracing::debug!(
            context_turns = recent.len(),
            linked = previous_response_id.is_some(),
            "Assembled model context"
        );

        let reply = self
            .client
            .create_response(&prompt, previous_response_id.as_deref())
            .await?;

        let user_turn = ChatTurn::user(message);
        let assistant_turn =
            ChatTurn::assistant(reply.content, reply.response_id, previous_response_id);

        session.append_exchange(user_turn.clone(), assistant_turn.clone());
        if session.conversation_id.is_none() {
            session.conversation_id = reply.conversation_id;
        }

        tracing::info!(
            session_id = %session.session_id,
            turns = session.messages.len(),
            "Message processed"
        );

        Ok(Exchange {
            user_turn,
            assistant_turn,
            usage: reply.usage,
        })
    }
}
