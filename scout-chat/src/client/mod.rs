//! Model API client abstraction.
//!
//! Provides a unified interface for the Responses-style model API the chat
//! service proxies to. The HTTP implementation lives in [`openai`]; tests
//! substitute stubs implementing [`ModelClient`].

mod openai;

pub use openai::OpenAIClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Client Trait
// ============================================================================

/// Unified interface to the model API.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Generate a model response for an ordered list of prompt turns.
    ///
    /// `previous_response_id` chains this request to an earlier response so
    /// the model API can use its own stored context for continuity.
    async fn create_response(
        &self,
        turns: &[PromptTurn],
        previous_response_id: Option<&str>,
    ) -> Result<ModelReply, ModelError>;

    /// List stored response records for a conversation thread.
    async fn list_responses(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<serde_json::Value>, ModelError>;
}

/// Error from the model API.
#[derive(Debug, Clone)]
pub struct ModelError {
    pub message: String,
    pub status_code: Option<u16>,
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "[{}] {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ModelError {}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A role-tagged turn sent to the model API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTurn {
    pub role: String,
    pub content: String,
}

impl PromptTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// A generated model reply.
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// Generated text content
    pub content: String,
    /// Identifier of this response, used for linkage on the next request
    pub response_id: String,
    /// Conversation thread the response belongs to, when the API reports one
    pub conversation_id: Option<String>,
    /// Token usage
    pub usage: Option<TokenUsage>,
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
}
