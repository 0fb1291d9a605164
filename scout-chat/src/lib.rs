//! scout-chat - Chat session service proxying a Responses-style model API.
//!
//! Sessions are append-only turn histories held in memory. Each message
//! exchange sends a sliding window of recent turns to the model together
//! with a previous-response linkage token, so the model can keep its own
//! server-side continuity beyond the truncated window.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod routes;
pub mod session;

pub use client::{ModelClient, ModelError, ModelReply, OpenAIClient, PromptTurn, TokenUsage};
pub use error::ChatError;
pub use routes::{build_router, AppState};
pub use session::{ChatManager, ChatTurn, Exchange, Session, SessionStore, StartedSession, TurnRole};
