//! Session entities, in-memory store, and turn-processing manager.

mod manager;
mod store;
mod types;

pub use manager::{ChatManager, Exchange, StartedSession, SYSTEM_INSTRUCTION};
pub use store::{SessionStore, SharedSession};
pub use types::{ChatTurn, Session, TurnRole};
