//! HTTP API routes.

use crate::client::ModelClient;
use crate::error::ChatError;
use crate::session::{ChatManager, ChatTurn, SessionStore};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub manager: Arc<ChatManager>,
    pub client: Arc<dyn ModelClient>,
}

impl AppState {
    pub fn new(client: Arc<dyn ModelClient>, history_window: usize) -> Self {
        Self {
            store: SessionStore::new(),
            manager: Arc::new(ChatManager::new(client.clone(), history_window)),
            client,
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Chat lifecycle
        .route("/chat/start", post(start_chat))
        .route("/chat/message", post(send_message))
        // Session management
        .route("/chat/sessions", get(list_sessions))
        .route("/chat/:id", get(get_session))
        .route("/chat/:id", delete(delete_session))
        .route("/chat/:id/responses", get(list_session_responses))
        .with_state(state)
}

// ============ Health Check ============

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "scout-chat",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ============ Chat Lifecycle ============

#[derive(Debug, Deserialize)]
struct StartChatRequest {
    query: String,
    user_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct StartChatResponse {
    session_id: String,
    initial_message: ChatTurn,
    response_id: String,
}

async fn start_chat(
    State(state): State<AppState>,
    Json(request): Json<StartChatRequest>,
) -> Result<impl IntoResponse, ChatError> {
    let started = state.manager.start(&request.query, request.user_id).await?;

    let initial_message = started
        .session
        .messages
        .last()
        .cloned()
        .ok_or_else(|| ChatError::Internal("session created without turns".to_string()))?;
    let session_id = started.session.session_id.clone();

    state.store.insert(started.session).await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "data": StartChatResponse {
                session_id,
                initial_message,
                response_id: started.response_id,
            }
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct SendMessageRequest {
    session_id: String,
    message: String,
    user_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageResponse {
    session_id: String,
    user_message: ChatTurn,
    assistant_response: ChatTurn,
}

async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ChatError> {
    let entry = state.store.validate(&request.session_id).await?;

    // Holding the session lock across the model call serializes
    // concurrent sends to the same session.
    let mut session = entry.lock().await;
    let exchange = state
        .manager
        .send_message(&mut session, &request.message, request.user_id.as_deref())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": SendMessageResponse {
            session_id: session.session_id.clone(),
            user_message: exchange.user_turn,
            assistant_response: exchange.assistant_turn,
        }
    })))
}

// ============ Session Management ============

#[derive(Debug, Deserialize)]
struct ListSessionsQuery {
    user_id: Option<String>,
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListSessionsQuery>,
) -> impl IntoResponse {
    let sessions = state.store.list(query.user_id.as_deref()).await;
    let count = sessions.len();

    Json(serde_json::json!({
        "success": true,
        "data": {
            "sessions": sessions,
            "count": count
        }
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ChatError> {
    let entry = state.store.validate(&id).await?;
    let session = entry.lock().await.clone();

    Ok(Json(serde_json::json!({
        "success": true,
        "data": session
    })))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ChatError> {
    state.store.validate(&id).await?;
    state.store.delete(&id).await;

    tracing::info!(session_id = %id, "Chat session deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "message": "Chat session deleted successfully"
        }
    })))
}

async fn list_session_responses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ChatError> {
    let entry = state.store.validate(&id).await?;
    let conversation_id = entry.lock().await.conversation_id.clone();

    let Some(conversation_id) = conversation_id else {
        tracing::warn!(session_id = %id, "No conversation id recorded for session");
        return Ok(Json(serde_json::json!({
            "success": true,
            "data": {
                "responses": [],
                "count": 0,
                "message": "No conversation ID available"
            }
        })));
    };

    let responses = state.client.list_responses(&conversation_id).await?;
    let count = responses.len();

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "responses": responses,
            "count": count
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ModelError, ModelReply, PromptTurn};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct CannedClient;

    #[async_trait]
    impl ModelClient for CannedClient {
        async fn create_response(
            &self,
            _turns: &[PromptTurn],
            _previous_response_id: Option<&str>,
        ) -> Result<ModelReply, ModelError> {
            Ok(ModelReply {
                content: "Searching...".to_string(),
                response_id: "resp_test".to_string(),
                conversation_id: None,
                usage: None,
            })
        }

        async fn list_responses(
            &self,
            _conversation_id: &str,
        ) -> Result<Vec<serde_json::Value>, ModelError> {
            Ok(Vec::new())
        }
    }

    fn test_app() -> Router {
        build_router(AppState::new(Arc::new(CannedClient), 10))
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_start_chat() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat/start")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query": "laptops"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_start_chat_empty_query() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat/start")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query": "  "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_send_message_unknown_session() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat/message")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"session_id": "missing", "message": "hello"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_session_not_found() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/chat/no-such-session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_sessions_empty() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/chat/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
