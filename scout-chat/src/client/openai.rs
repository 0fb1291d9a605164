//! OpenAI Responses API client.

use super::{ModelClient, ModelError, ModelReply, PromptTurn, TokenUsage};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use scout_common::config::ModelConfig;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// HTTP client for the OpenAI Responses API.
///
/// Requests are stored server-side (`store: true`) so follow-up calls can
/// chain through `previous_response_id` instead of replaying full history.
pub struct OpenAIClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAIClient {
    /// Create a client from the model configuration.
    pub fn new(config: &ModelConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = &config.api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", api_key))
                    .unwrap_or_else(|_| HeaderValue::from_static("")),
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl ModelClient for OpenAIClient {
    async fn create_response(
        &self,
        turns: &[PromptTurn],
        previous_response_id: Option<&str>,
    ) -> Result<ModelReply, ModelError> {
        let start = Instant::now();
        let url = format!("{}/v1/responses", self.base_url);

        let request = ResponsesRequest {
            model: self.model.clone(),
            input: turns.to_vec(),
            previous_response_id: previous_response_id.map(str::to_owned),
            store: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError {
                message: format!("API error: {}", body),
                status_code: Some(status.as_u16()),
            });
        }

        let reply: ResponsesReply = response.json().await.map_err(|e| ModelError {
            message: format!("Failed to parse response: {}", e),
            status_code: None,
        })?;

        tracing::debug!(
            response_id = %reply.id,
            latency_ms = start.elapsed().as_millis() as u64,
            "Model response received"
        );

        Ok(ModelReply {
            content: reply.output_text(),
            response_id: reply.id,
            conversation_id: reply.conversation.map(|c| c.id),
            usage: reply.usage.map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    async fn list_responses(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<serde_json::Value>, ModelError> {
        let url = format!("{}/v1/conversations/{}/items", self.base_url, conversation_id);

        let response = self.client.get(&url).send().await.map_err(|e| ModelError {
            message: format!("Request failed: {}", e),
            status_code: None,
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError {
                message: format!("API error: {}", body),
                status_code: Some(status.as_u16()),
            });
        }

        let items: ConversationItems = response.json().await.map_err(|e| ModelError {
            message: format!("Failed to parse response: {}", e),
            status_code: None,
        })?;

        Ok(items.data)
    }
}

// ============================================================================
// Responses API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ResponsesRequest {
    model: String,
    input: Vec<PromptTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_response_id: Option<String>,
    store: bool,
}

#[derive(Debug, Deserialize)]
struct ResponsesReply {
    id: String,
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    conversation: Option<ConversationRef>,
    #[serde(default)]
    usage: Option<ResponsesUsage>,
}

impl ResponsesReply {
    /// Text of the first `output_text` item across message outputs.
    fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .find(|content| content.kind == "output_text")
            .map(|content| content.text.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ConversationRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResponsesUsage {
    input_tokens: i64,
    output_tokens: i64,
    total_tokens: i64,
}

#[derive(Debug, Deserialize)]
struct ConversationItems {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ResponsesRequest {
            model: "gpt-4o-mini".into(),
            input: vec![
                PromptTurn::new("system", "Be helpful"),
                PromptTurn::new("user", "Hello"),
            ],
            previous_response_id: Some("resp_1".into()),
            store: true,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("gpt-4o-mini"));
        assert!(json.contains("Be helpful"));
        assert!(json.contains(r#""previous_response_id":"resp_1""#));
        assert!(json.contains(r#""store":true"#));
    }

    #[test]
    fn test_request_omits_absent_linkage() {
        let request = ResponsesRequest {
            model: "gpt-4o-mini".into(),
            input: vec![PromptTurn::new("user", "Hello")],
            previous_response_id: None,
            store: true,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("previous_response_id"));
    }

    #[test]
    fn test_reply_output_text() {
        let body = r#"{
            "id": "resp_abc",
            "output": [
                {"type": "reasoning", "content": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "Here are some laptops."}
                ]}
            ],
            "conversation": {"id": "conv_1"},
            "usage": {"input_tokens": 12, "output_tokens": 5, "total_tokens": 17}
        }"#;

        let reply: ResponsesReply = serde_json::from_str(body).unwrap();
        assert_eq!(reply.output_text(), "Here are some laptops.");
        assert_eq!(reply.id, "resp_abc");
        assert_eq!(reply.conversation.unwrap().id, "conv_1");
        assert_eq!(reply.usage.unwrap().total_tokens, 17);
    }

    #[test]
    fn test_reply_without_output() {
        let reply: ResponsesReply = serde_json::from_str(r#"{"id": "resp_empty"}"#).unwrap();
        assert_eq!(reply.output_text(), "");
        assert!(reply.conversation.is_none());
        assert!(reply.usage.is_none());
    }
}
