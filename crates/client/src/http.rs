//! OpenAI-compatible HTTP backend.
//!
//! Works with DeepSeek and any endpoint exposing `/chat/completions`:
//! POST with a bearer key, JSON body `{model, messages, temperature}`,
//! reply in `choices[0].message.content`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tidechat_core::backend::{ChatBackend, ChatReply, ChatRequest, Usage};
use tidechat_core::error::ClientError;
use tidechat_core::message::{Message, Role};
use tracing::{debug, warn};

/// An OpenAI-compatible chat backend.
pub struct HttpChatClient {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpChatClient {
    /// Create a new client for an OpenAI-compatible endpoint.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create a DeepSeek client (convenience constructor).
    pub fn deepseek(api_key: impl Into<String>) -> Self {
        Self::new("deepseek", "https://api.deepseek.com/v1", api_key)
    }

    /// Convert domain messages to the wire format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                    Role::System => "system".into(),
                },
                content: Some(m.content.clone()),
            })
            .collect()
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, ClientError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
        });

        debug!(backend = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(ClientError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Endpoint returned error");
            return Err(ClientError::Api {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ClientError::Api {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        reply_from_response(api_response)
    }
}

/// Lift the wire response into a [`ChatReply`].
///
/// Missing choices is an API error; empty content is not — the caller
/// decides what an empty reply means.
fn reply_from_response(api_response: ApiResponse) -> Result<ChatReply, ClientError> {
    let model = api_response.model;

    let choice = api_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::Api {
            status_code: 200,
            message: "No choices in response".into(),
        })?;

    let usage = api_response.usage.map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok(ChatReply {
        content: choice.message.content.unwrap_or_default(),
        model,
        usage,
    })
}

// --- Wire types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deepseek_constructor() {
        let client = HttpChatClient::deepseek("sk-test");
        assert_eq!(client.name(), "deepseek");
        assert!(client.base_url.contains("api.deepseek.com"));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HttpChatClient::new("test", "http://localhost:8080/v1/", "key");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn message_conversion() {
        let messages = vec![Message::system("You are helpful"), Message::user("Hello")];
        let api_messages = HttpChatClient::to_api_messages(&messages);
        assert_eq!(api_messages.len(), 2);
        assert_eq!(api_messages[0].role, "system");
        assert_eq!(api_messages[1].role, "user");
        assert_eq!(api_messages[1].content.as_deref(), Some("Hello"));
    }

    #[test]
    fn parse_full_response() {
        let data = r#"{
            "model": "deepseek-chat",
            "choices": [{"message": {"role": "assistant", "content": "Hi!"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let reply = reply_from_response(parsed).unwrap();
        assert_eq!(reply.content, "Hi!");
        assert_eq!(reply.model, "deepseek-chat");
        assert_eq!(reply.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn missing_choices_is_an_api_error() {
        let data = r#"{"model": "deepseek-chat", "choices": []}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let err = reply_from_response(parsed).unwrap_err();
        assert!(matches!(err, ClientError::Api { status_code: 200, .. }));
    }

    #[tokio::test]
    async fn connection_refused_surfaces_as_network_error() {
        // Port 9 (discard) is not listening on loopback.
        let client = HttpChatClient::new("test", "http://127.0.0.1:9", "key");
        let err = client
            .complete(ChatRequest {
                model: "m".into(),
                messages: vec![Message::user("hi")],
                temperature: 0.7,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }

    #[test]
    fn null_content_becomes_empty_reply_text() {
        let data = r#"{
            "model": "deepseek-chat",
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let reply = reply_from_response(parsed).unwrap();
        assert!(reply.content.is_empty());
        assert!(reply.usage.is_none());
    }
}
