//! ChatBackend trait — the abstraction over the model endpoint.
//!
//! A backend knows how to send a prepared message list to an LLM and return
//! the assistant's reply. The HTTP implementation lives in `tidechat-client`;
//! tests use in-process stubs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::message::Message;

/// One prepared model request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model to use (e.g. "deepseek-chat")
    pub model: String,

    /// The full message list: system prompt, context window, new prompt
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, higher = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    0.7
}

/// A complete response from a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// The assistant's text (may be empty — callers must check)
    pub content: String,

    /// Which model actually responded
    pub model: String,

    /// Token usage statistics, when the endpoint reports them
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The model-endpoint trait.
///
/// One synchronous round trip per call: no streaming, no retries. Failures
/// surface as [`ClientError`] and leave no trace in session memory (the
/// caller only mutates memory after a successful reply).
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// A human-readable name for this backend (e.g. "deepseek").
    fn name(&self) -> &str;

    /// Send a request and wait for the complete reply.
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_defaults() {
        let json = r#"{"model":"deepseek-chat","messages":[]}"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.messages.is_empty());
    }

    #[test]
    fn usage_roundtrip() {
        let usage = Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        };
        let json = serde_json::to_string(&usage).unwrap();
        let parsed: Usage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.total_tokens, 15);
    }
}
