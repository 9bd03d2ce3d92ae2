//! HTTP chat client for tidechat.
//!
//! [`HttpChatClient`] speaks the OpenAI-compatible `/chat/completions`
//! protocol (DeepSeek and friends). [`run_turn`] drives one full round trip
//! against a [`tidechat_core::ChatBackend`] and owns the rule that session
//! memory only changes after a successful reply.

pub mod http;
pub mod turn;

pub use http::HttpChatClient;
pub use turn::run_turn;
