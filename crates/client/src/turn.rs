//! One chat turn: context assembly, the round trip, and the memory update.
//!
//! The ordering here is a contract: the new prompt rides along in the
//! request only, and the log is appended to *after* a successful non-empty
//! reply. A failed or empty round trip leaves the session memory exactly as
//! it was.

use tidechat_core::backend::{ChatBackend, ChatReply, ChatRequest};
use tidechat_core::error::ClientError;
use tidechat_core::log::ConversationLog;
use tidechat_core::message::{Message, Role};
use tracing::debug;

/// Run one round trip with the model.
///
/// Builds the request from `log.get_context(system_prompt)` plus the new
/// prompt, sends it, and on success records the user prompt followed by the
/// assistant reply in the log. Any error (transport, non-200, empty reply)
/// propagates with the log untouched.
pub async fn run_turn(
    backend: &dyn ChatBackend,
    log: &mut ConversationLog,
    prompt: &str,
    system_prompt: &str,
    model: &str,
    temperature: f32,
) -> Result<ChatReply, ClientError> {
    let mut messages = log.get_context(system_prompt);
    messages.push(Message::user(prompt));

    debug!(
        backend = backend.name(),
        count = messages.len(),
        "sending messages to model endpoint"
    );

    let reply = backend
        .complete(ChatRequest {
            model: model.to_string(),
            messages,
            temperature,
        })
        .await?;

    if reply.content.is_empty() {
        return Err(ClientError::EmptyReply);
    }

    log.add_message(Role::User, prompt);
    log.add_message(Role::Assistant, reply.content.as_str());

    Ok(reply)
}
