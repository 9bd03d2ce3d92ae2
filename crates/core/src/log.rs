//! The conversation log — session memory with a bounded context window.
//!
//! A [`ConversationLog`] keeps two views of the same conversation:
//!
//! - **`displayed`**: the full scrollback, append-only and never trimmed.
//!   This is what the user scrolls through.
//! - **`window`**: the recent tail, bounded to `max_messages` entries with
//!   FIFO eviction. This is what the model sees on each request.
//!
//! The split bounds per-request payload size (and token cost) without losing
//! UI continuity. One log is owned by one chat session; there is no shared
//! or global state.

use std::collections::VecDeque;

use tracing::debug;

use crate::message::{Message, Role};

/// Default bound on the context window, in messages.
pub const DEFAULT_MAX_MESSAGES: usize = 8;

/// How many characters of an evicted message to keep in the diagnostic log.
const EVICTION_PREVIEW_CHARS: usize = 50;

/// Session memory: full scrollback plus a bounded model-facing window.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    displayed: Vec<Message>,
    window: VecDeque<Message>,
    max_messages: usize,
}

impl ConversationLog {
    /// Create an empty log whose window holds at most `max_messages` entries.
    ///
    /// A session constructs its log exactly once, at session start.
    pub fn new(max_messages: usize) -> Self {
        Self {
            displayed: Vec::new(),
            window: VecDeque::new(),
            max_messages,
        }
    }

    /// Append a message to both the scrollback and the window, then evict
    /// the oldest window entries (one at a time, from the front) until the
    /// window is back within its bound.
    ///
    /// Eviction is irreversible for the window: the content is reported to
    /// the diagnostic log and then gone from the model's context. It stays
    /// visible in the scrollback.
    pub fn add_message(&mut self, role: Role, content: impl Into<String>) {
        let message = match role {
            Role::User => Message::user(content),
            Role::Assistant => Message::assistant(content),
            Role::System => Message::system(content),
        };

        self.displayed.push(message.clone());
        self.window.push_back(message);

        while self.window.len() > self.max_messages {
            if let Some(removed) = self.window.pop_front() {
                debug!(
                    preview = %preview(&removed.content),
                    "trimming message from context window"
                );
            }
        }
    }

    /// Materialize the message list for one model request: a synthetic
    /// system message followed by the last `max_messages` window entries.
    ///
    /// The window is already bounded, so the suffix slice is a no-op today;
    /// the bound-then-slice contract is kept explicit so the operation stays
    /// correct if a future configuration lets the window overflow
    /// temporarily.
    ///
    /// Read-only: calling this any number of times returns equal results.
    pub fn get_context(&self, system_prompt: &str) -> Vec<Message> {
        let skip = self.window.len().saturating_sub(self.max_messages);
        let mut context = Vec::with_capacity(self.window.len() - skip + 1);
        context.push(Message::system(system_prompt));
        context.extend(self.window.iter().skip(skip).cloned());
        context
    }

    /// Reset both lists to empty. The window bound is unchanged.
    pub fn clear(&mut self) {
        self.displayed.clear();
        self.window.clear();
    }

    /// The full scrollback, oldest first.
    pub fn displayed(&self) -> &[Message] {
        &self.displayed
    }

    /// Number of messages currently in the model-facing window.
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// The configured window bound.
    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// True when nothing has been said yet (or after [`clear`](Self::clear)).
    pub fn is_empty(&self) -> bool {
        self.displayed.is_empty()
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

/// First `EVICTION_PREVIEW_CHARS` characters, respecting char boundaries.
fn preview(content: &str) -> &str {
    match content.char_indices().nth(EVICTION_PREVIEW_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles_and_contents(messages: &[Message]) -> Vec<(Role, &str)> {
        messages
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect()
    }

    #[test]
    fn window_never_exceeds_bound() {
        let mut log = ConversationLog::new(3);
        for i in 0..20 {
            log.add_message(Role::User, format!("message {i}"));
            assert!(log.window_len() <= 3);
        }
    }

    #[test]
    fn displayed_is_never_trimmed() {
        let mut log = ConversationLog::new(2);
        for i in 0..10 {
            log.add_message(Role::User, format!("message {i}"));
        }
        assert_eq!(log.displayed().len(), 10);
        assert_eq!(log.window_len(), 2);
    }

    #[test]
    fn eviction_is_strictly_fifo() {
        let mut log = ConversationLog::new(2);
        log.add_message(Role::User, "a");
        log.add_message(Role::Assistant, "b");
        log.add_message(Role::User, "c");

        let context = log.get_context("sys");
        assert_eq!(
            roles_and_contents(&context),
            vec![
                (Role::System, "sys"),
                (Role::Assistant, "b"),
                (Role::User, "c"),
            ]
        );
        assert_eq!(log.displayed().len(), 3);
    }

    #[test]
    fn get_context_is_pure() {
        let mut log = ConversationLog::new(4);
        log.add_message(Role::User, "hello");
        log.add_message(Role::Assistant, "hi there");

        let first = log.get_context("prompt");
        let second = log.get_context("prompt");
        assert_eq!(roles_and_contents(&first), roles_and_contents(&second));
        assert_eq!(log.displayed().len(), 2);
    }

    #[test]
    fn context_always_starts_with_system_prompt() {
        let mut log = ConversationLog::new(4);
        log.add_message(Role::User, "question");

        let context = log.get_context("you are helpful");
        assert_eq!(context[0].role, Role::System);
        assert_eq!(context[0].content, "you are helpful");
    }

    #[test]
    fn empty_log_context_is_single_system_message() {
        let log = ConversationLog::new(8);
        let context = log.get_context("sys");
        assert_eq!(roles_and_contents(&context), vec![(Role::System, "sys")]);
    }

    #[test]
    fn clear_resets_both_lists() {
        let mut log = ConversationLog::new(4);
        log.add_message(Role::User, "one");
        log.add_message(Role::Assistant, "two");

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.displayed().len(), 0);
        assert_eq!(log.window_len(), 0);
        assert_eq!(
            roles_and_contents(&log.get_context("sys")),
            vec![(Role::System, "sys")]
        );
        // Bound survives the reset
        assert_eq!(log.max_messages(), 4);
    }

    #[test]
    fn context_takes_at_most_max_messages_from_the_tail() {
        // The window stays bounded, so the slice must hand back all of it —
        // and never more than the configured bound.
        let mut log = ConversationLog::new(3);
        for i in 0..7 {
            log.add_message(Role::User, format!("m{i}"));
        }
        let context = log.get_context("sys");
        assert_eq!(context.len(), 4); // system + 3
        assert_eq!(context[1].content, "m4");
        assert_eq!(context[3].content, "m6");
    }

    #[test]
    fn context_slices_an_overflowed_window_to_the_bound() {
        // `add_message` keeps the window bounded, so an overflowed window
        // cannot arise through the public API; seed the fields directly to
        // pin the suffix-slice contract for a configuration that lets the
        // window grow past its bound before slicing.
        let mut log = ConversationLog::new(2);
        for i in 0..5 {
            let message = Message::user(format!("m{i}"));
            log.displayed.push(message.clone());
            log.window.push_back(message);
        }
        assert_eq!(log.window_len(), 5);

        let context = log.get_context("sys");
        assert_eq!(
            roles_and_contents(&context),
            vec![
                (Role::System, "sys"),
                (Role::User, "m3"),
                (Role::User, "m4"),
            ]
        );
    }

    #[test]
    fn default_bound_is_eight() {
        let log = ConversationLog::default();
        assert_eq!(log.max_messages(), DEFAULT_MAX_MESSAGES);
        assert_eq!(log.max_messages(), 8);
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let multibyte = "é".repeat(80);
        let cut = preview(&multibyte);
        assert_eq!(cut.chars().count(), 50);

        let short = "tiny";
        assert_eq!(preview(short), "tiny");
    }
}
