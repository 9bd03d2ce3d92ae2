//! # tidechat Core
//!
//! Domain types, traits, and error definitions for the tidechat chat client.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! The central piece is [`ConversationLog`]: the session memory that keeps a
//! full scrollback for the user and a bounded sliding window for the model.

pub mod backend;
pub mod error;
pub mod log;
pub mod message;

// Re-export key types at crate root for ergonomics
pub use backend::{ChatBackend, ChatReply, ChatRequest, Usage};
pub use error::{ClientError, Error, ExtractError, Result};
pub use log::ConversationLog;
pub use message::{Message, Role};
