//! Core types and error definitions for todobot.
//!
//! This crate provides the foundational types shared across all todobot crates:
//! error handling, the todo list with its mutation and rendering rules, and the
//! reply types the conversation layer hands to a channel.
//!
//! # Main types
//!
//! - [`TodoError`] — Unified error enum for all todobot subsystems.
//! - [`TodoResult`] — Convenience alias for `Result<T, TodoError>`.
//! - [`Action`] — One of the four menu actions.
//! - [`TodoList`] — Ordered todo items with add/remove/update/toggle.
//! - [`Reply`] — Text plus keyboard markup to send back to a chat.

/// Outbound reply types shared by the gateway and the channels.
pub mod reply;
/// Todo list mutation and rendering.
pub mod todo;

pub use reply::{Reply, ReplyMarkup, MENU_KEYBOARD};
pub use todo::{Action, TodoList, DONE_LABEL, DONE_MARKER, EMPTY_LIST_MESSAGE};

// --- Error types ---

/// Top-level error type for todobot.
///
/// Each variant corresponds to a subsystem that can produce errors.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// Follow-up text that should have been an item position was not a number.
    #[error("Invalid index: {0:?}")]
    InvalidIndex(String),

    /// A position outside `1..=len` was requested.
    #[error("Index {index} out of range for list of {len} item(s)")]
    IndexOutOfRange {
        /// The 1-based position as typed by the user.
        index: i64,
        /// Length of the list at the time of the request.
        len: usize,
    },

    /// An error from a communication channel (e.g. the Telegram Bot API).
    #[error("Channel error: {0}")]
    Channel(String),

    /// An error from an outbound HTTP request.
    #[error("HTTP error: {0}")]
    Http(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// A response body that was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience `Result` alias using [`TodoError`].
pub type TodoResult<T> = Result<T, TodoError>;
