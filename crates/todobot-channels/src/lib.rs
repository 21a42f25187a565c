//! Communication channel abstraction for todobot.
//!
//! Provides the [`Channel`] trait the gateway talks to and the Telegram Bot
//! API implementation used in production.
//!
//! # Main types
//!
//! - [`Channel`] — Trait for sending messages, dice, and admin lookups.
//! - [`TelegramChannel`] — Long-polling Telegram Bot API adapter.
//! - [`IncomingMessage`] / [`OutgoingMessage`] — Platform-neutral messages.

/// Core channel trait and message types.
pub mod channel;
/// Telegram channel integration.
pub mod telegram;

pub use channel::{Channel, ChatAdmin, DiceEmoji, IncomingMessage, OutgoingMessage};
pub use telegram::{TelegramChannel, DEFAULT_API_BASE_URL};
