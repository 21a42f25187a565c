//! Reply types produced by the conversation layer.
//!
//! These types live in `todobot-core` so that both `todobot-channels` (which
//! turns them into Bot API payloads) and `todobot-gateway` (which decides what
//! to answer) can share them without circular deps.

use serde::{Deserialize, Serialize};

/// Rows of the fixed menu keyboard.
pub const MENU_KEYBOARD: [&[&str]; 3] = [
    &["Add todo", "Remove todo"],
    &["Update todo", "Toggle todo"],
    &["Done"],
];

/// What to do with the custom keyboard when a reply is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMarkup {
    /// Leave whatever keyboard the client currently shows.
    #[default]
    None,
    /// Show the todo menu keyboard.
    Menu,
    /// Hide the keyboard.
    Remove,
}

/// A text reply together with its keyboard markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Message body.
    pub text: String,
    /// Keyboard handling for this message.
    #[serde(default)]
    pub markup: ReplyMarkup,
}

impl Reply {
    /// A plain reply that leaves the keyboard alone.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: ReplyMarkup::None,
        }
    }

    /// A reply that shows the menu keyboard.
    pub fn with_menu(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: ReplyMarkup::Menu,
        }
    }

    /// A reply that removes the keyboard.
    pub fn removing_keyboard(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: ReplyMarkup::Remove,
        }
    }
}
