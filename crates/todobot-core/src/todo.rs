use crate::{TodoError, TodoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Glyph appended to an item each time it is toggled.
pub const DONE_MARKER: &str = "\u{2705}";

/// Rendered in place of an empty list.
pub const EMPTY_LIST_MESSAGE: &str = "Nothing to do here.";

/// Menu label that ends the conversation.
pub const DONE_LABEL: &str = "Done";

/// A list mutation chosen from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Append the follow-up text as a new item.
    Add,
    /// Remove the item at the given position.
    Remove,
    /// Replace the item at the given position.
    Update,
    /// Append the done marker to the item at the given position.
    Toggle,
}

impl Action {
    /// All actions in menu order.
    pub const ALL: [Action; 4] = [Action::Add, Action::Remove, Action::Update, Action::Toggle];

    /// The keyboard label for this action.
    pub fn label(self) -> &'static str {
        match self {
            Action::Add => "Add todo",
            Action::Remove => "Remove todo",
            Action::Update => "Update todo",
            Action::Toggle => "Toggle todo",
        }
    }

    /// Match a message against the menu labels. Only exact matches count.
    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == text)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered todo items. Items have no identity beyond their 1-based position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList {
    items: Vec<String>,
}

impl TodoList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in display order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Apply `action` using the follow-up `text`.
    ///
    /// Remove, Update and Toggle read a 1-based position from `text`. Update
    /// then stores `text` itself at that position, so the item becomes the
    /// number that was typed. On error the list is left untouched.
    pub fn apply(&mut self, action: Action, text: &str) -> TodoResult<()> {
        match action {
            Action::Add => {
                self.items.push(text.to_string());
            }
            Action::Remove => {
                let idx = self.resolve_index(text)?;
                self.items.remove(idx);
            }
            Action::Update => {
                let idx = self.resolve_index(text)?;
                self.items[idx] = text.to_string();
            }
            Action::Toggle => {
                let idx = self.resolve_index(text)?;
                let item = &mut self.items[idx];
                item.push(' ');
                item.push_str(DONE_MARKER);
            }
        }
        Ok(())
    }

    /// Numbered rendering, or [`EMPTY_LIST_MESSAGE`] when there is nothing to show.
    pub fn render(&self) -> String {
        if self.items.is_empty() {
            return EMPTY_LIST_MESSAGE.to_string();
        }
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {item}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Turn user text into a 0-based index into `items`.
    fn resolve_index(&self, text: &str) -> TodoResult<usize> {
        let trimmed = text.trim();
        let position: i64 = trimmed
            .parse()
            .map_err(|_| TodoError::InvalidIndex(trimmed.to_string()))?;

        let len = self.items.len();
        match usize::try_from(position) {
            Ok(p) if (1..=len).contains(&p) => Ok(p - 1),
            _ => Err(TodoError::IndexOutOfRange {
                index: position,
                len,
            }),
        }
    }
}

impl FromIterator<String> for TodoList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
