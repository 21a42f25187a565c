use serde::{Deserialize, Serialize};
use std::fmt;
use todobot_core::{Action, TodoList, TodoResult};

/// Identifies one user's conversation inside one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl SessionKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.user_id)
    }
}

/// Which input the conversation expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// Waiting for a menu label.
    #[default]
    Choosing,
    /// Waiting for the follow-up text of the pending action.
    TypingReply,
}

/// Todo items plus the conversation state for one [`SessionKey`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub key: SessionKey,
    pub items: TodoList,
    state: ConversationState,
    pending_action: Option<Action>,
}

impl Session {
    pub fn new(key: SessionKey) -> Self {
        Self {
            key,
            items: TodoList::new(),
            state: ConversationState::Choosing,
            pending_action: None,
        }
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn pending_action(&self) -> Option<Action> {
        self.pending_action
    }

    /// Remember the menu choice and wait for its follow-up text.
    pub fn choose(&mut self, action: Action) {
        self.pending_action = Some(action);
        self.state = ConversationState::TypingReply;
    }

    /// Drop any pending choice and go back to the menu.
    pub fn reset_choice(&mut self) {
        self.pending_action = None;
        self.state = ConversationState::Choosing;
    }

    /// Consume the pending action with `text`.
    ///
    /// Returns `None` when no action was pending. Otherwise the session is
    /// back in [`ConversationState::Choosing`] whatever the mutation result.
    pub fn apply_pending(&mut self, text: &str) -> Option<TodoResult<()>> {
        let action = self.pending_action.take()?;
        self.state = ConversationState::Choosing;
        Some(self.items.apply(action, text))
    }
}
