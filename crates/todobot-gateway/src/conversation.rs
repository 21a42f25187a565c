use std::sync::Arc;
use todobot_core::{Action, Reply, TodoResult, DONE_LABEL};
use todobot_session::{ConversationState, Session, SessionKey, SessionStore};
use tracing::{debug, info};

/// Sent when a follow-up text could not be applied to the list.
pub const ERROR_MESSAGE: &str = "An error occurred";

/// Default text accompanying the menu keyboard.
pub const DEFAULT_MENU_PROMPT: &str = "What would you like to do?";

/// Drives the Choosing / TypingReply state machine for every session.
pub struct ConversationController {
    sessions: Arc<dyn SessionStore>,
    menu_prompt: String,
}

impl ConversationController {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            sessions,
            menu_prompt: DEFAULT_MENU_PROMPT.to_string(),
        }
    }

    pub fn with_menu_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.menu_prompt = prompt.into();
        self
    }

    /// Enter (or re-enter) the conversation and show the menu.
    ///
    /// Re-entering drops a pending choice but keeps the items.
    pub async fn start(&self, key: SessionKey) -> TodoResult<Reply> {
        let mut session = match self.sessions.get(key).await? {
            Some(session) => session,
            None => {
                info!(session = %key, "Todo conversation started");
                Session::new(key)
            }
        };
        session.reset_choice();
        self.sessions.put(&session).await?;
        Ok(Reply::with_menu(self.menu_prompt.as_str()))
    }

    /// Feed a non-command text into the conversation for `key`.
    ///
    /// Returns `Ok(None)` when nothing should be sent back: no active
    /// conversation, a menu choice was recorded, or the text was not a valid
    /// choice.
    pub async fn handle_text(&self, key: SessionKey, text: &str) -> TodoResult<Option<Reply>> {
        let Some(mut session) = self.sessions.get(key).await? else {
            return Ok(None);
        };

        if text == DONE_LABEL {
            self.sessions.remove(key).await?;
            info!(session = %key, items = session.items.len(), "Todo conversation finished");
            return Ok(Some(Reply::removing_keyboard(session.items.render())));
        }

        let reply = match session.state() {
            ConversationState::Choosing => match Action::from_label(text) {
                Some(action) => {
                    debug!(session = %key, action = %action, "Action chosen");
                    session.choose(action);
                    None
                }
                None => {
                    debug!(session = %key, "Ignoring text outside the menu");
                    return Ok(None);
                }
            },
            ConversationState::TypingReply => match session.apply_pending(text) {
                Some(Ok(())) => Some(Reply::with_menu(session.items.render())),
                Some(Err(e)) => {
                    debug!(session = %key, error = %e, "Todo mutation failed");
                    Some(Reply::removing_keyboard(ERROR_MESSAGE))
                }
                None => {
                    session.reset_choice();
                    None
                }
            },
        };

        self.sessions.put(&session).await?;
        Ok(reply)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use todobot_core::{ReplyMarkup, DONE_MARKER, EMPTY_LIST_MESSAGE};
    use todobot_session::MemorySessionStore;

    const KEY: SessionKey = SessionKey {
        chat_id: 1,
        user_id: 1,
    };

    fn controller() -> (ConversationController, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        (ConversationController::new(store.clone()), store)
    }

    async fn send(c: &ConversationController, text: &str) -> Option<Reply> {
        c.handle_text(KEY, text).await.unwrap()
    }

    #[tokio::test]
    async fn test_start_shows_menu() {
        let (c, store) = controller();
        let reply = c.start(KEY).await.unwrap();
        assert_eq!(reply.markup, ReplyMarkup::Menu);
        assert_eq!(reply.text, DEFAULT_MENU_PROMPT);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_custom_menu_prompt() {
        let store = Arc::new(MemorySessionStore::new());
        let c = ConversationController::new(store).with_menu_prompt("TBD");
        assert_eq!(c.start(KEY).await.unwrap().text, "TBD");
    }

    #[tokio::test]
    async fn test_text_without_session_is_unhandled() {
        let (c, store) = controller();
        assert!(send(&c, "Add todo").await.is_none());
        assert!(send(&c, "Done").await.is_none());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_add_flow() {
        let (c, _) = controller();
        c.start(KEY).await.unwrap();
        assert!(send(&c, "Add todo").await.is_none());
        let reply = send(&c, "buy milk").await.unwrap();
        assert_eq!(reply.text, "1. buy milk");
        assert_eq!(reply.markup, ReplyMarkup::Menu);
    }

    #[tokio::test]
    async fn test_non_menu_text_ignored_while_choosing() {
        let (c, store) = controller();
        c.start(KEY).await.unwrap();
        assert!(send(&c, "buy milk").await.is_none());
        let session = store.get(KEY).await.unwrap().unwrap();
        assert_eq!(session.state(), ConversationState::Choosing);
        assert!(session.items.is_empty());
    }

    #[tokio::test]
    async fn test_bad_index_reports_error_and_keeps_list() {
        let (c, store) = controller();
        c.start(KEY).await.unwrap();
        send(&c, "Add todo").await;
        send(&c, "a").await;
        send(&c, "Remove todo").await;

        let reply = send(&c, "abc").await.unwrap();
        assert_eq!(reply.text, ERROR_MESSAGE);
        assert_eq!(reply.markup, ReplyMarkup::Remove);

        let session = store.get(KEY).await.unwrap().unwrap();
        assert_eq!(session.items.items(), ["a"]);
        assert_eq!(session.state(), ConversationState::Choosing);
        assert!(session.pending_action().is_none());
    }

    #[tokio::test]
    async fn test_toggle_twice() {
        let (c, _) = controller();
        c.start(KEY).await.unwrap();
        send(&c, "Add todo").await;
        send(&c, "run").await;
        send(&c, "Toggle todo").await;
        send(&c, "1").await;
        send(&c, "Toggle todo").await;
        let reply = send(&c, "1").await.unwrap();
        assert_eq!(reply.text, format!("1. run {DONE_MARKER} {DONE_MARKER}"));
    }

    #[tokio::test]
    async fn test_done_from_typing_reply() {
        let (c, store) = controller();
        c.start(KEY).await.unwrap();
        send(&c, "Add todo").await;
        send(&c, "a").await;
        send(&c, "Update todo").await;

        let reply = send(&c, "Done").await.unwrap();
        assert_eq!(reply.text, "1. a");
        assert_eq!(reply.markup, ReplyMarkup::Remove);
        assert!(store.get(KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_done_with_empty_list() {
        let (c, store) = controller();
        c.start(KEY).await.unwrap();
        let reply = send(&c, "Done").await.unwrap();
        assert_eq!(reply.text, EMPTY_LIST_MESSAGE);
        assert_eq!(reply.markup, ReplyMarkup::Remove);
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_restart_keeps_items_and_clears_choice() {
        let (c, store) = controller();
        c.start(KEY).await.unwrap();
        send(&c, "Add todo").await;
        send(&c, "a").await;
        send(&c, "Remove todo").await;

        c.start(KEY).await.unwrap();
        let session = store.get(KEY).await.unwrap().unwrap();
        assert_eq!(session.state(), ConversationState::Choosing);
        assert!(session.pending_action().is_none());
        assert_eq!(session.items.items(), ["a"]);
    }
}
