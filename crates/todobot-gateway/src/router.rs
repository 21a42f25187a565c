use crate::command::Command;
use crate::conversation::ConversationController;
use std::sync::Arc;
use todobot_channels::{Channel, ChatAdmin, DiceEmoji, IncomingMessage, OutgoingMessage};
use todobot_core::{Reply, TodoResult};
use todobot_session::{SessionKey, SessionStore};
use tracing::{debug, info};

/// Default `/start` greeting.
pub const DEFAULT_START_MESSAGE: &str = "I love Qv2ray!";

/// Default upper bound for `/dart n` and `/dice n`.
pub const DEFAULT_MAX_DICE: u32 = 10;

/// Tunables for [`MessageRouter`].
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub start_message: String,
    pub menu_prompt: String,
    pub max_dice: u32,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            start_message: DEFAULT_START_MESSAGE.to_string(),
            menu_prompt: crate::conversation::DEFAULT_MENU_PROMPT.to_string(),
            max_dice: DEFAULT_MAX_DICE,
        }
    }
}

/// Routes inbound messages to command handlers or the todo conversation.
pub struct MessageRouter {
    channel: Arc<dyn Channel>,
    conversation: ConversationController,
    start_message: String,
    max_dice: u32,
}

impl MessageRouter {
    pub fn new(
        channel: Arc<dyn Channel>,
        sessions: Arc<dyn SessionStore>,
        settings: RouterSettings,
    ) -> Self {
        Self {
            channel,
            conversation: ConversationController::new(sessions)
                .with_menu_prompt(settings.menu_prompt),
            start_message: settings.start_message,
            max_dice: settings.max_dice.max(1),
        }
    }

    pub async fn handle_message(&self, msg: &IncomingMessage) -> TodoResult<()> {
        let key = SessionKey::new(msg.chat_id, msg.sender_id.unwrap_or(msg.chat_id));

        let Some(command) = Command::parse(&msg.text) else {
            if let Some(reply) = self.conversation.handle_text(key, &msg.text).await? {
                self.reply(msg, reply).await?;
            }
            return Ok(());
        };

        debug!(chat_id = msg.chat_id, command = ?command, "Routing command");
        match command {
            Command::Start => self.reply(msg, Reply::text(self.start_message.as_str())).await,
            Command::Todo => {
                let reply = self.conversation.start(key).await?;
                self.reply(msg, reply).await
            }
            Command::Dart(count) => self.roll(msg.chat_id, DiceEmoji::Dart, count).await,
            Command::Dice(count) => self.roll(msg.chat_id, DiceEmoji::Die, count).await,
            Command::ShowAdmins => {
                let admins = self.channel.chat_administrators(msg.chat_id).await?;
                self.reply(msg, Reply::text(format_admins(&admins))).await
            }
            Command::Unknown(name) => {
                debug!(chat_id = msg.chat_id, command = %name, "Ignoring unknown command");
                Ok(())
            }
        }
    }

    async fn reply(&self, to: &IncomingMessage, reply: Reply) -> TodoResult<()> {
        self.channel
            .send(OutgoingMessage {
                chat_id: to.chat_id,
                text: reply.text,
                reply_to_message_id: Some(to.message_id),
                markup: reply.markup,
            })
            .await
    }

    /// Send `requested` dice, capped at `max_dice`. Zero or less sends none.
    async fn roll(&self, chat_id: i64, emoji: DiceEmoji, requested: i64) -> TodoResult<()> {
        let count = requested.clamp(0, i64::from(self.max_dice));
        if count != requested {
            info!(chat_id, requested, count, "Clamped dice count");
        }
        for _ in 0..count {
            self.channel.send_dice(chat_id, emoji).await?;
        }
        Ok(())
    }
}

/// One line per admin: `Ada (@ada) - creator`.
pub fn format_admins(admins: &[ChatAdmin]) -> String {
    if admins.is_empty() {
        return "No administrators found.".to_string();
    }
    admins
        .iter()
        .map(|admin| match &admin.username {
            Some(username) => format!("{} (@{username}) - {}", admin.first_name, admin.status),
            None => format!("{} - {}", admin.first_name, admin.status),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(name: &str, username: Option<&str>, status: &str) -> ChatAdmin {
        ChatAdmin {
            user_id: 1,
            first_name: name.to_string(),
            username: username.map(str::to_string),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_format_admins() {
        let admins = vec![
            admin("Ada", Some("ada"), "creator"),
            admin("Bob", None, "administrator"),
        ];
        assert_eq!(
            format_admins(&admins),
            "Ada (@ada) - creator\nBob - administrator"
        );
    }

    #[test]
    fn test_format_no_admins() {
        assert_eq!(format_admins(&[]), "No administrators found.");
    }
}
