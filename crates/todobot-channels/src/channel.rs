use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use todobot_core::{ReplyMarkup, TodoResult};

/// A text message received from a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub chat_id: i64,
    /// Absent for messages posted on behalf of a channel.
    pub sender_id: Option<i64>,
    pub message_id: i64,
    pub text: String,
}

/// A text message to deliver to a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
    /// Message this one answers; selective keyboards only show to its author.
    pub reply_to_message_id: Option<i64>,
    #[serde(default)]
    pub markup: ReplyMarkup,
}

/// Animated dice kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiceEmoji {
    Dart,
    Die,
}

impl DiceEmoji {
    pub fn as_emoji(self) -> &'static str {
        match self {
            DiceEmoji::Dart => "\u{1F3AF}",
            DiceEmoji::Die => "\u{1F3B2}",
        }
    }
}

/// One administrator of a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAdmin {
    pub user_id: i64,
    pub first_name: String,
    pub username: Option<String>,
    /// `creator` or `administrator`.
    pub status: String,
}

#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, message: OutgoingMessage) -> TodoResult<()>;
    async fn send_dice(&self, chat_id: i64, emoji: DiceEmoji) -> TodoResult<()>;
    async fn chat_administrators(&self, chat_id: i64) -> TodoResult<Vec<ChatAdmin>>;
}
